//! Tabular output
//!
//! Builds column-aligned tables from records and writes them to the console.
//! Building and printing are split so a table can be inspected (or rendered
//! twice) before anything is written.

use crate::error::ReportError;
use comfy_table::presets::ASCII_FULL_CONDENSED;
use std::io::{self, Write};

/// Build a row of display cells from anything implementing `Display`
#[macro_export]
macro_rules! cells {
    ($($cell:expr),* $(,)?) => {
        vec![$($cell.to_string()),*]
    };
}

/// Render a flag the way the console output expects it
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// A materialized, non-empty table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Project `records` into rows under `headers`.
    ///
    /// Returns `Ok(None)` when there are no records: an empty result never
    /// produces a header-only table.
    pub fn from_records<T, I, F>(
        headers: &[&str],
        records: I,
        mut project: F,
    ) -> Result<Option<Self>, ReportError>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> Vec<String>,
    {
        let mut rows = Vec::new();
        for record in records {
            let row = project(record);
            if row.len() != headers.len() {
                return Err(ReportError::ColumnCount {
                    expected: headers.len(),
                    actual: row.len(),
                });
            }
            rows.push(row);
        }

        if rows.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self {
            header: Some(headers.iter().map(|h| h.to_string()).collect()),
            rows,
        }))
    }

    /// Build a key/value table, one row per key followed by its values.
    ///
    /// With `ordered`, every key must look like `"<number> <label>"`: rows are
    /// sorted by the number and only the label is displayed. Without it, rows
    /// follow the iteration order of `data`.
    pub fn key_value<K, V, I>(
        headers: Option<&[&str]>,
        data: I,
        ordered: bool,
    ) -> Result<Option<Self>, ReportError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator,
        V::Item: ToString,
    {
        let mut keyed = Vec::new();
        for (key, values) in data {
            let key = key.as_ref();
            let (sort_key, label) = if ordered {
                let (prefix, label) = key.split_once(' ').unwrap_or((key, ""));
                let sort_key: i64 = prefix
                    .parse()
                    .map_err(|_| ReportError::SortPrefix(key.to_string()))?;
                (sort_key, label.to_string())
            } else {
                (0, key.to_string())
            };

            let mut row = vec![label];
            row.extend(values.into_iter().map(|v| v.to_string()));
            keyed.push((sort_key, row));
        }

        if ordered {
            keyed.sort_by_key(|(sort_key, _)| *sort_key);
        }

        if let Some(headers) = headers {
            if let Some((_, row)) = keyed.iter().find(|(_, row)| row.len() != headers.len()) {
                return Err(ReportError::ColumnCount {
                    expected: headers.len(),
                    actual: row.len(),
                });
            }
        }

        if keyed.is_empty() {
            return Ok(None);
        }

        Ok(Some(Self {
            header: headers.map(|hs| hs.iter().map(|h| h.to_string()).collect()),
            rows: keyed.into_iter().map(|(_, row)| row).collect(),
        }))
    }

    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Data rows, in input order (or sort order for ordered key/value tables)
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of table rows including the header
    pub fn line_count(&self) -> usize {
        self.rows.len() + usize::from(self.header.is_some())
    }

    /// Render as left-aligned ASCII table
    pub fn render(&self) -> String {
        let mut table = comfy_table::Table::new();
        table.load_preset(ASCII_FULL_CONDENSED).force_no_tty();

        if let Some(header) = &self.header {
            table.set_header(header.clone());
        }
        for row in &self.rows {
            table.add_row(row.clone());
        }

        table.to_string()
    }
}

/// Console writer for tables and plain lines
pub struct Printer<W> {
    out: W,
    margin: usize,
}

impl Printer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Printer<W> {
    pub fn new(out: W) -> Self {
        Self { out, margin: 1 }
    }

    pub fn print_str(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }

    /// Print a table surrounded by blank-line margins
    pub fn print_table(&mut self, table: &Table) -> Result<(), ReportError> {
        for _ in 0..self.margin {
            writeln!(self.out)?;
        }
        writeln!(self.out, "{}", table.render())?;
        for _ in 0..self.margin {
            writeln!(self.out)?;
        }
        Ok(())
    }

    /// Project and print records; returns `false` (printing nothing) when
    /// there are no records, so the caller can report that its own way
    pub fn print_rows<T, I, F>(
        &mut self,
        headers: &[&str],
        records: I,
        project: F,
    ) -> Result<bool, ReportError>
    where
        I: IntoIterator<Item = T>,
        F: FnMut(T) -> Vec<String>,
    {
        match Table::from_records(headers, records, project)? {
            Some(table) => {
                self.print_table(&table)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Print a key/value table; see [`Table::key_value`]
    pub fn print_key_value<K, V, I>(
        &mut self,
        headers: Option<&[&str]>,
        data: I,
        ordered: bool,
    ) -> Result<bool, ReportError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoIterator,
        V::Item: ToString,
    {
        match Table::key_value(headers, data, ordered)? {
            Some(table) => {
                self.print_table(&table)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
