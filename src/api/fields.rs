//! Helpers for reading fields out of API replies
//!
//! Replies are loosely typed JSON; these helpers pull scalars out with the
//! same fallbacks everywhere so record conversions stay one-liners.

use crate::error::ApiError;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;

/// Dictionary entries in this language are used for display
pub const DISPLAY_LANGUAGE_ID: i64 = 2;

/// Vendor dictionary constants
pub mod dict {
    pub const DB_VM_CATEGORY: i64 = 324;
    pub const MYSQL_TEMPLATE_CATEGORY: i64 = 28;
    pub const POSTGRESQL_TEMPLATE_CATEGORY: i64 = 29;
    pub const UTF8_ENCODING: i64 = 549;
    pub const LATIN2_ENCODING: i64 = 550;
    pub const MYSQL_DB: i64 = 325;
    pub const POSTGRESQL_DB: i64 = 326;
    pub const OCI_CONNECTION_ID: i64 = 37;
    pub const OCI_PAYMENT_ID: i64 = 33;
    pub const OCI_AUTOSCALING_ID: i64 = 184;
    pub const OCI_CLASSES_DICT_ID: i64 = 12;
    /// Disk tier `n` (1-5) is dictionary item `HDD_STANDARD_BASE + n`
    pub const HDD_STANDARD_BASE: i64 = 47;
    pub const DISK_PAYMENT_ID: i64 = 37;
}

pub fn str_field(value: &Value, key: &str) -> String {
    opt_str(value, key).unwrap_or_else(|| "-".to_string())
}

pub fn opt_str(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn opt_int(value: &Value, key: &str) -> Option<i64> {
    let field = value.get(key)?;
    field
        .as_i64()
        .or_else(|| field.as_f64().map(|f| f as i64))
        .or_else(|| field.as_str().and_then(|s| s.trim().parse().ok()))
}

pub fn int_field(value: &Value, key: &str) -> i64 {
    opt_int(value, key).unwrap_or(0)
}

/// Integer field that identifies a record; its absence is an error
pub fn required_int(method: &str, value: &Value, key: &str) -> Result<i64, ApiError> {
    opt_int(value, key).ok_or_else(|| ApiError::MissingField {
        method: method.to_string(),
        field: key.to_string(),
    })
}

pub fn bool_field(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Numeric field rendered for display, `-` when absent
pub fn num_display(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.clone(),
        _ => "-".to_string(),
    }
}

/// Items of a list reply: either a bare array or a `_results` page
pub fn results(value: &Value) -> &[Value] {
    let list = value.get("_results").unwrap_or(value);
    match list {
        Value::Array(items) => match items.as_slice() {
            // older replies nest the page one level deeper
            [Value::Array(inner)] => inner.as_slice(),
            items => items,
        },
        _ => &[],
    }
}

/// Array field, empty when absent or null
pub fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Values of `field` across localized name entries in the display language
pub fn dict_names(entries: &[Value], field: &str) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| opt_int(entry, "LanguageDictId") == Some(DISPLAY_LANGUAGE_ID))
        .map(|entry| str_field(entry, field))
        .collect()
}

/// Display name of a dictionary item
pub fn dict_item_name(item: &Value) -> String {
    dict_names(array_field(item, "DictionaryItemNames"), "ItemName")
        .into_iter()
        .next()
        .unwrap_or_else(|| "-".to_string())
}

/// Display name of a dictionary item stored under `key`
pub fn dict_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .map(dict_item_name)
        .unwrap_or_else(|| "-".to_string())
}

/// Render a `/Date(<millis>[+-hhmm])/` timestamp as `YYYY-MM-DD HH:MM:SS`.
///
/// Anything that does not look like one is returned unchanged.
pub fn parse_date(raw: &str) -> String {
    parse_wcf_date(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_wcf_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let inner = raw.strip_prefix("/Date(")?.strip_suffix(")/")?;

    // the sign of an offset is never the first character
    let (millis, offset) = match inner.get(1..)?.find(['+', '-']) {
        Some(pos) => inner.split_at(pos + 1),
        None => (inner, ""),
    };
    let millis: i64 = millis.parse().ok()?;

    let offset = if offset.is_empty() {
        FixedOffset::east_opt(0)?
    } else {
        let sign = if offset.starts_with('-') { -1 } else { 1 };
        let digits = &offset[1..];
        if digits.len() != 4 {
            return None;
        }
        let hours: i32 = digits.get(..2)?.parse().ok()?;
        let minutes: i32 = digits.get(2..)?.parse().ok()?;
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))?
    };

    Some(DateTime::from_timestamp_millis(millis)?.with_timezone(&offset))
}

/// Date field rendered for display
pub fn date_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(parse_date)
        .unwrap_or_else(|| "-".to_string())
}
