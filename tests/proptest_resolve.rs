//! Property-based tests using proptest
//!
//! These tests check name resolution and table building against randomized
//! listings and records.

use oktawave::cells;
use oktawave::error::ResolveError;
use oktawave::report::Table;
use oktawave::resolve::{find_by_name, resolve_with, Category, NamedResource};
use proptest::prelude::*;

/// Generate a listing with unique names
fn arb_unique_listing() -> impl Strategy<Value = Vec<NamedResource>> {
    prop::collection::hash_set("[a-z][a-z0-9-]{0,15}", 1..30).prop_map(|names| {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| NamedResource::new(i as i64 + 1, name))
            .collect()
    })
}

/// Generate arbitrary (id, name, status) records
fn arb_records() -> impl Strategy<Value = Vec<(i64, String, String)>> {
    prop::collection::vec(
        (
            any::<i64>(),
            "[A-Za-z0-9 _-]{0,20}",
            prop_oneof![
                Just("Running".to_string()),
                Just("Stopped".to_string()),
                Just("Pending".to_string())
            ],
        ),
        0..50,
    )
}

proptest! {
    /// Every name of a unique-name listing resolves to its own ID
    #[test]
    fn prop_unique_names_resolve(listing in arb_unique_listing()) {
        for item in &listing {
            let id = find_by_name(Category::Oci, &item.name, &listing).unwrap();
            prop_assert_eq!(id, item.id);
        }
    }

    /// A duplicated name is always ambiguous, never last-wins
    #[test]
    fn prop_duplicate_names_are_ambiguous(
        listing in arb_unique_listing(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut listing = listing;
        let dup = listing[pick.index(listing.len())].name.clone();
        listing.push(NamedResource::new(10_000, dup.clone()));

        let err = find_by_name(Category::Ovs, &dup, &listing).unwrap_err();
        let is_ambiguous = matches!(err, ResolveError::Ambiguous { matches: 2, .. });
        prop_assert!(is_ambiguous);
    }

    /// Integer tokens resolve to themselves without touching the listing
    #[test]
    fn prop_numeric_tokens_short_circuit(n in any::<i64>(), pad in " {0,3}") {
        let token = format!("{}{}{}", pad, n, pad);
        let id = tokio_test::block_on(resolve_with(Category::Ordb, &token, || async {
            Err::<Vec<NamedResource>, _>(anyhow::anyhow!("listing must not be called"))
        }))
        .unwrap();
        prop_assert_eq!(id, n);
    }

    /// Non-empty records give a header plus one row per record, in order
    #[test]
    fn prop_table_rows_follow_records(records in arb_records()) {
        let table = Table::from_records(&["ID", "Name", "Status"], &records, |(id, name, status)| {
            cells![id, name, status]
        })
        .unwrap();

        match table {
            None => prop_assert!(records.is_empty()),
            Some(table) => {
                prop_assert_eq!(table.line_count(), records.len() + 1);
                for (row, (id, name, _)) in table.rows().iter().zip(&records) {
                    prop_assert_eq!(&row[0], &id.to_string());
                    prop_assert_eq!(&row[1], name);
                }
                prop_assert_eq!(table.render(), table.render());
            }
        }
    }

    /// Ordered key/value rows come out sorted by their numeric prefix
    #[test]
    fn prop_ordered_key_value_sorted(prefixes in prop::collection::vec(-1000i64..1000, 1..20)) {
        let data: Vec<(String, [String; 1])> = prefixes
            .iter()
            .map(|p| (format!("{} label{}", p, p), [p.to_string()]))
            .collect();

        let table = Table::key_value(None, data, true).unwrap().unwrap();
        let values: Vec<i64> = table
            .rows()
            .iter()
            .map(|row| row[1].parse().unwrap())
            .collect();

        let mut sorted = prefixes.clone();
        sorted.sort();
        prop_assert_eq!(values, sorted);
        prop_assert!(table.rows().iter().all(|row| row[0].starts_with("label")));
    }
}
