//! Invariants of the cleaning pipeline over generated tables.

use proptest::prelude::*;

use datacure::data::cleaner::SPECIAL_CHARS;
use datacure::data::{clean, Column, ColumnKind, Dataset, Value};

fn cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        2 => Just(Value::Missing),
        3 => (-5i32..5).prop_map(|n| Value::Number(n as f64)),
        1 => (-100.0f64..100.0).prop_map(Value::Number),
        4 => "[a-c +*-]{0,4}".prop_map(Value::Text),
    ]
}

fn numeric_cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        1 => Just(Value::Missing),
        3 => (-3i32..3).prop_map(|n| Value::Number(n as f64)),
    ]
}

/// Tables of 1–4 columns and 0–12 rows, some columns purely numeric.
fn dataset() -> impl Strategy<Value = Dataset> {
    (1usize..5, 0usize..13).prop_flat_map(|(width, height)| {
        prop::collection::vec(
            prop_oneof![
                prop::collection::vec(cell(), height),
                prop::collection::vec(numeric_cell(), height),
            ],
            width,
        )
        .prop_map(|columns| {
            let columns = columns
                .into_iter()
                .enumerate()
                .map(|(i, values)| Column::new(format!("c{i}"), values))
                .collect();
            Dataset::new(columns).expect("equal-length columns")
        })
    })
}

proptest! {
    #[test]
    fn no_missing_cells_remain(ds in dataset()) {
        let outcome = clean(ds);
        prop_assert!(outcome.after.is_clean());
        for col in outcome.cleaned.columns() {
            prop_assert!(col.values.iter().all(|v| !v.is_missing()));
        }
    }

    #[test]
    fn columns_are_preserved(ds in dataset()) {
        let names: Vec<String> = ds.column_names().iter().map(|s| s.to_string()).collect();
        let cleaned = clean(ds).cleaned;
        prop_assert_eq!(cleaned.column_names(), names.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn row_count_never_grows(ds in dataset()) {
        let rows_in = ds.len();
        let outcome = clean(ds);
        prop_assert!(outcome.cleaned.len() <= rows_in);
        prop_assert_eq!(outcome.cleaned.len() + outcome.duplicates_removed, rows_in);
    }

    #[test]
    fn before_report_counts_input_missing(ds in dataset()) {
        let expected = ds.missing_report();
        prop_assert_eq!(clean(ds).before, expected);
    }

    #[test]
    fn no_duplicate_rows_remain(ds in dataset()) {
        let cleaned = clean(ds).cleaned;
        let rows: Vec<_> = cleaned.rows().collect();
        for (i, a) in rows.iter().enumerate() {
            for b in &rows[i + 1..] {
                prop_assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn text_columns_lose_special_chars(ds in dataset()) {
        let cleaned = clean(ds).cleaned;
        for col in cleaned.columns() {
            for s in col.values.iter().filter_map(Value::as_str) {
                prop_assert!(!s.contains(SPECIAL_CHARS));
                prop_assert_eq!(s, s.trim());
            }
        }
    }

    #[test]
    fn numeric_columns_stay_numeric(ds in dataset()) {
        let kinds = ds.kinds();
        let cleaned = clean(ds).cleaned;
        for (col, kind) in cleaned.columns().iter().zip(kinds) {
            if kind == ColumnKind::Numeric {
                prop_assert_eq!(col.kind(), ColumnKind::Numeric);
            }
        }
    }

    #[test]
    fn cleaning_is_idempotent(ds in dataset()) {
        let once = clean(ds).cleaned;
        let twice = clean(once.clone());
        prop_assert_eq!(&twice.cleaned, &once);
        prop_assert_eq!(twice.duplicates_removed, 0);
    }
}

#[test]
fn first_occurrence_is_kept() {
    let a = || vec![Value::text("A"), Value::Number(1.0)];
    let b = vec![Value::text("B"), Value::Number(2.0)];
    let ds = Dataset::from_rows(["k", "v"], vec![a(), b.clone(), a()]).unwrap();
    let cleaned = clean(ds).cleaned;
    let rows: Vec<Vec<Value>> = cleaned
        .rows()
        .map(|r| r.into_iter().cloned().collect())
        .collect();
    assert_eq!(rows, vec![a(), b]);
}
