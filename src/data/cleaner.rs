//! The table cleaner: a fixed four-stage pipeline over an in-memory
//! [`Dataset`].
//!
//! ```text
//!   Dataset ──► fill_missing ──► normalize_kinds ──► strip_special_chars
//!                                                     + replace_sentinels
//!                                                          │
//!                 CleanOutcome ◄── drop_duplicate_rows ◄───┘
//! ```
//!
//! Column kinds are snapshotted once, before the first stage mutates
//! anything, and every stage dispatches on that snapshot.

use std::collections::HashSet;

use super::model::{ColumnKind, Dataset, MissingValueReport, Value};

/// Characters replaced by a space in text columns.
pub const SPECIAL_CHARS: [char; 3] = ['+', '*', '-'];

/// Whole-cell literals swapped for [`FILL_VALUE`] in the final pass.
pub const SENTINEL_LITERALS: [&str; 2] = ["-", " "];

/// Value used for missing cells and sentinel literals.
pub const FILL_VALUE: f64 = 0.0;

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

/// States the pipeline passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Filled,
    Normalized,
    Standardized,
    Deduplicated,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Filled,
        Stage::Normalized,
        Stage::Standardized,
        Stage::Deduplicated,
    ];

    /// Fraction of the pipeline completed once this stage is reached.
    pub fn fraction(self) -> f32 {
        match self {
            Stage::Filled => 0.25,
            Stage::Normalized => 0.5,
            Stage::Standardized => 0.75,
            Stage::Deduplicated => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Filled => "Missing values filled",
            Stage::Normalized => "Mixed columns converted to text",
            Stage::Standardized => "Special characters removed",
            Stage::Deduplicated => "Duplicate rows removed",
        }
    }
}

/// Result of a cleaning pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOutcome {
    pub cleaned: Dataset,
    /// Missing counts of the input, taken before anything was filled.
    pub before: MissingValueReport,
    /// Missing counts of `cleaned`.
    pub after: MissingValueReport,
    pub rows_before: usize,
    pub duplicates_removed: usize,
}

impl CleanOutcome {
    pub fn into_parts(self) -> (Dataset, MissingValueReport, MissingValueReport) {
        (self.cleaned, self.before, self.after)
    }
}

/// Run the full pipeline.
pub fn clean(dataset: Dataset) -> CleanOutcome {
    clean_with_progress(dataset, |_| {})
}

/// Run the full pipeline, reporting each completed stage to `observer`.
pub fn clean_with_progress(mut dataset: Dataset, mut observer: impl FnMut(Stage)) -> CleanOutcome {
    let before = dataset.missing_report();
    let rows_before = dataset.len();
    let kinds = dataset.kinds();

    fill_missing(&mut dataset);
    log::debug!("filled {} missing cells", before.total());
    observer(Stage::Filled);

    normalize_kinds(&mut dataset, &kinds);
    observer(Stage::Normalized);

    strip_special_chars(&mut dataset, &kinds);
    replace_sentinels(&mut dataset);
    observer(Stage::Standardized);

    let duplicates_removed = drop_duplicate_rows(&mut dataset);
    log::debug!("removed {duplicates_removed} duplicate rows");
    observer(Stage::Deduplicated);

    let after = dataset.missing_report();
    log::info!(
        "cleaned {} columns: {rows_before} rows in, {} rows out, {} missing cells filled",
        dataset.width(),
        dataset.len(),
        before.total()
    );

    CleanOutcome {
        cleaned: dataset,
        before,
        after,
        rows_before,
        duplicates_removed,
    }
}

/// Stage 1: every missing cell, in every column, becomes [`FILL_VALUE`].
pub fn fill_missing(dataset: &mut Dataset) {
    for col in dataset.columns_mut() {
        for value in &mut col.values {
            if value.is_missing() {
                *value = Value::Number(FILL_VALUE);
            }
        }
    }
}

/// Stage 2: coerce every cell of a text column to its textual form.
/// Numeric columns are left untouched.
pub fn normalize_kinds(dataset: &mut Dataset, kinds: &[ColumnKind]) {
    for (col, kind) in dataset.columns_mut().iter_mut().zip(kinds) {
        match kind {
            ColumnKind::Numeric => {}
            ColumnKind::Text => {
                for value in &mut col.values {
                    if !matches!(value, Value::Text(_)) {
                        *value = Value::Text(value.to_string());
                    }
                }
            }
        }
    }
}

/// Stage 3a: in text columns, replace each of [`SPECIAL_CHARS`] with a
/// space and trim the result.
pub fn strip_special_chars(dataset: &mut Dataset, kinds: &[ColumnKind]) {
    for (col, kind) in dataset.columns_mut().iter_mut().zip(kinds) {
        if *kind != ColumnKind::Text {
            continue;
        }
        for value in &mut col.values {
            if let Value::Text(s) = value {
                *s = strip_text(s);
            }
        }
    }
}

/// Replace special characters with spaces, then trim surrounding whitespace.
pub fn strip_text(s: &str) -> String {
    s.replace(SPECIAL_CHARS, " ").trim().to_string()
}

/// Stage 3b: table-wide pass turning cells equal to one of
/// [`SENTINEL_LITERALS`] into [`FILL_VALUE`], regardless of column kind.
///
/// Stage 3a already reduces such cells to empty strings in text columns, so
/// on pipeline output this only fires for text cells that 3a did not visit.
pub fn replace_sentinels(dataset: &mut Dataset) -> usize {
    let mut replaced = 0;
    for col in dataset.columns_mut() {
        for value in &mut col.values {
            let is_sentinel = value
                .as_str()
                .is_some_and(|s| SENTINEL_LITERALS.contains(&s));
            if is_sentinel {
                *value = Value::Number(FILL_VALUE);
                replaced += 1;
            }
        }
    }
    replaced
}

/// Stage 4: drop rows identical to an earlier row across all columns,
/// keeping the first occurrence. Returns the number of rows removed.
pub fn drop_duplicate_rows(dataset: &mut Dataset) -> usize {
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(dataset.len());
        dataset.rows().map(|row| seen.insert(row)).collect()
    };
    let removed = keep.iter().filter(|&&k| !k).count();
    if removed > 0 {
        dataset.retain_rows(&keep);
    }
    removed
}
