use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Value – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell: a number, a string, or nothing.
///
/// A `Number` holding NaN counts as missing: [`Value::is_missing`] reports
/// it, and [`Dataset::new`] rewrites it to [`Value::Missing`].
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

// -- Manual Eq/Hash so rows can go in a HashSet --

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Missing, Value::Missing) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            // 0.0 == -0.0, so both must hash alike; likewise every NaN.
            Value::Number(v) if *v == 0.0 => 0.0f64.to_bits().hash(state),
            Value::Number(v) if v.is_nan() => f64::NAN.to_bits().hash(state),
            Value::Number(v) => v.to_bits().hash(state),
            Value::Text(s) => s.hash(state),
            Value::Missing => {}
        }
    }
}

impl fmt::Display for Value {
    /// Natural textual form: `5.0` renders as `5`, missing renders empty.
    /// Very large or very small magnitudes use exponent form (`1e+300`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(v) if v.is_nan() => Ok(()),
            Value::Number(v) => write_number(f, *v),
            Value::Text(s) => write!(f, "{s}"),
            Value::Missing => Ok(()),
        }
    }
}

/// Plain notation for magnitudes in `[1e-4, 1e16)`, exponent notation with
/// a signed, two-digit-minimum exponent outside it.
fn write_number(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    let magnitude = v.abs();
    if v == 0.0 || !v.is_finite() || (1e-4..1e16).contains(&magnitude) {
        return write!(f, "{v}");
    }
    let sci = format!("{v:e}");
    match sci.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().map_err(|_| fmt::Error)?;
            let sign = if exp < 0 { '-' } else { '+' };
            write!(f, "{mantissa}e{sign}{:02}", exp.unsigned_abs())
        }
        None => write!(f, "{sci}"),
    }
}

impl Value {
    /// Build a numeric cell, mapping NaN to [`Value::Missing`].
    pub fn number(v: f64) -> Self {
        if v.is_nan() {
            Value::Missing
        } else {
            Value::Number(v)
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Number(v) => v.is_nan(),
            Value::Text(_) => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::number(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Missing, Into::into)
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Whether a column holds numbers only or anything else.
///
/// A column is [`ColumnKind::Numeric`] when every non-missing cell is a
/// number; an all-missing column is therefore numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Text => write!(f, "text"),
        }
    }
}

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    /// Inspect the cells and classify the column.
    pub fn kind(&self) -> ColumnKind {
        let all_numeric = self
            .values
            .iter()
            .all(|v| matches!(v, Value::Number(_) | Value::Missing));
        if all_numeric {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        }
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    /// A column's length disagrees with the first column.
    #[error("column '{column}' has {found} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },

    /// A row has a different number of cells than there are headers.
    #[error("row {row} has {found} values, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// An in-memory table stored column-major. Every column has the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset from columns, rejecting ragged input.
    ///
    /// NaN numbers are stored as [`Value::Missing`].
    pub fn new(mut columns: Vec<Column>) -> Result<Self, DatasetError> {
        for value in columns.iter_mut().flat_map(|c| c.values.iter_mut()) {
            if value.is_missing() {
                *value = Value::Missing;
            }
        }
        let n_rows = columns.first().map_or(0, Column::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
            return Err(DatasetError::ColumnLength {
                column: bad.name.clone(),
                expected: n_rows,
                found: bad.len(),
            });
        }
        Ok(Dataset { columns, n_rows })
    }

    /// Build a dataset from a header and row-major cells.
    pub fn from_rows<S: Into<String>>(
        headers: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, DatasetError> {
        let mut columns: Vec<Column> = headers
            .into_iter()
            .map(|h| Column::new(h, Vec::with_capacity(rows.len())))
            .collect();

        for (row_no, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DatasetError::RowLength {
                    row: row_no,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
            for (col, value) in columns.iter_mut().zip(row) {
                col.values.push(value);
            }
        }

        Dataset::new(columns)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Mutable access for the cleaning stages. Stages may rewrite cells in
    /// place but must keep every column the same length; row removal goes
    /// through [`Dataset::retain_rows`].
    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Cells of one row in column order.
    pub fn row(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.columns.iter().filter_map(move |c| c.values.get(index))
    }

    /// All rows, each as a vector of borrowed cells.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.n_rows).map(move |i| self.row(i).collect())
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.columns.get(column)?.values.get(row)
    }

    /// Keep only rows whose entry in `keep` is `true`.
    pub(crate) fn retain_rows(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.n_rows);
        for col in &mut self.columns {
            let values = std::mem::take(&mut col.values);
            col.values = values
                .into_iter()
                .zip(keep)
                .filter_map(|(v, &k)| k.then_some(v))
                .collect();
        }
        self.n_rows = keep.iter().filter(|&&k| k).count();
    }

    /// Per-column kinds in column order.
    pub fn kinds(&self) -> Vec<ColumnKind> {
        self.columns.iter().map(Column::kind).collect()
    }

    /// Count missing cells per column.
    pub fn missing_report(&self) -> MissingValueReport {
        MissingValueReport {
            columns: self
                .columns
                .iter()
                .map(|c| ColumnMissing {
                    column: c.name.clone(),
                    missing: c.missing_count(),
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// MissingValueReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

/// Missing-cell count per column, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MissingValueReport {
    pub columns: Vec<ColumnMissing>,
}

impl MissingValueReport {
    pub fn get(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.missing)
    }

    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }

    /// Largest per-column count, used to scale charts.
    pub fn max(&self) -> usize {
        self.columns.iter().map(|c| c.missing).max().unwrap_or(0)
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.columns.iter().map(|c| (c.column.as_str(), c.missing))
    }
}
