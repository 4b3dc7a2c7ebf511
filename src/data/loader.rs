use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Column, Dataset, DatasetError, Value};

/// Largest file accepted for loading (200 MiB).
pub const MAX_FILE_SIZE: u64 = 200 * 1024 * 1024;

/// Fields read as missing, matching the common spreadsheet NA tokens.
pub const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Tables wider than this still load, with a warning.
const WIDE_TABLE_COLUMNS: usize = 500;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Reasons a file cannot be turned into a [`Dataset`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Reading from a stream with no file path behind it failed.
    #[error("failed to read input: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is {size} bytes, larger than the {max_size} byte limit")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    #[error("unsupported text encoding: {encoding}")]
    UnsupportedEncoding { encoding: &'static str },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    /// No header row could be read.
    #[error("no columns to parse from file")]
    Empty,

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected JSON layout: {0}")]
    JsonShape(String),

    #[error("failed to read parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("failed to decode parquet column data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Shape(#[from] DatasetError),
}

pub type Result<T> = std::result::Result<T, LoadError>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by data rows
/// * `.json`    – `[{ "col": value, ... }, ...]`
/// * `.parquet` – flat (non-nested) columns
pub fn load_file(path: &Path) -> Result<Dataset> {
    check_file_size(path, MAX_FILE_SIZE)?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => read_csv(open(path)?)?,
        "json" => read_json(open(path)?)?,
        "parquet" | "pq" => read_parquet(open(path)?)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    log::info!(
        "loaded {} rows x {} columns from {}",
        dataset.len(),
        dataset.width(),
        path.display()
    );
    if dataset.width() > WIDE_TABLE_COLUMNS {
        log::warn!(
            "{} has {} columns; previews and charts may be slow",
            path.display(),
            dataset.width()
        );
    }
    Ok(dataset)
}

/// Reject files above `max_size` before reading them into memory.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| io_error(path, e))?;
    if metadata.len() > max_size {
        return Err(LoadError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, source: std::io::Error) -> LoadError {
    if source.kind() == std::io::ErrorKind::NotFound {
        LoadError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV from any byte stream.
///
/// The first record is the header. A column whose non-missing fields all
/// parse as numbers becomes numeric; otherwise its raw strings are kept.
/// Rows shorter than the header are padded with missing cells.
pub fn read_csv<R: Read>(mut reader: R) -> Result<Dataset> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(LoadError::Read)?;
    check_encoding(&bytes)?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    let mut records = csv_reader.records();
    let header = match records.next() {
        Some(record) => record?,
        None => return Err(LoadError::Empty),
    };
    let headers = dedupe_headers(header.iter());
    let width = headers.len();

    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    for (row_no, result) in records.enumerate() {
        let record = result?;
        if record.len() > width {
            return Err(LoadError::RaggedRow {
                row: row_no + 1,
                expected: width,
                found: record.len(),
            });
        }
        for (col_idx, cells) in raw.iter_mut().enumerate() {
            let field = record.get(col_idx).filter(|f| !is_na(f));
            cells.push(field.map(str::to_string));
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| Column::new(name, infer_column(cells)))
        .collect();
    Ok(Dataset::new(columns)?)
}

fn check_encoding(bytes: &[u8]) -> Result<()> {
    match bytes {
        [0xFF, 0xFE, ..] => Err(LoadError::UnsupportedEncoding {
            encoding: "UTF-16 LE",
        }),
        [0xFE, 0xFF, ..] => Err(LoadError::UnsupportedEncoding {
            encoding: "UTF-16 BE",
        }),
        _ => Ok(()),
    }
}

/// Repair header names: blanks become `Unnamed: {i}`, repeats get `.1`, `.2`, ...
fn dedupe_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for (i, name) in raw.enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            name.to_string()
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while !seen.insert(candidate.clone()) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        names.push(candidate);
    }
    names
}

fn is_na(field: &str) -> bool {
    NA_VALUES.contains(&field)
}

fn parse_number(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok()
}

fn infer_column(cells: Vec<Option<String>>) -> Vec<Value> {
    let numeric = cells.iter().flatten().all(|s| parse_number(s).is_some());
    cells
        .into_iter()
        .map(|cell| match cell {
            None => Value::Missing,
            Some(s) if numeric => parse_number(&s).map_or(Value::Missing, Value::number),
            Some(s) => Value::Text(s),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "name": "Alice", "score": 5 },
///   { "name": "Bob",   "score": null }
/// ]
/// ```
///
/// Columns appear in order of first occurrence; keys absent from a record
/// are missing cells. Unlike CSV, a column may mix numbers and strings.
pub fn read_json<R: Read>(reader: R) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_reader(reader)?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::JsonShape("expected a top-level array".into()))?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::JsonShape(format!("record {i} is not an object")))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    if headers.is_empty() {
        return Err(LoadError::Empty);
    }

    let columns = headers
        .into_iter()
        .map(|name| {
            let values = records
                .iter()
                .map(|rec| rec.get(&name).map_or(Value::Missing, json_to_value))
                .collect();
            Column::new(name, values)
        })
        .collect();
    Ok(Dataset::new(columns)?)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::Null => Value::Missing,
        JsonValue::Number(n) => n
            .as_f64()
            .map_or_else(|| Value::Text(n.to_string()), Value::number),
        JsonValue::String(s) => Value::Text(s.clone()),
        other => Value::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat columns.
///
/// Integer and floating-point columns become numeric, nulls become missing,
/// and every other Arrow type is rendered to text.
pub fn read_parquet(file: File) -> Result<Dataset> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut values: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    for batch in reader {
        let batch = batch?;
        for (col_idx, cells) in values.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                cells.push(arrow_value(array, row)?);
            }
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Ok(Dataset::new(columns)?)
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_value(col: &ArrayRef, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Missing);
    }
    let value = match col.data_type() {
        DataType::Float64 => Value::number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Float32 => Value::number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Int64 => Value::number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Int32 => Value::number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int16 => Value::number(col.as_primitive::<Int16Type>().value(row) as f64),
        DataType::Int8 => Value::number(col.as_primitive::<Int8Type>().value(row) as f64),
        DataType::UInt64 => Value::number(col.as_primitive::<UInt64Type>().value(row) as f64),
        DataType::UInt32 => Value::number(col.as_primitive::<UInt32Type>().value(row) as f64),
        DataType::UInt16 => Value::number(col.as_primitive::<UInt16Type>().value(row) as f64),
        DataType::UInt8 => Value::number(col.as_primitive::<UInt8Type>().value(row) as f64),
        DataType::Utf8 => Value::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::Text(col.as_string::<i64>().value(row).to_string()),
        _ => Value::Text(array_value_to_string(col, row)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ColumnKind;

    fn csv(text: &str) -> Dataset {
        read_csv(text.as_bytes()).unwrap()
    }

    #[test]
    fn numeric_and_text_columns_are_inferred() {
        let ds = csv("name,score\nAlice,5\nBob,\n");
        assert_eq!(ds.kinds(), vec![ColumnKind::Text, ColumnKind::Numeric]);
        assert_eq!(
            ds.column("score").unwrap().values,
            vec![Value::Number(5.0), Value::Missing]
        );
    }

    #[test]
    fn numbers_in_text_columns_keep_their_spelling() {
        let ds = csv("c\n5.0\nabc\n");
        assert_eq!(
            ds.columns()[0].values,
            vec![Value::text("5.0"), Value::text("abc")]
        );
    }

    #[test]
    fn na_tokens_are_missing() {
        let ds = csv("a,b\nNA,x\nnull,N/A\n1,y\n");
        assert_eq!(ds.missing_report().get("a"), Some(2));
        assert_eq!(ds.missing_report().get("b"), Some(1));
        assert_eq!(ds.columns()[0].kind(), ColumnKind::Numeric);
    }

    #[test]
    fn hyphen_is_not_missing() {
        let ds = csv("a\n-\n");
        assert_eq!(ds.columns()[0].values, vec![Value::text("-")]);
    }

    #[test]
    fn short_rows_are_padded() {
        let ds = csv("a,b,c\n1,2\n");
        assert_eq!(ds.cell(0, 2), Some(&Value::Missing));
    }

    #[test]
    fn long_rows_are_rejected() {
        let err = read_csv("a,b\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::RaggedRow {
                row: 1,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn headers_are_repaired() {
        let ds = csv("a,,a,a\n1,2,3,4\n");
        assert_eq!(ds.column_names(), vec!["a", "Unnamed: 1", "a.1", "a.2"]);
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let ds = csv("\u{feff}name\nx\n");
        assert_eq!(ds.column_names(), vec!["name"]);
    }

    #[test]
    fn bom_like_text_in_later_headers_is_kept() {
        let ds = csv("a,\u{feff}b\n1,2\n");
        assert_eq!(ds.column_names(), vec!["a", "\u{feff}b"]);
    }

    #[test]
    fn stream_read_failures_are_reported() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "device gone"))
            }
        }

        let err = read_csv(Broken).unwrap_err();
        assert!(matches!(err, LoadError::Read(_)));
        assert_eq!(err.to_string(), "failed to read input: device gone");
    }

    #[test]
    fn utf16_is_rejected() {
        let err = read_csv(&[0xFF, 0xFE, b'a', 0][..]).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedEncoding { .. }));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(read_csv("".as_bytes()), Err(LoadError::Empty)));
    }

    #[test]
    fn header_only_gives_empty_dataset() {
        let ds = csv("a,b\n");
        assert!(ds.is_empty());
        assert_eq!(ds.width(), 2);
    }

    #[test]
    fn json_records_may_mix_types() {
        let ds = read_json(r#"[{"a": 1, "b": "x"}, {"a": "two", "c": null}]"#.as_bytes()).unwrap();
        assert_eq!(ds.column_names(), vec!["a", "b", "c"]);
        assert_eq!(
            ds.column("a").unwrap().values,
            vec![Value::Number(1.0), Value::text("two")]
        );
        assert_eq!(ds.column("b").unwrap().values[1], Value::Missing);
        assert_eq!(ds.column("c").unwrap().missing_count(), 2);
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(matches!(
            read_json(r#"{"a": 1}"#.as_bytes()),
            Err(LoadError::JsonShape(_))
        ));
        assert!(matches!(
            read_json("[1, 2]".as_bytes()),
            Err(LoadError::JsonShape(_))
        ));
    }

    #[test]
    fn parquet_columns_map_to_values() {
        use std::sync::Arc;

        use arrow::array::{BooleanArray, Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, true),
            Field::new("score", DataType::Float64, true),
            Field::new("city", DataType::Utf8, true),
            Field::new("active", DataType::Boolean, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![Some(1), None, Some(3)])) as ArrayRef,
                Arc::new(Float64Array::from(vec![Some(2.5), Some(f64::NAN), None])),
                Arc::new(StringArray::from(vec![Some("New-York"), None, Some("Boston")])),
                Arc::new(BooleanArray::from(vec![true, false, true])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.pq");
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.column_names(), vec!["id", "score", "city", "active"]);
        assert_eq!(
            ds.column("id").unwrap().values,
            vec![Value::Number(1.0), Value::Missing, Value::Number(3.0)]
        );
        assert_eq!(
            ds.column("score").unwrap().values,
            vec![Value::Number(2.5), Value::Missing, Value::Missing]
        );
        assert_eq!(
            ds.column("city").unwrap().values,
            vec![Value::text("New-York"), Value::Missing, Value::text("Boston")]
        );
        assert_eq!(
            ds.column("active").unwrap().values,
            vec![Value::text("true"), Value::text("false"), Value::text("true")]
        );
        assert_eq!(ds.missing_report().total(), 4);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xlsx");
        std::fs::write(&path, "a\n1\n").unwrap();
        assert!(matches!(
            load_file(&path),
            Err(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            load_file(Path::new("/definitely/not/here.csv")),
            Err(LoadError::FileNotFound { .. })
        ));
    }

    #[test]
    fn oversized_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.csv");
        std::fs::write(&path, "a\n1\n2\n").unwrap();
        assert!(matches!(
            check_file_size(&path, 2),
            Err(LoadError::FileTooLarge { max_size: 2, .. })
        ));
    }
}
