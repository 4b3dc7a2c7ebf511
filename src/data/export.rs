use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::model::{Dataset, MissingValueReport};

/// Default name offered when saving the cleaned table.
pub const CLEANED_FILE_NAME: &str = "cleaned_dataset.csv";

/// MIME type of the exported table.
pub const CSV_MIME: &str = "text/csv";

/// Default name offered when saving the missing-value reports.
pub const REPORT_FILE_NAME: &str = "missing_values_report.json";

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Write the header row followed by every row. Numbers use their natural
/// form and missing cells are empty fields.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(dataset.column_names())
        .context("writing CSV header")?;
    for (row_no, row) in dataset.rows().enumerate() {
        out.write_record(row.iter().map(|v| v.to_string()))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    out.flush().context("flushing CSV output")?;
    Ok(())
}

pub fn to_csv_string(dataset: &Dataset) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(dataset, &mut buf)?;
    String::from_utf8(buf).context("CSV output is not valid UTF-8")
}

pub fn save_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(dataset, std::io::BufWriter::new(file))?;
    log::info!("saved {} rows to {}", dataset.len(), path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Missing-value reports
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ReportPair<'a> {
    before: &'a MissingValueReport,
    after: &'a MissingValueReport,
}

/// Render the before/after reports as pretty JSON.
pub fn report_to_json(before: &MissingValueReport, after: &MissingValueReport) -> Result<String> {
    serde_json::to_string_pretty(&ReportPair { before, after })
        .context("serializing missing-value report")
}

pub fn save_report_json(
    before: &MissingValueReport,
    after: &MissingValueReport,
    path: &Path,
) -> Result<()> {
    let json = report_to_json(before, after)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    log::info!("saved missing-value report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    #[test]
    fn csv_uses_natural_number_form() {
        let ds = Dataset::from_rows(
            ["name", "score"],
            vec![
                vec!["Alice".into(), 5.0.into()],
                vec!["Bob".into(), 0.25.into()],
                vec!["Eve".into(), Value::Missing],
            ],
        )
        .unwrap();
        assert_eq!(
            to_csv_string(&ds).unwrap(),
            "name,score\nAlice,5\nBob,0.25\nEve,\n"
        );
    }

    #[test]
    fn fields_needing_quotes_are_quoted() {
        let ds = Dataset::from_rows(["t"], vec![vec!["a,b".into()], vec!["say \"hi\"".into()]])
            .unwrap();
        assert_eq!(
            to_csv_string(&ds).unwrap(),
            "t\n\"a,b\"\n\"say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn report_json_has_both_sides() {
        let ds = Dataset::from_rows(["a"], vec![vec![Value::Missing]]).unwrap();
        let before = ds.missing_report();
        let after = MissingValueReport::default();
        let json: serde_json::Value =
            serde_json::from_str(&report_to_json(&before, &after).unwrap()).unwrap();
        assert_eq!(json["before"]["columns"][0]["column"], "a");
        assert_eq!(json["before"]["columns"][0]["missing"], 1);
        assert_eq!(json["after"]["columns"].as_array().unwrap().len(), 0);
    }
}
