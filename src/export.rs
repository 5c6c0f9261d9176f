use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::data::model::{COUNTRY_COLUMN, CellValue, UnifiedTable};
use crate::data::summary::SummaryRecord;

/// Write summary records to `.csv` or `.json`, chosen by extension.
pub fn export_summary(path: &Path, summary: &[SummaryRecord]) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_summary_csv(create(path)?, summary)?,
        "json" => serde_json::to_writer_pretty(create(path)?, summary)
            .context("writing summary JSON")?,
        other => bail!("Unsupported export extension: .{other}"),
    }
    log::info!("Exported {} summary rows to {}", summary.len(), path.display());
    Ok(())
}

fn create(path: &Path) -> Result<std::fs::File> {
    std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))
}

fn write_summary_csv<W: Write>(out: W, summary: &[SummaryRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for record in summary {
        writer.serialize(record).context("writing summary CSV")?;
    }
    writer.flush().context("flushing summary CSV")?;
    Ok(())
}

/// Write the given rows of the unified table as CSV, `Country` last.
pub fn write_rows_csv<W: Write>(out: W, table: &UnifiedTable, rows: &[usize]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(table.columns.iter().map(String::as_str).chain([COUNTRY_COLUMN]))
        .context("writing CSV header")?;
    for &i in rows {
        let row = table.rows.get(i).context("row index out of range")?;
        let cells = row
            .cells
            .iter()
            .map(|c| match c {
                CellValue::Null => String::new(),
                CellValue::Float(v) => v.to_string(),
                other => other.to_string(),
            })
            .chain([row.country.label().to_string()]);
        writer.write_record(cells).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Country, TaggedRow};

    fn summary() -> Vec<SummaryRecord> {
        vec![
            SummaryRecord {
                country: Country::SierraLeone,
                count: 2,
                mean: 10.0,
                median: 10.0,
                std: Some(7.071),
            },
            SummaryRecord {
                country: Country::Togo,
                count: 1,
                mean: 3.5,
                median: 3.5,
                std: None,
            },
        ]
    }

    #[test]
    fn summary_csv_has_header_and_blank_std() {
        let mut buf = Vec::new();
        write_summary_csv(&mut buf, &summary()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "country,count,mean,median,std");
        assert_eq!(lines[1], "Sierra Leone,2,10.0,10.0,7.071");
        assert_eq!(lines[2], "Togo,1,3.5,3.5,");
    }

    #[test]
    fn summary_json_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        export_summary(&path, &summary()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["country"], "Sierra Leone");
        assert!(value[1]["std"].is_null());
    }

    #[test]
    fn unknown_export_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export_summary(&dir.path().join("summary.xlsx"), &summary()).is_err());
    }

    #[test]
    fn filtered_rows_are_written_with_country() {
        let table = UnifiedTable {
            columns: vec!["Timestamp".into(), "GHI".into()],
            rows: vec![
                TaggedRow {
                    country: Country::Benin,
                    cells: vec![CellValue::Text("t1".into()), CellValue::Float(1.5)],
                },
                TaggedRow {
                    country: Country::Togo,
                    cells: vec![CellValue::Text("t2".into()), CellValue::Null],
                },
            ],
        };
        let mut buf = Vec::new();
        write_rows_csv(&mut buf, &table, &[1]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Timestamp,GHI,Country\nt2,,Togo\n");
    }
}
