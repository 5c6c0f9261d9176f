use std::collections::BTreeSet;

use super::error::{PipelineError, PipelineResult};
use super::model::{COUNTRY_COLUMN, CellValue, Country, RawTable, TaggedRow, UnifiedTable};

/// Label each source with its country and concatenate them in
/// [`Country::ALL`] order.
///
/// The result has the union of the source columns (first-seen order); cells
/// a source does not have are `Null`. Rows keep their order within a source
/// and nothing is dropped or deduplicated.
pub fn merge_sources(sources: [(Country, &RawTable); 3]) -> PipelineResult<UnifiedTable> {
    let mut sources = sources;
    sources.sort_by_key(|(country, _)| *country);
    debug_assert!(sources.iter().map(|(c, _)| *c).eq(Country::ALL));

    for (country, table) in &sources {
        check_shape(*country, table)?;
    }

    let (_, first) = sources[0];
    for (country, table) in &sources[1..] {
        if !table.columns.iter().any(|c| first.columns.contains(c)) {
            return Err(PipelineError::ShapeMismatch {
                country: *country,
                reason: format!("no column in common with {} data", sources[0].0),
            });
        }
    }

    let mut columns: Vec<String> = Vec::new();
    for (_, table) in &sources {
        for col in &table.columns {
            if !columns.contains(col) {
                columns.push(col.clone());
            }
        }
    }

    let total: usize = sources.iter().map(|(_, t)| t.len()).sum();
    let mut rows = Vec::with_capacity(total);

    for (country, table) in &sources {
        // Position of each unified column inside this source, if present.
        let mapping: Vec<Option<usize>> =
            columns.iter().map(|c| table.column_index(c)).collect();

        rows.extend(table.rows.iter().map(|row| TaggedRow {
            country: *country,
            cells: mapping
                .iter()
                .map(|idx| {
                    idx.and_then(|i| row.get(i).cloned())
                        .unwrap_or(CellValue::Null)
                })
                .collect(),
        }));
        log::debug!("merged {} rows from {country}", table.len());
    }

    Ok(UnifiedTable { columns, rows })
}

fn check_shape(country: Country, table: &RawTable) -> PipelineResult<()> {
    let mut seen = BTreeSet::new();
    for col in &table.columns {
        if col == COUNTRY_COLUMN {
            return Err(PipelineError::ShapeMismatch {
                country,
                reason: format!("source already has a '{COUNTRY_COLUMN}' column"),
            });
        }
        if !seen.insert(col.as_str()) {
            return Err(PipelineError::ShapeMismatch {
                country,
                reason: format!("duplicate column '{col}'"),
            });
        }
    }
    if seen.is_empty() {
        return Err(PipelineError::ShapeMismatch {
            country,
            reason: "source has no columns".to_string(),
        });
    }
    Ok(())
}
