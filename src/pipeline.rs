use crate::config::{SourceMode, cli_flag};
use crate::data::cache::{SourceCache, SourceKey};
use crate::data::error::{PipelineError, PipelineResult};
use crate::data::filter::{FilterRequest, RangeSelection, ValueRange, apply_filter};
use crate::data::loader::SourceInput;
use crate::data::merge::merge_sources;
use crate::data::model::{Country, UnifiedTable};
use crate::data::summary::{CountryAverage, SummaryRecord, averages, summarize_groups};

// ---------------------------------------------------------------------------
// Source set
// ---------------------------------------------------------------------------

/// One optional input per country.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSet {
    slots: [Option<SourceInput>; 3],
}

impl SourceSet {
    pub fn get(&self, country: Country) -> Option<&SourceInput> {
        self.slots[country.index()].as_ref()
    }

    pub fn set(&mut self, country: Country, input: SourceInput) {
        self.slots[country.index()] = Some(input);
    }

    pub fn clear(&mut self, country: Country) {
        self.slots[country.index()] = None;
    }

    /// Countries without an input, in country order.
    pub fn missing(&self) -> Vec<Country> {
        Country::ALL
            .into_iter()
            .filter(|c| self.get(*c).is_none())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Load + merge stage
// ---------------------------------------------------------------------------

/// Result of the load stage.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Not every country has a source; nothing was read.
    Incomplete { missing: Vec<Country> },
    Ready(UnifiedTable),
}

impl LoadOutcome {
    /// Warning to show while sources are missing, worded for how sources
    /// reach the app.
    pub fn status_message(&self, mode: SourceMode) -> Option<String> {
        let LoadOutcome::Incomplete { missing } = self else {
            return None;
        };
        let names: Vec<&str> = missing.iter().map(|c| c.label()).collect();
        let message = match mode {
            SourceMode::Upload => format!(
                "Please upload all three cleaned CSV files (Benin, Sierra Leone, and Togo) \
                 to continue. Missing: {}",
                names.join(", ")
            ),
            SourceMode::LocalPaths => {
                let flags: Vec<&str> = missing.iter().map(|c| cli_flag(*c)).collect();
                format!(
                    "No data file for {}. Pass {} or a --data-dir holding the cleaned CSV \
                     files, or open the missing files from the File menu.",
                    names.join(", "),
                    flags.join(", ")
                )
            }
        };
        Some(message)
    }
}

/// Read all three sources (through the cache) and merge them.
///
/// Cache entries that no longer belong to the source set are dropped.
pub fn load_sources(sources: &SourceSet, cache: &mut SourceCache) -> PipelineResult<LoadOutcome> {
    let missing = sources.missing();
    if !missing.is_empty() {
        log::warn!("{} source(s) missing: {missing:?}", missing.len());
        return Ok(LoadOutcome::Incomplete { missing });
    }

    let mut keys: Vec<SourceKey> = Vec::with_capacity(3);
    let mut tables = Vec::with_capacity(3);
    for country in Country::ALL {
        let input = sources
            .get(country)
            .ok_or_else(|| PipelineError::MalformedSource {
                country,
                reason: "no source selected".to_string(),
            })?;
        let (key, table) =
            cache
                .get_or_load(input)
                .map_err(|e| PipelineError::MalformedSource {
                    country,
                    reason: format!("{e:#}"),
                })?;
        keys.push(key);
        tables.push(table);
    }
    cache.retain(&keys);
    log::debug!("{} tables cached", cache.len());

    let unified = merge_sources([
        (Country::Benin, tables[0].as_ref()),
        (Country::SierraLeone, tables[1].as_ref()),
        (Country::Togo, tables[2].as_ref()),
    ])?;
    if unified.is_empty() {
        log::warn!("All three sources are empty");
    }
    log::info!(
        "Unified table: {} rows, columns {:?}",
        unified.len(),
        unified.columns
    );
    Ok(LoadOutcome::Ready(unified))
}

// ---------------------------------------------------------------------------
// Filter + aggregate stage
// ---------------------------------------------------------------------------

/// Everything the presentation layer needs for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// The request with its range settled against the data.
    pub request: FilterRequest,
    pub bounds: Option<ValueRange>,
    pub active_range: Option<ValueRange>,
    /// Indices of the filtered rows in the unified table.
    pub rows: Vec<usize>,
    pub total_rows: usize,
    /// Metric values per country, for the box plot.
    pub groups: Vec<(Country, Vec<f64>)>,
    pub summary: Vec<SummaryRecord>,
    pub averages: Vec<CountryAverage>,
}

impl PipelineOutput {
    /// Row-count notice shown after filtering.
    pub fn row_notice(&self) -> String {
        format!(
            "Showing {} of {} rows for {}",
            self.rows.len(),
            self.total_rows,
            self.request.metric
        )
    }
}

/// Filter the unified table and aggregate the result.
pub fn run(table: &UnifiedTable, request: &FilterRequest) -> PipelineResult<PipelineOutput> {
    let view = apply_filter(table, request)?;
    let groups = view.grouped_values();
    let summary = summarize_groups(&groups);
    let averages = averages(&groups);

    let mut settled = request.clone();
    if let Some(active) = view.active_range() {
        if view.bounds() != Some(active) {
            settled.range = RangeSelection::Custom(active);
        } else {
            settled.range = RangeSelection::Full;
        }
    }

    if view.is_empty() {
        log::debug!("no rows pass the filter for {}", request.metric);
    } else {
        log::debug!(
            "{} rows pass the filter for {} ({} countries)",
            view.len(),
            request.metric,
            request.countries.len()
        );
    }

    Ok(PipelineOutput {
        request: settled,
        bounds: view.bounds(),
        active_range: view.active_range(),
        rows: view.indices().to_vec(),
        total_rows: table.len(),
        groups,
        summary,
        averages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Metric;

    fn upload(name: &str, csv: &str) -> SourceInput {
        SourceInput::Upload {
            name: name.into(),
            bytes: csv.as_bytes().to_vec(),
        }
    }

    fn full_set() -> SourceSet {
        let mut set = SourceSet::default();
        set.set(
            Country::Benin,
            upload("benin.csv", "Timestamp,GHI,DNI,DHI\nt1,10,1,0\nt2,20,2,0\nt3,30,3,0\n"),
        );
        set.set(
            Country::SierraLeone,
            upload("sierraleone.csv", "Timestamp,GHI,DNI,DHI\nt1,5,4,0\nt2,15,5,0\n"),
        );
        set.set(Country::Togo, upload("togo.csv", "Timestamp,GHI,DNI,DHI\n"));
        set
    }

    fn ready(outcome: LoadOutcome) -> UnifiedTable {
        match outcome {
            LoadOutcome::Ready(table) => table,
            LoadOutcome::Incomplete { missing } => panic!("unexpected missing {missing:?}"),
        }
    }

    #[test]
    fn two_of_three_sources_is_incomplete() {
        let mut set = full_set();
        set.clear(Country::Togo);
        let mut cache = SourceCache::default();

        let outcome = load_sources(&set, &mut cache).unwrap();
        assert!(matches!(
            &outcome,
            LoadOutcome::Incomplete { missing } if missing == &vec![Country::Togo]
        ));
        let upload_msg = outcome.status_message(SourceMode::Upload).unwrap();
        assert!(upload_msg.starts_with("Please upload all three"));
        assert!(upload_msg.contains("Togo"));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn local_mode_incomplete_message_names_flags() {
        let mut set = full_set();
        set.clear(Country::SierraLeone);
        set.clear(Country::Togo);
        let outcome = load_sources(&set, &mut SourceCache::default()).unwrap();

        let msg = outcome.status_message(SourceMode::LocalPaths).unwrap();
        assert!(msg.contains("Sierra Leone, Togo"));
        assert!(msg.contains("--sierra-leone, --togo"));
        assert!(!msg.contains("upload"));
    }

    #[test]
    fn complete_set_merges_all_rows() {
        let mut cache = SourceCache::default();
        let table = ready(load_sources(&full_set(), &mut cache).unwrap());
        assert_eq!(table.len(), 5);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn malformed_source_names_its_country() {
        let mut set = full_set();
        set.set(Country::SierraLeone, upload("sierraleone.csv", ""));
        let mut cache = SourceCache::default();

        let err = load_sources(&set, &mut cache).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MalformedSource { country: Country::SierraLeone, .. }
        ));
    }

    #[test]
    fn replaced_source_is_evicted_from_cache() {
        let mut set = full_set();
        let mut cache = SourceCache::default();
        load_sources(&set, &mut cache).unwrap();

        set.set(Country::Togo, upload("togo.csv", "Timestamp,GHI,DNI,DHI\nt1,1,1,1\n"));
        let table = ready(load_sources(&set, &mut cache).unwrap());
        assert_eq!(table.len(), 6);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn run_produces_summary_and_averages() {
        let mut cache = SourceCache::default();
        let table = ready(load_sources(&full_set(), &mut cache).unwrap());

        let output = run(&table, &FilterRequest::new(Metric::Ghi)).unwrap();
        assert_eq!(output.rows.len(), 5);
        assert_eq!(output.summary.len(), 2);
        assert_eq!(output.summary[0].country, Country::Benin);
        assert_eq!(output.summary[0].mean, 20.0);
        assert_eq!(output.summary[0].median, 20.0);
        assert_eq!(output.summary[1].country, Country::SierraLeone);
        assert_eq!(output.summary[1].mean, 10.0);
        assert_eq!(output.summary[1].median, 10.0);
        assert_eq!(output.averages.len(), 2);
        assert_eq!(output.request.range, RangeSelection::Full);
        assert_eq!(output.row_notice(), "Showing 5 of 5 rows for GHI");
    }

    #[test]
    fn empty_selection_is_not_an_error() {
        let mut cache = SourceCache::default();
        let table = ready(load_sources(&full_set(), &mut cache).unwrap());

        let request = FilterRequest::new(Metric::Dni).with_countries([]);
        let output = run(&table, &request).unwrap();
        assert!(output.rows.is_empty());
        assert!(output.summary.is_empty());
        assert!(output.averages.is_empty());
        assert!(output.groups.is_empty());
    }

    #[test]
    fn settled_request_records_clamped_range() {
        let mut cache = SourceCache::default();
        let table = ready(load_sources(&full_set(), &mut cache).unwrap());

        let request = FilterRequest::new(Metric::Ghi).with_range(0.0, 15.0);
        let output = run(&table, &request).unwrap();
        assert_eq!(
            output.request.range,
            RangeSelection::Custom(ValueRange::new(5.0, 15.0))
        );
        assert_eq!(output.rows.len(), 3);
    }

    #[test]
    fn unknown_metric_column_fails_the_run() {
        let mut set = SourceSet::default();
        for country in Country::ALL {
            set.set(country, upload("x.csv", "Timestamp,GHI\nt1,1\n"));
        }
        let mut cache = SourceCache::default();
        let table = ready(load_sources(&set, &mut cache).unwrap());

        let err = run(&table, &FilterRequest::new(Metric::Dhi)).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownColumn { .. }));
    }
}
