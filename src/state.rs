use crate::color::CountryColors;
use crate::config::SourceMode;
use crate::data::cache::{SourceCache, SourceKey};
use crate::data::filter::{FilterRequest, RangeSelection, ValueRange};
use crate::data::loader::SourceInput;
use crate::data::model::{Country, Metric, UnifiedTable};
use crate::pipeline::{self, LoadOutcome, PipelineOutput, SourceSet};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Widgets never touch the derived tables directly: they edit `sources` or
/// `request` through the methods below, which rerun the pipeline.
pub struct AppState {
    pub mode: SourceMode,

    /// One optional source per country.
    pub sources: SourceSet,

    /// Parsed sources, reused while the source set is unchanged.
    pub cache: SourceCache,

    /// Merged dataset (None until all three sources loaded).
    pub table: Option<UnifiedTable>,

    /// Current filter choices.
    pub request: FilterRequest,

    /// Derived tables for the current request.
    pub output: Option<PipelineOutput>,

    pub colors: CountryColors,

    /// Incomplete-input warning.
    pub warning: Option<String>,

    /// Load or pipeline error shown in the UI.
    pub error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(SourceMode::Upload, SourceSet::default(), Metric::default())
    }
}

impl AppState {
    pub fn new(mode: SourceMode, sources: SourceSet, metric: Metric) -> Self {
        let mut state = AppState {
            mode,
            sources,
            cache: SourceCache::default(),
            table: None,
            request: FilterRequest::new(metric),
            output: None,
            colors: CountryColors::default(),
            warning: None,
            error: None,
        };
        state.reload();
        state
    }

    /// Assign a source to a country and reload.
    pub fn set_source(&mut self, country: Country, input: SourceInput) {
        log::info!("{country} source set to {}", input.display_name());
        self.sources.set(country, input);
        self.reload();
    }

    /// Remove a country's source and drop its parsed table from the cache.
    pub fn clear_source(&mut self, country: Country) {
        if let Some(key) = self.sources.get(country).and_then(|i| SourceKey::for_input(i).ok()) {
            self.cache.invalidate(&key);
        }
        self.sources.clear(country);
        self.reload();
    }

    /// Rebuild the unified table from the source set, then refilter.
    pub fn reload(&mut self) {
        self.table = None;
        self.output = None;
        self.warning = None;
        self.error = None;

        match pipeline::load_sources(&self.sources, &mut self.cache) {
            Ok(LoadOutcome::Ready(table)) => {
                self.table = Some(table);
                self.refilter();
            }
            Ok(outcome @ LoadOutcome::Incomplete { .. }) => {
                self.warning = outcome.status_message(self.mode);
            }
            Err(e) => {
                log::error!("Failed to load sources: {e}");
                self.error = Some(format!("Error: {e}"));
            }
        }
    }

    /// Rerun filter and aggregation for the current request.
    ///
    /// The chosen range stays in `request` as picked; the clamped range the
    /// run actually used is only in `output.active_range`.
    pub fn refilter(&mut self) {
        let Some(table) = &self.table else {
            return;
        };
        match pipeline::run(table, &self.request) {
            Ok(output) => {
                self.output = Some(output);
                self.error = None;
            }
            Err(e) => {
                log::error!("Filtering failed: {e}");
                self.output = None;
                self.error = Some(format!("Error: {e}"));
            }
        }
    }

    /// Toggle one country in the selection.
    pub fn toggle_country(&mut self, country: Country) {
        if !self.request.countries.remove(&country) {
            self.request.countries.insert(country);
        }
        self.refilter();
    }

    pub fn select_all_countries(&mut self) {
        self.request = self.request.clone().with_countries(Country::ALL);
        self.refilter();
    }

    pub fn select_no_countries(&mut self) {
        self.request = self.request.clone().with_countries([]);
        self.refilter();
    }

    /// Switch metric; the range is re-derived from the new column.
    pub fn set_metric(&mut self, metric: Metric) {
        self.request = self.request.clone().with_metric(metric);
        self.refilter();
    }

    /// Pick a custom range. Dragging both sliders back to the data bounds
    /// returns to the full range.
    pub fn set_range(&mut self, low: f64, high: f64) {
        let bounds = self.output.as_ref().and_then(|o| o.bounds);
        if bounds == Some(ValueRange::new(low, high)) {
            self.request.range = RangeSelection::Full;
        } else {
            self.request = self.request.clone().with_range(low, high);
        }
        self.refilter();
    }

    pub fn reset_range(&mut self) {
        self.request.range = RangeSelection::Full;
        self.refilter();
    }

    /// Message for the status line, if any.
    pub fn status_line(&self) -> Option<String> {
        if let Some(err) = &self.error {
            return Some(err.clone());
        }
        if let Some(warning) = &self.warning {
            return Some(warning.clone());
        }
        match (self.mode, &self.output) {
            (SourceMode::LocalPaths, Some(output)) => Some(output.row_notice()),
            _ => None,
        }
    }

    /// Assign files dropped onto the window by their names. Returns the
    /// names that could not be matched to a country.
    pub fn assign_dropped(&mut self, dropped: Vec<(String, SourceInput)>) -> Vec<String> {
        let mut unmatched = Vec::new();
        let mut changed = false;
        for (name, input) in dropped {
            match Country::guess_from_file_name(&name) {
                Some(country) => {
                    log::info!("Dropped {name} assigned to {country}");
                    self.sources.set(country, input);
                    changed = true;
                }
                None => {
                    log::warn!("Could not match dropped file {name} to a country");
                    unmatched.push(name);
                }
            }
        }
        if changed {
            self.reload();
        }
        unmatched
    }
}
