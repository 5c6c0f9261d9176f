use std::collections::BTreeSet;

use super::error::{PipelineError, PipelineResult};
use super::model::{Country, Metric, TaggedRow, UnifiedTable};

// ---------------------------------------------------------------------------
// Closed numeric interval
// ---------------------------------------------------------------------------

/// A closed interval `[low, high]` with `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    low: f64,
    high: f64,
}

impl ValueRange {
    /// Build an interval; the endpoints are swapped if given in reverse.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            ValueRange { low: a, high: b }
        } else {
            ValueRange { low: b, high: a }
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Inclusive on both ends. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Intersect with `bounds`; `None` when nothing of `self` lies inside.
    pub fn clamp_to(&self, bounds: &ValueRange) -> Option<ValueRange> {
        let low = self.low.max(bounds.low);
        let high = self.high.min(bounds.high);
        (low <= high).then_some(ValueRange { low, high })
    }
}

// ---------------------------------------------------------------------------
// Filter request
// ---------------------------------------------------------------------------

/// How the active range is chosen for a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeSelection {
    /// Use the observed `[min, max]` of the metric.
    Full,
    /// A user-chosen interval, clamped into the observed bounds.
    Custom(ValueRange),
}

/// One interaction's worth of filter choices.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRequest {
    pub countries: BTreeSet<Country>,
    pub metric: Metric,
    pub range: RangeSelection,
}

impl FilterRequest {
    /// All countries selected, full range.
    pub fn new(metric: Metric) -> Self {
        FilterRequest {
            countries: Country::ALL.into_iter().collect(),
            metric,
            range: RangeSelection::Full,
        }
    }

    pub fn with_countries(mut self, countries: impl IntoIterator<Item = Country>) -> Self {
        self.countries = countries.into_iter().collect();
        self
    }

    pub fn with_range(mut self, low: f64, high: f64) -> Self {
        self.range = RangeSelection::Custom(ValueRange::new(low, high));
        self
    }

    /// Select another metric. A range chosen for the old metric is dropped.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        if metric != self.metric {
            self.metric = metric;
            self.range = RangeSelection::Full;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Rows of a [`UnifiedTable`] passing a [`FilterRequest`], by index.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a UnifiedTable,
    column: usize,
    bounds: Option<ValueRange>,
    active: Option<ValueRange>,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Observed `[min, max]` of the metric over the selected countries.
    pub fn bounds(&self) -> Option<ValueRange> {
        self.bounds
    }

    /// The range actually applied.
    pub fn active_range(&self) -> Option<ValueRange> {
        self.active
    }

    /// Indices into the unified table, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a TaggedRow> + '_ {
        let table = self.table;
        self.indices.iter().map(move |&i| &table.rows[i])
    }

    /// `(country, metric value)` for every row in the view.
    pub fn values(&self) -> impl Iterator<Item = (Country, f64)> + '_ {
        let column = self.column;
        self.rows()
            .filter_map(move |r| r.cells[column].as_f64().map(|v| (r.country, v)))
    }

    /// Metric values grouped by country, in country order. Countries with
    /// no rows are omitted.
    pub fn grouped_values(&self) -> Vec<(Country, Vec<f64>)> {
        let mut groups: Vec<(Country, Vec<f64>)> =
            Country::ALL.iter().map(|&c| (c, Vec::new())).collect();
        for (country, value) in self.values() {
            groups[country.index()].1.push(value);
        }
        groups.retain(|(_, vals)| !vals.is_empty());
        groups
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Indices of rows whose country is in `countries`.
pub fn country_rows(table: &UnifiedTable, countries: &BTreeSet<Country>) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, r)| countries.contains(&r.country))
        .map(|(i, _)| i)
        .collect()
}

/// Observed `[min, max]` of `column` over `indices`, skipping missing and
/// NaN cells. `None` when no numeric value is present.
pub fn metric_bounds(table: &UnifiedTable, column: usize, indices: &[usize]) -> Option<ValueRange> {
    indices
        .iter()
        .filter_map(|&i| table.rows[i].cells[column].as_f64())
        .fold(None, |acc: Option<ValueRange>, v| match acc {
            None => Some(ValueRange::new(v, v)),
            Some(r) => Some(ValueRange::new(r.low.min(v), r.high.max(v))),
        })
}

/// Apply the country filter, derive the metric bounds, settle the active
/// range and apply the range filter, in that order.
pub fn apply_filter<'a>(
    table: &'a UnifiedTable,
    request: &FilterRequest,
) -> PipelineResult<FilteredView<'a>> {
    let column_name = request.metric.column();
    let column = table
        .column_index(column_name)
        .ok_or_else(|| PipelineError::UnknownColumn {
            column: column_name.to_string(),
        })?;

    let by_country = country_rows(table, &request.countries);
    let bounds = metric_bounds(table, column, &by_country);

    let active = bounds.map(|b| match request.range {
        RangeSelection::Full => b,
        RangeSelection::Custom(r) => r.clamp_to(&b).unwrap_or_else(|| {
            log::warn!(
                "{column_name} range [{}, {}] is outside the data, resetting to [{}, {}]",
                r.low,
                r.high,
                b.low,
                b.high
            );
            b
        }),
    });

    let indices = match active {
        Some(range) => by_country
            .into_iter()
            .filter(|&i| {
                table.rows[i].cells[column]
                    .as_f64()
                    .is_some_and(|v| range.contains(v))
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(FilteredView {
        table,
        column,
        bounds,
        active,
        indices,
    })
}
