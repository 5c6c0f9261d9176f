use serde::Serialize;

#[cfg(doc)]
use super::filter::FilteredView;
use super::model::Country;

/// Decimals kept in the summary table.
pub const SUMMARY_DECIMALS: i32 = 3;
/// Decimals kept for the bar chart of averages.
pub const AVERAGE_DECIMALS: i32 = 2;

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

/// Descriptive statistics of the selected metric for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub country: Country,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; undefined for a single value.
    pub std: Option<f64>,
}

/// Mean of the selected metric for one country, for the bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountryAverage {
    pub country: Country,
    pub mean: f64,
}

/// Five-number summary backing one box of the distribution plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Per-country summary of metric values grouped by
/// [`FilteredView::grouped_values`], in country order. Empty groups are
/// skipped.
pub fn summarize_groups(groups: &[(Country, Vec<f64>)]) -> Vec<SummaryRecord> {
    groups
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(country, values)| {
            let mut sorted = values.clone();
            sorted.sort_by(f64::total_cmp);
            SummaryRecord {
                country: *country,
                count: values.len(),
                mean: round_to(mean(values), SUMMARY_DECIMALS),
                median: round_to(quantile(&sorted, 0.5), SUMMARY_DECIMALS),
                std: sample_std(values).map(|s| round_to(s, SUMMARY_DECIMALS)),
            }
        })
        .collect()
}

/// Per-country means for the bar chart.
pub fn averages(groups: &[(Country, Vec<f64>)]) -> Vec<CountryAverage> {
    groups
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(country, values)| CountryAverage {
            country: *country,
            mean: round_to(mean(values), AVERAGE_DECIMALS),
        })
        .collect()
}

/// Box statistics with Tukey whiskers (1.5 × IQR). `None` for no values.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let reach = 1.5 * (q3 - q1);

    // Whiskers stop at the most extreme observation inside the fences.
    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|&v| v >= q1 - reach)
        .unwrap_or(q1);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= q3 + reach)
        .unwrap_or(q3);

    Some(BoxStats {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (n - 1) as f64;
    Some(var.sqrt())
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_median_per_country() {
        let groups = vec![
            (Country::Benin, vec![10.0, 20.0, 30.0]),
            (Country::Togo, vec![5.0, 15.0]),
        ];
        let summary = summarize_groups(&groups);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].country, Country::Benin);
        assert_eq!(summary[0].mean, 20.0);
        assert_eq!(summary[0].median, 20.0);
        assert_eq!(summary[0].std, Some(10.0));
        assert_eq!(summary[1].country, Country::Togo);
        assert_eq!(summary[1].mean, 10.0);
        assert_eq!(summary[1].median, 10.0);
        assert_eq!(summary[1].std, Some(7.071));
    }

    #[test]
    fn empty_groups_are_absent() {
        let groups = vec![
            (Country::Benin, vec![]),
            (Country::SierraLeone, vec![1.0]),
        ];
        let summary = summarize_groups(&groups);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].country, Country::SierraLeone);
        assert_eq!(summary[0].std, None);
        assert!(summarize_groups(&[]).is_empty());
    }

    #[test]
    fn averages_round_to_two_decimals() {
        let groups = vec![(Country::Benin, vec![1.0, 2.0, 2.0])];
        let avg = averages(&groups);
        assert_eq!(avg, vec![CountryAverage { country: Country::Benin, mean: 1.67 }]);
    }

    #[test]
    fn box_stats_interpolate_quartiles() {
        let stats = box_stats(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 5.0);
    }

    #[test]
    fn box_whiskers_exclude_outliers() {
        let stats = box_stats(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(stats.upper_whisker, 4.0);
        assert!(box_stats(&[]).is_none());
    }

    #[test]
    fn rounding_helper() {
        assert_eq!(round_to(2.34567, 3), 2.346);
        assert_eq!(round_to(-0.005, 2), -0.01);
    }
}
