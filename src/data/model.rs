use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell. NaN is reported as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Infer the type of a raw text cell.
    pub fn guess(s: &str) -> CellValue {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_nan() {
                return CellValue::Null;
            }
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Country / Metric – the fixed enumerations the dashboard compares over
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Country {
    #[serde(rename = "Benin")]
    Benin,
    #[serde(rename = "Sierra Leone")]
    SierraLeone,
    #[serde(rename = "Togo")]
    Togo,
}

impl Country {
    /// Fixed concatenation and display order.
    pub const ALL: [Country; 3] = [Country::Benin, Country::SierraLeone, Country::Togo];

    pub fn label(self) -> &'static str {
        match self {
            Country::Benin => "Benin",
            Country::SierraLeone => "Sierra Leone",
            Country::Togo => "Togo",
        }
    }

    /// Position in [`Country::ALL`]; doubles as the plot x coordinate.
    pub fn index(self) -> usize {
        match self {
            Country::Benin => 0,
            Country::SierraLeone => 1,
            Country::Togo => 2,
        }
    }

    /// File name used when sources are resolved from a data directory.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Country::Benin => "benin_clean.csv",
            Country::SierraLeone => "sierraleone_clean.csv",
            Country::Togo => "togo_clean.csv",
        }
    }

    /// Guess which country a dropped file belongs to from its name.
    pub fn guess_from_file_name(name: &str) -> Option<Country> {
        let lower = name.to_ascii_lowercase();
        if lower.contains("benin") {
            Some(Country::Benin)
        } else if lower.contains("sierra") {
            Some(Country::SierraLeone)
        } else if lower.contains("togo") {
            Some(Country::Togo)
        } else {
            None
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Metric {
    /// Global Horizontal Irradiance.
    #[default]
    #[serde(rename = "GHI")]
    Ghi,
    /// Direct Normal Irradiance.
    #[serde(rename = "DNI")]
    Dni,
    /// Diffuse Horizontal Irradiance.
    #[serde(rename = "DHI")]
    Dhi,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Ghi, Metric::Dni, Metric::Dhi];

    /// Column name of the metric in the source tables.
    pub fn column(self) -> &'static str {
        match self {
            Metric::Ghi => "GHI",
            Metric::Dni => "DNI",
            Metric::Dhi => "DHI",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.column().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown metric '{s}', expected GHI, DNI or DHI"))
    }
}

// ---------------------------------------------------------------------------
// RawTable – one parsed source file
// ---------------------------------------------------------------------------

/// A parsed source file: header plus row-major cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Ordered column names from the header row.
    pub columns: Vec<String>,
    /// Rows; each has exactly `columns.len()` cells.
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        RawTable { columns, rows }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// UnifiedTable – the merged, country-labelled dataset
// ---------------------------------------------------------------------------

/// Name of the label column appended by the merge.
pub const COUNTRY_COLUMN: &str = "Country";

/// One row of the unified table.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedRow {
    pub country: Country,
    /// Cells aligned with [`UnifiedTable::columns`].
    pub cells: Vec<CellValue>,
}

/// All three sources concatenated in [`Country::ALL`] order.
#[derive(Debug, Clone, Default)]
pub struct UnifiedTable {
    /// Union of the source columns in first-seen order (excludes `Country`).
    pub columns: Vec<String>,
    pub rows: Vec<TaggedRow>,
}

impl UnifiedTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row count per country, in country order.
    pub fn country_counts(&self) -> Vec<(Country, usize)> {
        Country::ALL
            .iter()
            .map(|&c| (c, self.rows.iter().filter(|r| r.country == c).count()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_infers_cell_types() {
        assert_eq!(CellValue::guess("42"), CellValue::Integer(42));
        assert_eq!(CellValue::guess(" 4.5 "), CellValue::Float(4.5));
        assert_eq!(CellValue::guess(""), CellValue::Null);
        assert_eq!(CellValue::guess("NaN"), CellValue::Null);
        assert_eq!(CellValue::guess("true"), CellValue::Bool(true));
        assert_eq!(
            CellValue::guess("2021-08-09 00:01"),
            CellValue::Text("2021-08-09 00:01".to_string())
        );
    }

    #[test]
    fn as_f64_skips_nan_and_text() {
        assert_eq!(CellValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(CellValue::Text("1".into()).as_f64(), None);
        assert_eq!(CellValue::Null.as_f64(), None);
    }

    #[test]
    fn country_labels_and_order() {
        let labels: Vec<&str> = Country::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["Benin", "Sierra Leone", "Togo"]);
        assert!(Country::Benin < Country::SierraLeone);
        assert!(Country::SierraLeone < Country::Togo);
        assert_eq!(Country::Togo.index(), 2);
    }

    #[test]
    fn country_from_file_name() {
        assert_eq!(
            Country::guess_from_file_name("data/Benin-malanville.csv"),
            Some(Country::Benin)
        );
        assert_eq!(
            Country::guess_from_file_name("sierraleone_clean.csv"),
            Some(Country::SierraLeone)
        );
        assert_eq!(Country::guess_from_file_name("TOGO.csv"), Some(Country::Togo));
        assert_eq!(Country::guess_from_file_name("ghana.csv"), None);
    }

    #[test]
    fn metric_parses_case_insensitively() {
        assert_eq!("dni".parse::<Metric>(), Ok(Metric::Dni));
        assert_eq!("GHI".parse::<Metric>(), Ok(Metric::Ghi));
        assert!("Tamb".parse::<Metric>().is_err());
        assert_eq!(Metric::Dhi.column(), "DHI");
    }

    #[test]
    fn country_serializes_as_label() {
        let json = serde_json::to_string(&Country::SierraLeone).unwrap();
        assert_eq!(json, "\"Sierra Leone\"");
    }
}
