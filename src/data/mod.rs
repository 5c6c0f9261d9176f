/// Data layer: core types, loading, merging, filtering and statistics.
///
/// Architecture:
/// ```text
///  Benin / Sierra Leone / Togo  (.csv / .json / .parquet, path or upload)
///        │
///        ▼
///   ┌──────────┐   ┌───────┐
///   │  loader   │◄──│ cache │  parse source → RawTable
///   └──────────┘   └───────┘
///        │
///        ▼
///   ┌──────────┐
///   │  merge    │  label + concatenate → UnifiedTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  country set + metric range → FilteredView
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ summary   │  per-country mean / median / std, box stats
///   └──────────┘
/// ```

pub mod cache;
pub mod error;
pub mod loader;
pub mod merge;
pub mod model;
pub mod filter;
pub mod summary;
