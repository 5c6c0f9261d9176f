use std::path::PathBuf;

use clap::Parser;

use crate::data::loader::SourceInput;
use crate::data::model::{Country, Metric};
use crate::pipeline::SourceSet;

/// How sources reach the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// Files are picked or dropped in the window.
    Upload,
    /// Files are fixed on the command line and loaded at startup.
    LocalPaths,
}

/// Command-line flag that sets one country's source file.
pub fn cli_flag(country: Country) -> &'static str {
    match country {
        Country::Benin => "--benin",
        Country::SierraLeone => "--sierra-leone",
        Country::Togo => "--togo",
    }
}

#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding benin_clean.csv, sierraleone_clean.csv and togo_clean.csv.
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,
    /// Benin source file (overrides --data-dir).
    #[arg(long)]
    pub benin: Option<PathBuf>,
    /// Sierra Leone source file (overrides --data-dir).
    #[arg(long)]
    pub sierra_leone: Option<PathBuf>,
    /// Togo source file (overrides --data-dir).
    #[arg(long)]
    pub togo: Option<PathBuf>,
    /// Metric selected at startup.
    #[arg(short, long, default_value_t = Metric::Ghi)]
    pub metric: Metric,
}

impl Args {
    pub fn mode(&self) -> SourceMode {
        if self.data_dir.is_some()
            || self.benin.is_some()
            || self.sierra_leone.is_some()
            || self.togo.is_some()
        {
            SourceMode::LocalPaths
        } else {
            SourceMode::Upload
        }
    }

    /// Path for one country: explicit flag first, then the data directory.
    pub fn path_for(&self, country: Country) -> Option<PathBuf> {
        let explicit = match country {
            Country::Benin => &self.benin,
            Country::SierraLeone => &self.sierra_leone,
            Country::Togo => &self.togo,
        };
        explicit.clone().or_else(|| {
            self.data_dir
                .as_ref()
                .map(|dir| dir.join(country.default_file_name()))
        })
    }

    /// Sources configured on the command line.
    pub fn source_set(&self) -> SourceSet {
        let mut set = SourceSet::default();
        for country in Country::ALL {
            if let Some(path) = self.path_for(country) {
                set.set(country, SourceInput::Path(path));
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_paths_means_upload_mode() {
        let args = Args::parse_from(["solar-compare"]);
        assert_eq!(args.mode(), SourceMode::Upload);
        assert_eq!(args.metric, Metric::Ghi);
        assert_eq!(args.source_set().missing().len(), 3);
    }

    #[test]
    fn data_dir_resolves_fixed_file_names() {
        let args = Args::parse_from(["solar-compare", "--data-dir", "data", "--metric", "dni"]);
        assert_eq!(args.mode(), SourceMode::LocalPaths);
        assert_eq!(args.metric, Metric::Dni);
        assert_eq!(
            args.path_for(Country::SierraLeone),
            Some(PathBuf::from("data/sierraleone_clean.csv"))
        );
        assert!(args.source_set().missing().is_empty());
    }

    #[test]
    fn explicit_path_overrides_data_dir() {
        let args = Args::parse_from([
            "solar-compare",
            "--data-dir",
            "data",
            "--togo",
            "/tmp/togo-dapaong_qc.csv",
        ]);
        assert_eq!(
            args.path_for(Country::Togo),
            Some(PathBuf::from("/tmp/togo-dapaong_qc.csv"))
        );
        assert_eq!(
            args.path_for(Country::Benin),
            Some(PathBuf::from("data/benin_clean.csv"))
        );
    }

    #[test]
    fn single_path_leaves_others_missing() {
        let args = Args::parse_from(["solar-compare", "--benin", "b.csv"]);
        assert_eq!(args.mode(), SourceMode::LocalPaths);
        assert_eq!(
            args.source_set().missing(),
            vec![Country::SierraLeone, Country::Togo]
        );
    }
}
