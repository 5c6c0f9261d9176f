use thiserror::Error;

use super::model::Country;

/// Failures that stop a pipeline run.
///
/// An incomplete source set is not represented here: it is a regular
/// outcome of [`crate::pipeline::load_sources`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A source could not be read or parsed as a table.
    #[error("failed to read {country} data: {reason}")]
    MalformedSource { country: Country, reason: String },

    /// A source cannot be concatenated with the others.
    #[error("{country} data cannot be merged: {reason}")]
    ShapeMismatch { country: Country, reason: String },

    /// The requested column does not exist in the unified table.
    #[error("column '{column}' not found in the loaded data")]
    UnknownColumn { column: String },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
