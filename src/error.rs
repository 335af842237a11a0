use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between the source file and a [`Dataset`].
///
/// Empty selections and unclassified records are not errors; they flow
/// through as empty aggregates and `Unknown` / unassigned labels.
///
/// [`Dataset`]: crate::data::model::Dataset
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("cannot read {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("columns '{first}' and '{second}' both normalise to '{normalized}'")]
    DuplicateColumn {
        first: String,
        second: String,
        normalized: String,
    },

    #[error("row {row}, column '{column}': cannot parse '{value}' ({reason})")]
    Parse {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },
}

impl DashboardError {
    pub fn file_access(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        DashboardError::FileAccess {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
