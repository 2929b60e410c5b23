use std::path::PathBuf;

use thiserror::Error;

use crate::metric::Metric;

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

/// Fatal failures of the read → aggregate → derive pipeline.
///
/// Any of these aborts the chart of the metric being assembled; other
/// metrics are still computed.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("dataset file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}:{line}: {reason}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("dataset {} contains no rows", path.display())]
    EmptyDataset { path: PathBuf },

    #[error("column {column} is out of range for {} ({width} columns)", path.display())]
    ColumnOutOfRange {
        path: PathBuf,
        column: usize,
        width: usize,
    },

    #[error("{metric} transform received out-of-domain value {value}")]
    UnitMismatch { metric: Metric, value: f64 },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
