//! Sparse Bullshark vs. Bullshark benchmark comparison.
//!
//! Reads the harness' per-run sample files, reduces them to per-sample-size
//! means, converts them to latency / throughput / NIC saturation, and pairs
//! each swept series with its baseline for plotting.

pub mod color;
pub mod compare;
pub mod config;
pub mod data;
pub mod error;
pub mod metric;
pub mod report;

pub use compare::{ComparisonChart, MetricOutcome, SchemaDivergence, SeriesPair, analyze, assemble};
pub use config::{ComparisonConfig, LoadLevel};
pub use error::AnalysisError;
pub use metric::Metric;
