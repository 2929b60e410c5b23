use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::model::AggregatedSeries;
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Harness constants
// ---------------------------------------------------------------------------

// These mirror the units the benchmark harness writes. Changing them here
// without changing the harness silently rescales every chart.

/// Length of one measurement run, in seconds.
pub const DEFAULT_WINDOW_SECS: f64 = 60.0;
/// Bytes → bits times the harness' fixed sampling amplification.
pub const SATURATION_MULTIPLIER: f64 = 8000.0;
/// Bits → mebibits.
pub const MEBIBIT_DIVISOR: f64 = 1024.0 * 1024.0;

/// Cumulative latency over a run → seconds per run.
pub fn latency_secs(cumulative: f64, window_secs: f64) -> f64 {
    cumulative / window_secs
}

/// Cumulative event count over a run → events per second.
pub fn per_second(count: f64, window_secs: f64) -> f64 {
    count / window_secs
}

/// Mean byte count → megabits per second of NIC usage.
pub fn saturation_mbits(bytes: f64) -> f64 {
    bytes * SATURATION_MULTIPLIER / MEBIBIT_DIVISOR
}

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

/// A derived quantity plotted on one comparison chart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Latency,
    Throughput,
    #[serde(alias = "nic-saturation")]
    NicSaturation,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Latency, Metric::Throughput, Metric::NicSaturation];

    /// Raw column in a swept (`sparse_*`) file.
    pub fn swept_column(self) -> usize {
        match self {
            Metric::Throughput => 1,
            Metric::Latency => 2,
            Metric::NicSaturation => 3,
        }
    }

    /// Raw column in a baseline file, which lacks the group key column.
    pub fn baseline_column(self) -> usize {
        self.swept_column() - 1
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::Latency => "Latency comparison",
            Metric::Throughput => "Throughput comparison",
            Metric::NicSaturation => "Network card saturation",
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            Metric::Latency => "Latency (sec)",
            Metric::Throughput => "Blocks per second",
            Metric::NicSaturation => "Network card saturation Mb/sec",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Latency => "sec",
            Metric::Throughput => "blocks/sec",
            Metric::NicSaturation => "Mb/sec",
        }
    }

    /// Apply this metric's unit transform to one raw aggregate.
    pub fn derive_scalar(self, value: f64, window_secs: f64) -> Result<f64> {
        if !value.is_finite() || value < 0.0 {
            return Err(AnalysisError::UnitMismatch { metric: self, value });
        }
        let derived = match self {
            Metric::Latency => latency_secs(value, window_secs),
            Metric::Throughput => per_second(value, window_secs),
            Metric::NicSaturation => saturation_mbits(value),
        };
        Ok(derived)
    }

    /// Apply the transform to every value of a series.
    pub fn derive_series(self, series: &AggregatedSeries, window_secs: f64) -> Result<AggregatedSeries> {
        series.try_map(|v| self.derive_scalar(v, window_secs))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Latency => "latency",
            Metric::Throughput => "throughput",
            Metric::NicSaturation => "nic_saturation",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::GroupKey;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    const EPS: f64 = 1e-9;

    #[test]
    fn one_mebibit_per_defined_constants() {
        let bytes = 1024.0 * 1024.0 / 8000.0;
        assert!((saturation_mbits(bytes) - 1.0).abs() < EPS);
        assert!((Metric::NicSaturation.derive_scalar(bytes, 60.0).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn throughput_series_scenario() {
        let series = AggregatedSeries::from_map(BTreeMap::from([
            (GroupKey(100.0), 500.0),
            (GroupKey(200.0), 900.0),
        ]));
        let derived = Metric::Throughput
            .derive_series(&series, DEFAULT_WINDOW_SECS)
            .unwrap();
        assert!((derived.get(100.0).unwrap() - 8.333_333_333).abs() < 1e-6);
        assert!((derived.get(200.0).unwrap() - 15.0).abs() < EPS);
    }

    #[test]
    fn latency_baseline_scenario() {
        let v = Metric::Latency.derive_scalar(2000.0, DEFAULT_WINDOW_SECS).unwrap();
        assert!((v - 33.333_333_333).abs() < 1e-6);
    }

    #[test]
    fn negative_and_non_finite_inputs_are_rejected() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            for metric in Metric::ALL {
                let err = metric.derive_scalar(bad, 60.0).unwrap_err();
                assert!(matches!(err, AnalysisError::UnitMismatch { .. }), "{metric} {bad}");
            }
        }
    }

    #[test]
    fn baseline_columns_are_shifted_by_missing_key() {
        assert_eq!(Metric::Throughput.baseline_column(), 0);
        assert_eq!(Metric::Latency.baseline_column(), 1);
        assert_eq!(Metric::NicSaturation.baseline_column(), 2);
    }

    #[test]
    fn metric_names_round_trip_through_json() {
        let m: Metric = serde_json::from_str("\"nic_saturation\"").unwrap();
        assert_eq!(m, Metric::NicSaturation);
        let m: Metric = serde_json::from_str("\"nic-saturation\"").unwrap();
        assert_eq!(m, Metric::NicSaturation);
        assert_eq!(serde_json::to_string(&Metric::Latency).unwrap(), "\"latency\"");
    }

    proptest! {
        #[test]
        fn window_transforms_are_linear(x in 0.0f64..1e9, a in 0.0f64..1e3) {
            for metric in [Metric::Latency, Metric::Throughput] {
                let lhs = metric.derive_scalar(a * x, DEFAULT_WINDOW_SECS).unwrap();
                let rhs = a * metric.derive_scalar(x, DEFAULT_WINDOW_SECS).unwrap();
                prop_assert!((lhs - rhs).abs() <= 1e-9 * rhs.abs().max(1.0));
            }
        }
    }
}
