use std::collections::BTreeSet;
use std::fmt;

use crate::color::{Rgb, generate_palette};
use crate::config::{BaselineReduction, ComparisonConfig, LoadLevel, Marker};
use crate::data::aggregate::{group_mean, mean_of_group_means, overall_mean};
use crate::data::loader::read_table;
use crate::data::model::{AggregatedSeries, ColumnSchema, GroupKey};
use crate::error::{AnalysisError, Result};
use crate::metric::Metric;

// ---------------------------------------------------------------------------
// Chart model
// ---------------------------------------------------------------------------

/// Swept series and baseline of one load level, already in metric units.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPair {
    pub load: u32,
    pub label: String,
    pub color: Rgb,
    pub marker: Marker,
    pub series: AggregatedSeries,
    pub baseline: f64,
}

/// Key sets of two load levels of one chart differ.
///
/// Non-fatal: the chart still renders each series with its own keys.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDivergence {
    pub reference: String,
    pub level: String,
    /// Keys of the reference level absent from this level.
    pub missing: Vec<GroupKey>,
    /// Keys of this level absent from the reference level.
    pub extra: Vec<GroupKey>,
}

impl fmt::Display for SchemaDivergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |keys: &[GroupKey]| {
            keys.iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        write!(f, "{} keys differ from {}", self.level, self.reference)?;
        if !self.missing.is_empty() {
            write!(f, "; missing [{}]", join(&self.missing))?;
        }
        if !self.extra.is_empty() {
            write!(f, "; extra [{}]", join(&self.extra))?;
        }
        Ok(())
    }
}

/// A rendering request: one [`SeriesPair`] per load level, in config order.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonChart {
    pub metric: Metric,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub swept_name: String,
    pub baseline_name: String,
    pub y_bounds: Option<[f64; 2]>,
    pub pairs: Vec<SeriesPair>,
    pub warnings: Vec<SchemaDivergence>,
}

impl ComparisonChart {
    /// Legend entry of a swept series.
    pub fn series_name(&self, pair: &SeriesPair) -> String {
        format!("{} {}", self.swept_name, pair.label)
    }

    /// Legend entry of a baseline line.
    pub fn baseline_name(&self, pair: &SeriesPair) -> String {
        format!("{} {}", self.baseline_name, pair.label)
    }

    /// Sorted union of the group keys of every series.
    pub fn x_ticks(&self) -> Vec<f64> {
        self.pairs
            .iter()
            .flat_map(|p| p.series.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|k| k.0)
            .collect()
    }
}

/// Result of assembling one requested metric.
#[derive(Debug)]
pub struct MetricOutcome {
    pub metric: Metric,
    pub result: Result<ComparisonChart>,
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Read, aggregate and derive both datasets of one load level.
pub fn assemble_level(
    config: &ComparisonConfig,
    level: &LoadLevel,
    metric: Metric,
) -> Result<(AggregatedSeries, f64)> {
    let swept = read_table(&config.swept_path(level), ColumnSchema::SWEPT)?;
    let raw_series = group_mean(&swept, 0, metric.swept_column())?;
    drop(swept);

    let baseline = read_table(&config.baseline_path(level), ColumnSchema::BASELINE)?;
    let raw_baseline = match config.baseline_reduction {
        BaselineReduction::Flat => overall_mean(&baseline, metric.baseline_column())?,
        BaselineReduction::MeanOfGroupMeans { key_column } => {
            mean_of_group_means(&baseline, key_column, metric.baseline_column())?
        }
    };

    let series = metric.derive_series(&raw_series, config.window_secs)?;
    let baseline = metric.derive_scalar(raw_baseline, config.window_secs)?;
    Ok((series, baseline))
}

/// Build the comparison chart of `metric` across every configured level.
pub fn assemble(config: &ComparisonConfig, metric: Metric) -> Result<ComparisonChart> {
    let palette = generate_palette(config.levels.len());
    let mut pairs = Vec::with_capacity(config.levels.len());

    for (i, level) in config.levels.iter().enumerate() {
        let (series, baseline) = assemble_level(config, level, metric)?;
        let label = level.label();
        log::info!(
            "{metric} @ {label}: {} sample sizes, baseline {baseline:.3} {}",
            series.len(),
            metric.unit()
        );
        pairs.push(SeriesPair {
            load: level.load,
            label,
            color: level.color.unwrap_or(palette[i]),
            marker: level.marker.unwrap_or_else(|| Marker::nth(i)),
            series,
            baseline,
        });
    }

    let warnings = check_divergence(&pairs);
    for warning in &warnings {
        log::warn!("{metric}: {warning}");
    }

    Ok(ComparisonChart {
        metric,
        title: metric.title().to_string(),
        x_label: config.x_label.clone(),
        y_label: metric.y_label().to_string(),
        swept_name: config.swept_name.clone(),
        baseline_name: config.baseline_name.clone(),
        y_bounds: config.y_bounds_for(metric),
        pairs,
        warnings,
    })
}

/// Compare every level's key set against the first level's.
pub fn check_divergence(pairs: &[SeriesPair]) -> Vec<SchemaDivergence> {
    let Some((first, rest)) = pairs.split_first() else {
        return Vec::new();
    };
    let reference: BTreeSet<GroupKey> = first.series.keys().collect();

    rest.iter()
        .filter_map(|pair| {
            let keys: BTreeSet<GroupKey> = pair.series.keys().collect();
            if keys == reference {
                return None;
            }
            Some(SchemaDivergence {
                reference: first.label.clone(),
                level: pair.label.clone(),
                missing: reference.difference(&keys).copied().collect(),
                extra: keys.difference(&reference).copied().collect(),
            })
        })
        .collect()
}

/// Assemble every configured metric. A failure only loses its own chart.
pub fn analyze(config: &ComparisonConfig) -> Vec<MetricOutcome> {
    config
        .metrics
        .iter()
        .map(|&metric| {
            let result = assemble(config, metric);
            if let Err(e) = &result {
                log::error!("{metric}: chart abandoned: {e}");
            }
            MetricOutcome { metric, result }
        })
        .collect()
}

/// Whether every outcome produced a chart.
pub fn all_succeeded(outcomes: &[MetricOutcome]) -> bool {
    outcomes.iter().all(|o| o.result.is_ok())
}

/// First failure, if any, for exit status reporting.
pub fn first_error(outcomes: &[MetricOutcome]) -> Option<(Metric, &AnalysisError)> {
    outcomes
        .iter()
        .find_map(|o| o.result.as_ref().err().map(|e| (o.metric, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn pair(label: &str, keys: &[f64]) -> SeriesPair {
        SeriesPair {
            load: 0,
            label: label.to_string(),
            color: Rgb::RED,
            marker: Marker::Circle,
            series: AggregatedSeries::from_map(
                keys.iter().map(|&k| (GroupKey(k), 1.0)).collect::<BTreeMap<_, _>>(),
            ),
            baseline: 1.0,
        }
    }

    #[test]
    fn identical_keys_raise_no_warning() {
        let pairs = [pair("a", &[1.0, 2.0]), pair("b", &[2.0, 1.0])];
        assert!(check_divergence(&pairs).is_empty());
    }

    #[test]
    fn divergent_keys_are_described() {
        let pairs = [
            pair("2Gb/sec", &[100.0, 200.0]),
            pair("4Gb/sec", &[100.0, 300.0]),
        ];
        let warnings = check_divergence(&pairs);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].missing, vec![GroupKey(200.0)]);
        assert_eq!(warnings[0].extra, vec![GroupKey(300.0)]);
        assert_eq!(
            warnings[0].to_string(),
            "4Gb/sec keys differ from 2Gb/sec; missing [200]; extra [300]"
        );
    }

    #[test]
    fn x_ticks_are_the_sorted_union() {
        let chart = ComparisonChart {
            metric: Metric::Latency,
            title: String::new(),
            x_label: String::new(),
            y_label: String::new(),
            swept_name: "Sparse".into(),
            baseline_name: "Base".into(),
            y_bounds: None,
            pairs: vec![pair("a", &[300.0, 100.0]), pair("b", &[200.0, 100.0])],
            warnings: Vec::new(),
        };
        assert_eq!(chart.x_ticks(), vec![100.0, 200.0, 300.0]);
        assert_eq!(chart.series_name(&chart.pairs[0]), "Sparse a");
        assert_eq!(chart.baseline_name(&chart.pairs[1]), "Base b");
    }
}
