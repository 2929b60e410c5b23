use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::color::Rgb;
use crate::metric::{DEFAULT_WINDOW_SECS, Metric};

// ---------------------------------------------------------------------------
// Load levels
// ---------------------------------------------------------------------------

/// Marker drawn on each point of a swept series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Diamond,
    Square,
    Triangle,
    Circle,
}

impl Marker {
    const CYCLE: [Marker; 4] = [Marker::Diamond, Marker::Square, Marker::Triangle, Marker::Circle];

    /// Default marker for the `index`-th load level.
    pub fn nth(index: usize) -> Marker {
        Self::CYCLE[index % Self::CYCLE.len()]
    }
}

/// One injected traffic rate, e.g. `2000` for 2 Gb/sec.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoadLevel {
    /// Load as it appears in file names.
    pub load: u32,
    /// Legend text; derived from `load` when absent.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<Rgb>,
    #[serde(default)]
    pub marker: Option<Marker>,
}

impl LoadLevel {
    pub fn new(load: u32) -> Self {
        LoadLevel {
            load,
            label: None,
            color: None,
            marker: None,
        }
    }

    pub fn with_style(mut self, color: Rgb, marker: Marker) -> Self {
        self.color = Some(color);
        self.marker = Some(marker);
        self
    }

    /// `2000` → `2Gb/sec`, `2500` → `2.5Gb/sec`.
    pub fn label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        if self.load % 1000 == 0 {
            format!("{}Gb/sec", self.load / 1000)
        } else {
            format!("{}Gb/sec", self.load as f64 / 1000.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Baseline reduction and axis overrides
// ---------------------------------------------------------------------------

/// How a baseline table collapses to a single scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineReduction {
    /// Mean over every row.
    #[default]
    Flat,
    /// Mean of the per-group means, grouped by `key_column`.
    MeanOfGroupMeans { key_column: usize },
}

/// Fixed y-axis range for one metric's chart.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AxisBounds {
    pub metric: Metric,
    pub min: f64,
    pub max: f64,
}

// ---------------------------------------------------------------------------
// ComparisonConfig
// ---------------------------------------------------------------------------

/// Everything a comparison run needs; nothing is discovered dynamically.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Directory holding the harness output files.
    pub data_dir: PathBuf,
    /// File prefix of the swept variant.
    pub swept_variant: String,
    /// File prefix of the fixed-configuration variant.
    pub baseline_variant: String,
    /// Legend name of the swept variant.
    pub swept_name: String,
    /// Legend name of the baseline variant.
    pub baseline_name: String,
    pub extension: String,
    /// Measurement window length in seconds.
    pub window_secs: f64,
    pub x_label: String,
    pub levels: Vec<LoadLevel>,
    pub metrics: Vec<Metric>,
    pub baseline_reduction: BaselineReduction,
    pub y_bounds: Vec<AxisBounds>,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            swept_variant: "sparse_bullshark".to_string(),
            baseline_variant: "bullshark".to_string(),
            swept_name: "Sparse Bullshark".to_string(),
            baseline_name: "Bullshark".to_string(),
            extension: "csv".to_string(),
            window_secs: DEFAULT_WINDOW_SECS,
            x_label: "Sample size".to_string(),
            levels: vec![
                LoadLevel::new(2000).with_style(Rgb::RED, Marker::Diamond),
                LoadLevel::new(4000).with_style(Rgb::GREEN, Marker::Square),
                LoadLevel::new(6000).with_style(Rgb::BLUE, Marker::Triangle),
            ],
            metrics: Metric::ALL.to_vec(),
            baseline_reduction: BaselineReduction::Flat,
            y_bounds: Vec::new(),
        }
    }
}

impl ComparisonConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: ComparisonConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.levels.is_empty() {
            bail!("config lists no load levels");
        }
        let mut seen = BTreeSet::new();
        for level in &self.levels {
            if !seen.insert(level.load) {
                bail!("load level {} is listed twice", level.load);
            }
        }
        if !(self.window_secs.is_finite() && self.window_secs > 0.0) {
            bail!("window_secs must be a positive number, got {}", self.window_secs);
        }
        if self.extension.is_empty() {
            bail!("extension must not be empty");
        }
        for bounds in &self.y_bounds {
            if !(bounds.min < bounds.max) {
                bail!(
                    "y bounds for {} are inverted: [{}, {}]",
                    bounds.metric,
                    bounds.min,
                    bounds.max
                );
            }
        }
        Ok(())
    }

    /// `{data_dir}/{variant}_{load}.{extension}`
    pub fn dataset_path(&self, variant: &str, load: u32) -> PathBuf {
        self.data_dir
            .join(format!("{variant}_{load}.{}", self.extension))
    }

    pub fn swept_path(&self, level: &LoadLevel) -> PathBuf {
        self.dataset_path(&self.swept_variant, level.load)
    }

    pub fn baseline_path(&self, level: &LoadLevel) -> PathBuf {
        self.dataset_path(&self.baseline_variant, level.load)
    }

    pub fn y_bounds_for(&self, metric: Metric) -> Option<[f64; 2]> {
        self.y_bounds
            .iter()
            .find(|b| b.metric == metric)
            .map(|b| [b.min, b.max])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ComparisonConfig::default();
        config.validate().unwrap();
        assert_eq!(config.levels.len(), 3);
        assert_eq!(config.window_secs, 60.0);
    }

    #[test]
    fn file_names_follow_variant_load_extension() {
        let config = ComparisonConfig {
            data_dir: PathBuf::from("runs"),
            ..Default::default()
        };
        let level = LoadLevel::new(9000);
        assert_eq!(
            config.swept_path(&level),
            Path::new("runs").join("sparse_bullshark_9000.csv")
        );
        assert_eq!(
            config.baseline_path(&level),
            Path::new("runs").join("bullshark_9000.csv")
        );
    }

    #[test]
    fn labels_default_from_load() {
        assert_eq!(LoadLevel::new(2000).label(), "2Gb/sec");
        assert_eq!(LoadLevel::new(2500).label(), "2.5Gb/sec");
        let mut named = LoadLevel::new(1);
        named.label = Some("idle".into());
        assert_eq!(named.label(), "idle");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ComparisonConfig = serde_json::from_str(
            r#"{
                "levels": [{ "load": 3000, "color": "orange", "marker": "circle" }],
                "metrics": ["nic_saturation"],
                "baseline_reduction": { "mean_of_group_means": { "key_column": 0 } },
                "y_bounds": [{ "metric": "nic_saturation", "min": 0, "max": 7000 }]
            }"#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.swept_variant, "sparse_bullshark");
        assert_eq!(config.levels[0].color, Some(Rgb::ORANGE));
        assert_eq!(config.levels[0].marker, Some(Marker::Circle));
        assert_eq!(config.metrics, vec![Metric::NicSaturation]);
        assert_eq!(
            config.baseline_reduction,
            BaselineReduction::MeanOfGroupMeans { key_column: 0 }
        );
        assert_eq!(config.y_bounds_for(Metric::NicSaturation), Some([0.0, 7000.0]));
        assert_eq!(config.y_bounds_for(Metric::Latency), None);
    }

    #[test]
    fn rejects_bad_configs() {
        let mut config = ComparisonConfig::default();
        config.levels.push(LoadLevel::new(2000));
        assert!(config.validate().is_err());

        let config = ComparisonConfig {
            window_secs: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ComparisonConfig {
            levels: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn marker_cycle_wraps() {
        assert_eq!(Marker::nth(0), Marker::Diamond);
        assert_eq!(Marker::nth(4), Marker::Diamond);
        assert_eq!(Marker::nth(2), Marker::Triangle);
    }
}
