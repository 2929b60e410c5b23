mod app;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use app::VersusApp;
use clap::Parser;
use eframe::egui;
use state::AppState;
use versus::compare::{analyze, first_error};
use versus::config::ComparisonConfig;
use versus::metric::Metric;
use versus::report::render_text;

/// Compare Sparse Bullshark against Bullshark across load levels.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON comparison config; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding `{variant}_{load}.{ext}` files (overrides the config).
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Metric to chart; repeat for several (overrides the config).
    #[arg(short, long = "metric", value_enum)]
    metrics: Vec<Metric>,

    /// Measurement window length in seconds (overrides the config).
    #[arg(long)]
    window_secs: Option<f64>,

    /// Print text tables instead of opening a window.
    #[arg(long)]
    headless: bool,
}

impl Cli {
    fn into_config(self) -> Result<(ComparisonConfig, bool)> {
        let mut config = match &self.config {
            Some(path) => ComparisonConfig::load(path)?,
            None => ComparisonConfig::default(),
        };
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if !self.metrics.is_empty() {
            config.metrics = self.metrics;
        }
        if let Some(secs) = self.window_secs {
            config.window_secs = secs;
        }
        config.validate().context("invalid comparison settings")?;
        Ok((config, self.headless))
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let (config, headless) = Cli::parse().into_config()?;
    if headless {
        run_headless(&config)
    } else {
        run_window(config)
    }
}

fn run_headless(config: &ComparisonConfig) -> Result<()> {
    let outcomes = analyze(config);
    for outcome in &outcomes {
        match &outcome.result {
            Ok(chart) => println!("{}", render_text(chart)),
            Err(e) => eprintln!("{}: {e}", outcome.metric),
        }
    }
    if let Some((metric, e)) = first_error(&outcomes) {
        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        bail!("{failed} of {} charts failed; first: {metric}: {e}", outcomes.len());
    }
    Ok(())
}

fn run_window(config: ComparisonConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let state = AppState::new(config);
    eframe::run_native(
        "Versus – Sparse Bullshark vs. Bullshark",
        options,
        Box::new(|_cc| Ok(Box::new(VersusApp::new(state)))),
    )
    .map_err(|e| anyhow!("window failed: {e}"))
}
