use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

/// Write a synthetic Sparse Bullshark / Bullshark data set.
#[derive(Debug, Parser)]
#[command(about)]
struct Args {
    /// Output directory (created if missing).
    #[arg(default_value = ".")]
    out_dir: PathBuf,

    /// Independent runs per sample size.
    #[arg(long, default_value_t = 5)]
    runs: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const LOADS: [u32; 5] = [2000, 3000, 4000, 5000, 6000];
const SAMPLE_SIZES: [u32; 6] = [5, 10, 20, 40, 60, 80];
const VALIDATORS: f64 = 100.0;
const WINDOW_SECS: f64 = 60.0;
/// Inverse of the viewer's `bytes * 8000 / 2^20` saturation transform.
const BYTES_PER_MBIT: f64 = 1024.0 * 1024.0 / 8000.0;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Multiplicative jitter around 1.0, never below zero.
    fn jitter(&mut self, spread: f64) -> f64 {
        self.gauss(1.0, spread).max(0.0)
    }
}

/// One run's raw counters: blocks ordered, cumulative latency, bytes sent.
struct Run {
    blocks: f64,
    latency: f64,
    bytes: f64,
}

/// Baseline: full broadcast, so NIC usage tracks the injected load.
fn baseline_run(load: u32, rng: &mut SimpleRng) -> Run {
    let load_gbit = load as f64 / 1000.0;
    Run {
        blocks: 6000.0 / (1.0 + 0.15 * load_gbit) * WINDOW_SECS * rng.jitter(0.03),
        latency: (1.2 + 0.35 * load_gbit) * WINDOW_SECS * rng.jitter(0.05),
        bytes: load as f64 * 0.9 * BYTES_PER_MBIT * rng.jitter(0.02),
    }
}

/// Sparse: each validator talks to `sample` peers, trading latency for bandwidth.
fn sparse_run(load: u32, sample: u32, rng: &mut SimpleRng) -> Run {
    let load_gbit = load as f64 / 1000.0;
    let fanout = sample as f64 / VALIDATORS;
    Run {
        blocks: 6000.0 / (1.0 + 0.08 * load_gbit) * (0.85 + 0.15 * fanout) * WINDOW_SECS
            * rng.jitter(0.03),
        latency: (1.2 + 0.2 * load_gbit + 1.5 / (1.0 + sample as f64 / 10.0)) * WINDOW_SECS
            * rng.jitter(0.05),
        bytes: load as f64 * (0.15 + 0.75 * fanout) * BYTES_PER_MBIT * rng.jitter(0.02),
    }
}

fn writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    csv::WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))
}

fn write_load(dir: &Path, load: u32, runs: usize, rng: &mut SimpleRng) -> Result<()> {
    let sparse_path = dir.join(format!("sparse_bullshark_{load}.csv"));
    let mut sparse = writer(&sparse_path)?;
    for &sample in &SAMPLE_SIZES {
        for _ in 0..runs {
            let run = sparse_run(load, sample, rng);
            sparse.write_record([
                sample.to_string(),
                format!("{:.0}", run.blocks),
                format!("{:.0}", run.latency),
                format!("{:.0}", run.bytes),
            ])?;
        }
    }
    sparse.flush()?;

    let baseline_path = dir.join(format!("bullshark_{load}.csv"));
    let mut baseline = writer(&baseline_path)?;
    for _ in 0..runs {
        let run = baseline_run(load, rng);
        baseline.write_record([
            format!("{:.0}", run.blocks),
            format!("{:.0}", run.latency),
            format!("{:.0}", run.bytes),
        ])?;
    }
    baseline.flush()?;

    log::info!(
        "wrote {} and {}",
        sparse_path.display(),
        baseline_path.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let mut rng = SimpleRng::new(args.seed);
    for &load in &LOADS {
        write_load(&args.out_dir, load, args.runs, &mut rng)?;
    }

    println!(
        "Wrote {} load levels ({} sample sizes x {} runs) to {}",
        LOADS.len(),
        SAMPLE_SIZES.len(),
        args.runs,
        args.out_dir.display()
    );
    Ok(())
}
