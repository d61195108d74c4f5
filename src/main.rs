use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;

use anyhow::Context;
use catheter_sim::{
    FilterAttributes, JsonLinesSink, ParticleFilter, Simulation, SimulationAttributes,
};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

/// Simulates a catheter driven by currents read from stdin, one value in amps per line.
///
/// Frames are written to stdout as JSON lines. Enter `quit` or close stdin to stop.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to a JSON file with `simulation` and `filter` attributes.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the measurement noise and the particle filter.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of particles tracked by the filter.
    #[arg(long, default_value_t = 1)]
    particles: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    simulation: SimulationAttributes,
    filter: FilterAttributes,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("invalid config {}", path.display()))
}

/// Forwards drive currents read line by line from `reader` to `tx`.
///
/// Requests shutdown on `quit`, at the end of the input, or when reading fails.
fn read_drive_input(reader: impl BufRead, tx: Sender<f64>, shutdown: &AtomicBool) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::warn!("Failed to read drive input: {}", err);
                break;
            }
        };
        let line = line.trim();
        if line == "quit" {
            break;
        }
        match line.parse::<f64>() {
            Ok(amps) if amps.is_finite() => {
                if tx.send(amps).is_err() {
                    break;
                }
            }
            _ if line.is_empty() => {}
            _ => log::warn!("Ignoring drive input {:?}", line),
        }
    }
    shutdown.store(true, Ordering::Relaxed);
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    let (filter, noise_rng) = match args.seed {
        Some(seed) => {
            let filter_rng = StdRng::seed_from_u64(seed.wrapping_add(1));
            let filter = ParticleFilter::new(args.particles, config.filter, filter_rng)?;
            (filter, StdRng::seed_from_u64(seed))
        }
        None => (
            ParticleFilter::from_entropy(args.particles, config.filter)?,
            StdRng::from_entropy(),
        ),
    };
    let mut sim = Simulation::new(config.simulation, filter, noise_rng)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();
    {
        let shutdown = shutdown.clone();
        std::thread::spawn(move || read_drive_input(std::io::stdin().lock(), tx, &shutdown));
    }

    log::info!("catheter-sim v{} starting...", env!("CARGO_PKG_VERSION"));
    let mut sink = JsonLinesSink::new(std::io::stdout().lock());
    sim.run(&rx, &mut sink, &shutdown)
        .context("simulation stopped")?;
    Ok(())
}
