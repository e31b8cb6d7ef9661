//! Headless runner for the reference ecosystem.
//!
//! Ticks the world on the simulation thread and logs the population once a
//! second until the run time elapses.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info, warn};
use nevo::simulation::params::Params;
use nevo::simulation::sim_thread::SimulationHandle;
use nevo::simulation::world::World;

const REPORT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "nevo")]
#[command(version)]
#[command(about = "Plants, herbivores and carnivores evolving recurrent minds")]
struct Cli {
    /// Parameter file (JSON); missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wall-clock seconds to run
    #[arg(short, long, default_value = "10")]
    seconds: u64,

    /// Random seed, overrides the parameter file
    #[arg(long)]
    seed: Option<u64>,

    /// Sleep between ticks in microseconds, overrides the parameter file
    #[arg(long)]
    tick_delay: Option<u64>,

    /// Write the effective parameters to this file and exit
    #[arg(long)]
    dump_config: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut params = match &cli.config {
        Some(path) => match Params::load_from_file(path) {
            Ok(params) => params,
            Err(err) => {
                error!("failed to load {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => Params::default(),
    };
    if cli.seed.is_some() {
        params.world.seed = cli.seed;
    }
    if let Some(delay) = cli.tick_delay {
        params.world.tick_delay_us = delay;
    }

    if let Some(path) = &cli.dump_config {
        return match params.save_to_file(path) {
            Ok(()) => {
                info!("parameters written to {}", path.display());
                ExitCode::SUCCESS
            }
            Err(err) => {
                error!("failed to write {}: {err}", path.display());
                ExitCode::FAILURE
            }
        };
    }

    let (tx, rx) = mpsc::channel();
    let mut handle = SimulationHandle::spawn(World::with_default_layout(params), move |publish| {
        // the receiver goes away when main stops listening
        tx.send(publish).ok();
    });

    let deadline = Instant::now() + Duration::from_secs(cli.seconds);
    let mut next_report = Instant::now() + REPORT_INTERVAL;
    while Instant::now() < deadline {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_) | Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                warn!("simulation thread stopped publishing");
                break;
            }
        }
        // drain notifications; only the latest matters
        while rx.try_recv().is_ok() {}

        if Instant::now() >= next_report {
            next_report += REPORT_INTERVAL;
            let snapshot = handle.snapshot();
            let p = snapshot.population;
            info!(
                "step {} ({:.2} ms): {} plants, {} herbivores, {} carnivores, max generation {}",
                snapshot.stats.steps_elapsed,
                snapshot.stats.step_duration_ms,
                p.plants,
                p.herbivores,
                p.carnivores,
                snapshot.stats.max_ancestors,
            );
        }
    }

    handle.shutdown();
    let stats = handle.snapshot().stats;
    info!(
        "finished after {} steps, oldest lineage {} ticks",
        stats.steps_elapsed, stats.max_age
    );
    ExitCode::SUCCESS
}
