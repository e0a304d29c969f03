// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `ucn`: run seeded batches on the demo storage bottle.
//!
//! # Usage
//! ```text
//! ucn [--config-dir DIR] run [--particles N] [--seed S] [--workers W] [--format table|json] [--out FILE]
//! ucn [--config-dir DIR] replay <ID> [--track FILE]
//! ucn [--config-dir DIR] config show|init
//! ```
//!
//! The stored `run.json` supplies defaults; flags override it for one
//! invocation. Logs go to stderr (filter with `RUST_LOG`), results to stdout.

mod cli;
mod output;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ucn_core::TrackRecorder;
use ucn_run::{
    demo, replay_observed, run_batch, ConfigService, FsConfigStore, RunConfig, RUN_CONFIG_KEY,
};

use crate::cli::{Cli, Command, ConfigAction, Format};
use crate::output::{print_json, print_tables, record_table, tally_table, totals_table, RunSummary};

/// Track points kept by `replay --track`.
const TRACK_CAPACITY: usize = 1 << 20;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let store = match &cli.config_dir {
        Some(dir) => FsConfigStore::new(dir),
        None => FsConfigStore::user(),
    }
    .context("failed to open config directory")?;
    let service = ConfigService::new(store);

    match cli.command {
        Command::Run { overrides, workers, format, out } => {
            let mut config = service.run_config().context("failed to load run config")?;
            overrides.apply(&mut config);
            let workers = workers.unwrap_or_else(default_workers);
            let experiment = demo::storage_bottle()?;
            let report = run_batch(&experiment, &config, workers)?;
            if let Some(path) = out {
                write_json(&path, &report)?;
                info!(path = %path.display(), "report written");
            }
            match format {
                Format::Table => print_tables(&[tally_table(&config, &report.tally), totals_table(&report.tally)])?,
                Format::Json => print_json(&RunSummary {
                    seed: config.seed,
                    particles: config.particles,
                    workers,
                    tally: &report.tally,
                })?,
            }
        }
        Command::Replay { id, overrides, track, format } => {
            let mut config = service.run_config().context("failed to load run config")?;
            overrides.apply(&mut config);
            let experiment = demo::storage_bottle()?;
            let mut recorder = TrackRecorder::with_capacity(if track.is_some() { TRACK_CAPACITY } else { 0 });
            let record = replay_observed(&experiment, &config, id, &mut recorder)?;
            if let Some(path) = track {
                write_json(&path, recorder.points())?;
                info!(path = %path.display(), points = recorder.points().len(), dropped = recorder.dropped(), "track written");
            }
            match format {
                Format::Table => print_tables(&[record_table(&record)])?,
                Format::Json => print_json(&record)?,
            }
        }
        Command::Config { action } => match action {
            ConfigAction::Show => print_json(&service.run_config()?)?,
            ConfigAction::Init => {
                let config = RunConfig::default();
                service.save(RUN_CONFIG_KEY, &config)?;
                let path = service.into_inner().path_for(RUN_CONFIG_KEY);
                info!(path = %path.display(), "default run config stored");
            }
        },
    }
    Ok(())
}

fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
