// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ucn_run::RunConfig;

#[derive(Parser, Debug)]
#[command(name = "ucn", version, about = "Ultracold neutron transport on a demo storage bottle")]
pub struct Cli {
    /// Directory holding `run.json`; defaults to the user config directory.
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Propagate a seeded batch and print the tally.
    Run {
        #[command(flatten)]
        overrides: Overrides,
        /// Worker threads; defaults to the available parallelism.
        #[arg(long)]
        workers: Option<usize>,
        /// Summary format on stdout.
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Also write the full report (tally and per-particle records) here.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Re-run one particle of a batch from its seed.
    Replay {
        /// Particle id within the batch.
        id: u64,
        #[command(flatten)]
        overrides: Overrides,
        /// Write the recorded track as JSON here.
        #[arg(long)]
        track: Option<PathBuf>,
        /// Summary format on stdout.
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Inspect or create the stored run configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Print the effective run configuration as JSON.
    Show,
    /// Store the default run configuration, replacing any existing one.
    Init,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human-readable table.
    Table,
    /// One JSON document.
    Json,
}

/// Per-invocation changes to the stored run configuration.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct Overrides {
    /// Number of particles in the batch.
    #[arg(long)]
    pub particles: Option<u64>,
    /// Batch seed.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Simulation time at which every particle stops (s).
    #[arg(long)]
    pub run_end: Option<f64>,
    /// Disable beta decay.
    #[arg(long)]
    pub no_decay: bool,
    /// Disable wall absorption.
    #[arg(long)]
    pub no_losses: bool,
}

impl Overrides {
    pub fn apply(self, config: &mut RunConfig) {
        if let Some(particles) = self.particles {
            config.particles = particles;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(run_end) = self.run_end {
            config.propagation.clock.run_end = run_end;
        }
        if self.no_decay {
            config.propagation.physics.decay = false;
        }
        if self.no_losses {
            config.propagation.physics.wall_losses = false;
        }
    }
}
