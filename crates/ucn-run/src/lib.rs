// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! ucn-run: batch driver for `ucn-core`.
//!
//! Loads a [`RunConfig`] through a [`ConfigStore`], samples particles from a
//! [`SourceConfig`], propagates them in parallel against a shared
//! [`ucn_core::Experiment`], and folds the outcomes into a [`Tally`].
#![forbid(unsafe_code)]

pub mod batch;
pub mod config;
pub mod demo;
mod error;
mod fs_store;
pub mod source;
pub mod tally;

pub use batch::{particle_seed, replay, replay_observed, run_batch, BatchReport, ParticleRecord};
pub use config::{ConfigError, ConfigService, ConfigStore, MemoryConfigStore, RunConfig, RUN_CONFIG_KEY};
pub use error::RunError;
pub use fs_store::FsConfigStore;
pub use source::SourceConfig;
pub use tally::Tally;
