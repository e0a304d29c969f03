// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use thiserror::Error;
use ucn_core::GeometryError;

use crate::config::ConfigError;

/// Failure to set up or run a batch. Per-particle faults never surface
/// here; they are tallied as anomalous outcomes.
#[derive(Debug, Error)]
pub enum RunError {
    /// The source cannot be sampled.
    #[error("invalid source: {reason}")]
    InvalidSource {
        /// What is wrong with it.
        reason: &'static str,
    },
    /// The propagation settings cannot drive a particle.
    #[error("invalid propagation settings: {reason}")]
    InvalidPropagation {
        /// What is wrong with them.
        reason: &'static str,
    },
    /// A replay asked for a particle outside the batch.
    #[error("particle {id} is outside a batch of {particles}")]
    UnknownParticle {
        /// Requested id.
        id: u64,
        /// Batch size.
        particles: u64,
    },
    /// The apparatus could not be built.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// Loading or saving configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
