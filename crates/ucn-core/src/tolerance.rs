// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Numerical tolerances for boundary finding and relocation.
//!
//! These values are empirical: boundaries behave as a thin shell roughly
//! `max_nudges · nudge` thick rather than an exact surface. They are kept
//! configurable instead of hard-wired.

/// Tolerance set threaded through shapes and the navigator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tolerances {
    /// Roots with `|t|` below this (seconds) are "the boundary we are on"
    /// when the on-boundary flag is set.
    pub suspect_root: f64,
    /// Surface thickness in metres used when checking that a crossing point
    /// lies on a shape and for snap-through of zero-length steps.
    pub surface: f64,
    /// Polynomial coefficients with magnitude below this are treated as zero.
    pub coefficient: f64,
    /// Length of one relocation micro-step in metres.
    pub nudge: f64,
    /// Maximum number of relocation micro-steps.
    pub max_nudges: usize,
}

impl Tolerances {
    /// Distance from a surface (metres) within which the constant term of a
    /// boundary equation snaps to zero when already on a boundary.
    pub fn on_surface(&self) -> f64 {
        10.0 * self.coefficient
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { suspect_root: 1e-8, surface: 1e-10, coefficient: 1e-10, nudge: 1e-10, max_nudges: 100 }
    }
}
