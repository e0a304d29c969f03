// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-run timing.
//!
//! A [`SimulationClock`] caps each navigation step so that steps land on the
//! run end and on every multiple of the active sampling intervals. An
//! interval of zero disables that kind of sampling.

/// Times closer than this (s) are the same instant.
const INSTANT: f64 = 1e-12;

/// Run end and sampling cadence, all in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationClock {
    /// Simulation time at which every particle stops.
    pub run_end: f64,
    /// Longest single step.
    pub max_step: f64,
    /// Spin measurement cadence.
    pub spin_interval: f64,
    /// Magnetic field sampling cadence.
    pub field_interval: f64,
    /// Track point cadence.
    pub track_interval: f64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self { run_end: 1000.0, max_step: 1.0, spin_interval: 0.0, field_interval: 0.0, track_interval: 0.0 }
    }
}

impl SimulationClock {
    /// Clock with no sampling intervals.
    pub fn new(run_end: f64, max_step: f64) -> Self {
        Self { run_end, max_step, ..Self::default() }
    }

    /// Whether `t` has reached the run end.
    pub fn is_run_over(&self, t: f64) -> bool {
        t >= self.run_end - INSTANT
    }

    /// Longest step allowed from `t`: zero at the run end, otherwise the
    /// minimum of the max step, the time left, and the time to the next
    /// sampling instant.
    pub fn time_to_next_event(&self, t: f64) -> f64 {
        if self.is_run_over(t) {
            return 0.0;
        }
        let mut dt = self.max_step.min(self.run_end - t);
        for interval in [self.spin_interval, self.field_interval, self.track_interval] {
            if interval > 0.0 {
                dt = dt.min(until_next_multiple(t, interval));
            }
        }
        dt
    }

    /// Whether `t` falls on a spin measurement instant.
    pub fn spin_due(&self, t: f64) -> bool {
        on_grid(t, self.spin_interval)
    }

    /// Whether `t` falls on a field sampling instant.
    pub fn field_due(&self, t: f64) -> bool {
        on_grid(t, self.field_interval)
    }

    /// Whether `t` falls on a track recording instant.
    pub fn track_due(&self, t: f64) -> bool {
        on_grid(t, self.track_interval)
    }
}

fn until_next_multiple(t: f64, interval: f64) -> f64 {
    let next = ((t / interval).floor() + 1.0) * interval;
    let dt = next - t;
    if dt < INSTANT { dt + interval } else { dt }
}

fn on_grid(t: f64, interval: f64) -> bool {
    interval > 0.0 && (t - (t / interval).round() * interval).abs() < 1e-9
}
