// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Physical constants and unit helpers.
//!
//! Lengths are metres, times seconds, fields tesla, energies electronvolts.

/// Speed of light in m/s.
pub const SPEED_OF_LIGHT: f64 = 2.99792458e8;

/// Neutron rest mass energy in eV.
pub const NEUTRON_MASS_EV: f64 = 939.56563e6;

/// Neutron mass in eV·s²/m², so that `E[eV] = ½·m·v²` with `v` in m/s.
pub const NEUTRON_MASS: f64 = NEUTRON_MASS_EV / (SPEED_OF_LIGHT * SPEED_OF_LIGHT);

/// Mean neutron lifetime in seconds.
pub const NEUTRON_LIFETIME: f64 = 885.7;

/// Neutron gyromagnetic ratio in rad·s⁻¹·T⁻¹.
pub const NEUTRON_GYROMAGNETIC_RATIO: f64 = -1.83247185e8;

/// Standard gravitational acceleration in m/s².
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// One nano-electronvolt in eV.
pub const NEV: f64 = 1e-9;

/// Kinetic energy in eV of a neutron moving at `speed` m/s.
pub fn kinetic_energy(speed: f64) -> f64 {
    0.5 * NEUTRON_MASS * speed * speed
}

/// Speed in m/s of a neutron with kinetic energy `energy` eV.
///
/// Negative energies clamp to zero speed.
pub fn speed_from_energy(energy: f64) -> f64 {
    (2.0 * energy.max(0.0) / NEUTRON_MASS).sqrt()
}
