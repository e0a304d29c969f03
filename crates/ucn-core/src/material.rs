// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wall materials.

/// Optical potential and surface quality of a wall material.
///
/// Energies are in eV. A material only matters for volumes whose kind
/// triggers wall physics (`Boundary`, `Detector`); tracking volumes usually
/// use [`Material::vacuum`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    /// Human-readable label.
    pub name: String,
    /// Real part of the wall potential (eV).
    pub fermi_potential: f64,
    /// Ratio of the imaginary to the real part of the potential.
    pub eta: f64,
    /// Scale in `[0, 1]` on the diffuse-reflection probability.
    pub roughness: f64,
}

impl Material {
    /// Creates a material; validated when registered with a geometry builder.
    pub fn new(name: impl Into<String>, fermi_potential: f64, eta: f64, roughness: f64) -> Self {
        Self { name: name.into(), fermi_potential, eta, roughness }
    }

    /// Zero-potential, lossless, smooth material.
    pub fn vacuum() -> Self {
        Self::new("vacuum", 0.0, 0.0, 0.0)
    }

    /// Reason the material is unusable, if any.
    pub(crate) fn defect(&self) -> Option<&'static str> {
        if !(self.fermi_potential.is_finite() && self.fermi_potential >= 0.0) {
            return Some("fermi potential must be finite and non-negative");
        }
        if !(self.eta.is_finite() && self.eta >= 0.0) {
            return Some("loss factor must be finite and non-negative");
        }
        if !(0.0..=1.0).contains(&self.roughness) {
            return Some("roughness must lie in [0, 1]");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vacuum_is_valid() {
        assert_eq!(Material::vacuum().defect(), None);
    }

    #[test]
    fn bad_roughness_is_reported() {
        let m = Material::new("rough", 100e-9, 0.0, 1.5);
        assert_eq!(m.defect(), Some("roughness must lie in [0, 1]"));
    }
}
