//! # Masonry Materials
//!
//! Characteristic strength parameters for masonry and the derivation of
//! design values. Design values divide the characteristic strengths by
//! `gamma_m * FC` (partial safety factor times knowledge confidence factor)
//! and are derived fresh on every call — never mutated in place.
//!
//! A small database of typology presets covers the recurring existing-
//! masonry types (rubble stone, solid brick, ...) so callers can start from
//! code-book values and override what their investigation campaign improved.
//!
//! ## Example
//!
//! ```rust
//! use sam_core::materials::MaterialProperties;
//!
//! let material = MaterialProperties::from_typology("solid_brick_lime_mortar").unwrap();
//! let design = material.design_values(2.0, 1.35);
//! assert!(design.fcd < material.fk);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{SamError, SamResult};

/// Compute a single design value: `characteristic / (gamma_m * FC)`.
///
/// Referentially transparent: identical inputs always yield identical
/// outputs, which the capacity formulas rely upon. A non-positive divisor
/// yields a non-finite value that the capacity classifier downstream
/// contains as `Invalid`; this function never panics.
pub fn design_value(characteristic: f64, gamma_m: f64, fc: f64) -> f64 {
    let divisor = gamma_m * fc;
    if divisor <= 0.0 {
        f64::NAN
    } else {
        characteristic / divisor
    }
}

/// Mechanical properties of a masonry typology.
///
/// Strengths are characteristic values in MPa; moduli in MPa.
///
/// ## JSON Example
///
/// ```json
/// {
///   "fk": 1.4,
///   "fvk0": 0.035,
///   "fvk": 0.074,
///   "e_modulus": 870.0,
///   "g_modulus": 290.0,
///   "use_fvk0_for_piers": true,
///   "use_fvk0_for_spandrels": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Characteristic compressive strength fk (MPa)
    pub fk: f64,

    /// Characteristic initial (cohesion, zero-axial) shear strength fvk0 (MPa)
    pub fvk0: f64,

    /// Characteristic reference shear strength fvk for the diagonal
    /// cracking check (MPa)
    pub fvk: f64,

    /// Elastic modulus E (MPa)
    #[serde(default = "default_e_modulus")]
    pub e_modulus: f64,

    /// Shear modulus G (MPa)
    #[serde(default = "default_g_modulus")]
    pub g_modulus: f64,

    /// Use fvk0 (cohesion strength) as the sliding-shear base term for
    /// piers; when false the reference fvk is used instead
    #[serde(default = "default_true")]
    pub use_fvk0_for_piers: bool,

    /// Use fvk0 as the sliding-shear base term for spandrels
    #[serde(default)]
    pub use_fvk0_for_spandrels: bool,
}

fn default_e_modulus() -> f64 {
    1000.0
}

fn default_g_modulus() -> f64 {
    400.0
}

fn default_true() -> bool {
    true
}

/// Design strengths after safety/confidence reduction (MPa).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignValues {
    /// Design compressive strength fcd (MPa)
    pub fcd: f64,
    /// Design cohesion shear strength fvd0 (MPa)
    pub fvd0: f64,
    /// Design reference shear strength fvd (MPa)
    pub fvd: f64,
}

impl MaterialProperties {
    /// Construct from explicit characteristic strengths with default moduli
    /// and shear-formula flags.
    pub fn new(fk: f64, fvk0: f64, fvk: f64) -> Self {
        MaterialProperties {
            fk,
            fvk0,
            fvk,
            e_modulus: default_e_modulus(),
            g_modulus: default_g_modulus(),
            use_fvk0_for_piers: true,
            use_fvk0_for_spandrels: false,
        }
    }

    /// Look up a typology preset by name.
    pub fn from_typology(name: &str) -> SamResult<Self> {
        TYPOLOGIES
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, props)| props.clone())
            .ok_or_else(|| SamError::typology_not_found(name))
    }

    /// Names of the available typology presets.
    pub fn typology_names() -> Vec<&'static str> {
        TYPOLOGIES.iter().map(|(key, _)| *key).collect()
    }

    /// Validate the characteristic parameters.
    ///
    /// All strengths must be strictly positive: a zero-strength material is
    /// an input error, not a degenerate capacity.
    pub fn validate(&self) -> SamResult<()> {
        for (field, value) in [
            ("fk", self.fk),
            ("fvk0", self.fvk0),
            ("fvk", self.fvk),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SamError::invalid_input(
                    field,
                    value.to_string(),
                    "Characteristic strength must be a positive finite number",
                ));
            }
        }
        if !self.e_modulus.is_finite() || self.e_modulus <= 0.0 {
            return Err(SamError::invalid_input(
                "e_modulus",
                self.e_modulus.to_string(),
                "Elastic modulus must be positive",
            ));
        }
        if !self.g_modulus.is_finite() || self.g_modulus <= 0.0 {
            return Err(SamError::invalid_input(
                "g_modulus",
                self.g_modulus.to_string(),
                "Shear modulus must be positive",
            ));
        }
        Ok(())
    }

    /// Derive the design strengths for the given safety/confidence factors.
    pub fn design_values(&self, gamma_m: f64, fc: f64) -> DesignValues {
        DesignValues {
            fcd: design_value(self.fk, gamma_m, fc),
            fvd0: design_value(self.fvk0, gamma_m, fc),
            fvd: design_value(self.fvk, gamma_m, fc),
        }
    }

    /// Sliding-shear cohesion term for the given element class (MPa,
    /// characteristic value).
    pub fn sliding_cohesion(&self, is_pier: bool) -> f64 {
        let use_fvk0 = if is_pier {
            self.use_fvk0_for_piers
        } else {
            self.use_fvk0_for_spandrels
        };
        if use_fvk0 {
            self.fvk0
        } else {
            self.fvk
        }
    }
}

/// Typology presets for existing masonry (indicative code-book mean values,
/// MPa). Keys are stable identifiers used by callers and the CLI.
static TYPOLOGIES: Lazy<Vec<(&'static str, MaterialProperties)>> = Lazy::new(|| {
    vec![
        (
            "disordered_rubble_stone",
            MaterialProperties {
                fk: 1.4,
                fvk0: 0.026,
                fvk: 0.052,
                e_modulus: 870.0,
                g_modulus: 290.0,
                use_fvk0_for_piers: true,
                use_fvk0_for_spandrels: false,
            },
        ),
        (
            "rough_cut_stone",
            MaterialProperties {
                fk: 2.0,
                fvk0: 0.043,
                fvk: 0.078,
                e_modulus: 1230.0,
                g_modulus: 410.0,
                use_fvk0_for_piers: true,
                use_fvk0_for_spandrels: false,
            },
        ),
        (
            "soft_stone_blocks",
            MaterialProperties {
                fk: 1.7,
                fvk0: 0.032,
                fvk: 0.064,
                e_modulus: 1080.0,
                g_modulus: 360.0,
                use_fvk0_for_piers: true,
                use_fvk0_for_spandrels: false,
            },
        ),
        (
            "solid_brick_lime_mortar",
            MaterialProperties {
                fk: 3.2,
                fvk0: 0.076,
                fvk: 0.12,
                e_modulus: 1500.0,
                g_modulus: 500.0,
                use_fvk0_for_piers: true,
                use_fvk0_for_spandrels: false,
            },
        ),
        (
            "hollow_brick_cement_mortar",
            MaterialProperties {
                fk: 6.5,
                fvk0: 0.2,
                fvk: 0.3,
                e_modulus: 4550.0,
                g_modulus: 1140.0,
                use_fvk0_for_piers: true,
                use_fvk0_for_spandrels: false,
            },
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_design_value_division() {
        assert_relative_eq!(design_value(1.4, 2.0, 1.35), 1.4 / 2.7);
    }

    #[test]
    fn test_design_value_degenerate_divisor_is_nan() {
        assert!(design_value(1.4, 0.0, 1.0).is_nan());
        assert!(design_value(1.4, -2.0, 1.0).is_nan());
    }

    #[test]
    fn test_design_values_referentially_transparent() {
        let material = MaterialProperties::new(1.4, 0.035, 0.074);
        let a = material.design_values(2.0, 1.35);
        let b = material.design_values(2.0, 1.35);
        assert_eq!(a, b);
    }

    #[test]
    fn test_design_values_decrease_with_fc() {
        let material = MaterialProperties::new(2.4, 0.1, 0.15);
        let base = material.design_values(2.0, 1.0);
        let reduced = material.design_values(2.0, 1.35);
        assert!(reduced.fcd < base.fcd);
        assert!(reduced.fvd0 < base.fvd0);
        assert!(reduced.fvd < base.fvd);
    }

    #[test]
    fn test_validation_rejects_zero_strength() {
        let material = MaterialProperties::new(0.0, 0.035, 0.074);
        assert!(material.validate().is_err());
    }

    #[test]
    fn test_typology_lookup() {
        let material = MaterialProperties::from_typology("solid_brick_lime_mortar").unwrap();
        assert_relative_eq!(material.fk, 3.2);
        assert!(material.validate().is_ok());
    }

    #[test]
    fn test_unknown_typology_errors() {
        let err = MaterialProperties::from_typology("adobe").unwrap_err();
        assert_eq!(err.error_code(), "TYPOLOGY_NOT_FOUND");
    }

    #[test]
    fn test_all_presets_valid() {
        for name in MaterialProperties::typology_names() {
            let material = MaterialProperties::from_typology(name).unwrap();
            assert!(material.validate().is_ok(), "preset {} invalid", name);
        }
    }

    #[test]
    fn test_sliding_cohesion_flags() {
        let material = MaterialProperties::new(2.4, 0.1, 0.15);
        assert_relative_eq!(material.sliding_cohesion(true), 0.1);
        assert_relative_eq!(material.sliding_cohesion(false), 0.15);
    }

    #[test]
    fn test_serde_defaults() {
        let material: MaterialProperties =
            serde_json::from_str(r#"{"fk": 1.4, "fvk0": 0.035, "fvk": 0.074}"#).unwrap();
        assert!(material.use_fvk0_for_piers);
        assert!(!material.use_fvk0_for_spandrels);
        assert_relative_eq!(material.e_modulus, 1000.0);
    }
}
