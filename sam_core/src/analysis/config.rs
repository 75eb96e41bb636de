//! Analysis options: safety factors, load-sharing policy, formula
//! reduction factors, and numeric thresholds.

use serde::{Deserialize, Serialize};

use crate::errors::{SamError, SamResult};

/// Which height ratio feeds the diagonal-shear shape factor.
///
/// Both orientations resolve to the same effective-height ratio machinery;
/// they differ only in the reference dimension (thickness out of plane,
/// length in plane).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlendernessType {
    #[serde(
        rename = "OOP",
        alias = "oop",
        alias = "out",
        alias = "OUT",
        alias = "out_of_plane",
        alias = "OUT_OF_PLANE"
    )]
    OutOfPlane,
    #[serde(
        rename = "IP",
        alias = "ip",
        alias = "in",
        alias = "IN",
        alias = "in_plane",
        alias = "IN_PLANE"
    )]
    InPlane,
}

impl Default for SlendernessType {
    fn default() -> Self {
        SlendernessType::OutOfPlane
    }
}

/// Configuration of a verification run.
///
/// Defaults follow common practice for existing masonry buildings: 70/30
/// horizontal sharing, vertical load carried by piers alone, out-of-plane
/// slenderness for the shear shape factor.
///
/// ## JSON Example
///
/// ```json
/// {
///   "gamma_m": 2.0,
///   "FC": 1.35,
///   "pier_load_share": 0.7,
///   "spandrel_load_share": 0.3,
///   "vertical_load_to_piers_only": true,
///   "consider_spandrel_axial": false,
///   "tension_reduction_sliding": 0.5,
///   "tension_reduction_diagonal": 0.7,
///   "arch_shear_reduction": 0.5,
///   "mu_friction": 0.4,
///   "max_friction_absolute": 0.5,
///   "slenderness_type": "OOP"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Material partial safety factor (>= 1); divides design strengths
    pub gamma_m: f64,

    /// Knowledge confidence factor (>= 1); divides design strengths
    #[serde(rename = "FC")]
    pub fc: f64,

    /// Requested fraction of horizontal demand routed to piers
    pub pier_load_share: f64,

    /// Requested fraction of horizontal demand routed to spandrels
    pub spandrel_load_share: f64,

    /// Route the whole vertical load to piers, withholding axial demand
    /// from spandrels even when `consider_spandrel_axial` is set
    pub vertical_load_to_piers_only: bool,

    /// Whether spandrels receive any axial demand at all
    pub consider_spandrel_axial: bool,

    /// Multiplier on the sliding-shear capacity (low-quality mortar/units)
    pub tension_reduction_sliding: f64,

    /// Multiplier on the diagonal-shear capacity
    pub tension_reduction_diagonal: f64,

    /// Extra multiplier on the shear capacity of arched spandrels
    pub arch_shear_reduction: f64,

    /// Coulomb friction coefficient for the sliding-shear formula
    pub mu_friction: f64,

    /// Absolute ceiling (MPa) on the cohesion+friction stress in the
    /// sliding-shear formula; friction can never push past this cap
    pub max_friction_absolute: f64,

    /// Slenderness ratio feeding the diagonal-shear shape factor
    pub slenderness_type: SlendernessType,

    /// DCR at or below which an element is reported "safe" rather than
    /// merely "near_limit"
    pub safety_threshold: f64,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            gamma_m: 2.0,
            fc: 1.0,
            pier_load_share: 0.7,
            spandrel_load_share: 0.3,
            vertical_load_to_piers_only: true,
            consider_spandrel_axial: false,
            tension_reduction_sliding: 0.5,
            tension_reduction_diagonal: 0.7,
            arch_shear_reduction: 0.5,
            mu_friction: 0.4,
            max_friction_absolute: 0.5,
            slenderness_type: SlendernessType::OutOfPlane,
            safety_threshold: 0.8,
        }
    }
}

impl AnalysisOptions {
    /// Validate the option ranges.
    ///
    /// The load shares are deliberately not range-checked here: the
    /// distributor clamps them into [0,1] and reports both the requested
    /// and the effective value.
    pub fn validate(&self) -> SamResult<()> {
        if !self.gamma_m.is_finite() || self.gamma_m < 1.0 {
            return Err(SamError::invalid_input(
                "gamma_m",
                self.gamma_m.to_string(),
                "Material partial safety factor must be >= 1",
            ));
        }
        if !self.fc.is_finite() || self.fc < 1.0 {
            return Err(SamError::invalid_input(
                "FC",
                self.fc.to_string(),
                "Confidence factor must be >= 1",
            ));
        }
        if !self.pier_load_share.is_finite() || !self.spandrel_load_share.is_finite() {
            return Err(SamError::invalid_input(
                "pier_load_share/spandrel_load_share",
                format!("{}/{}", self.pier_load_share, self.spandrel_load_share),
                "Load shares must be finite numbers",
            ));
        }
        for (field, value) in [
            ("tension_reduction_sliding", self.tension_reduction_sliding),
            ("tension_reduction_diagonal", self.tension_reduction_diagonal),
            ("arch_shear_reduction", self.arch_shear_reduction),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(SamError::invalid_input(
                    field,
                    value.to_string(),
                    "Reduction factor must be in [0, 1]",
                ));
            }
        }
        if !self.mu_friction.is_finite() || self.mu_friction < 0.0 {
            return Err(SamError::invalid_input(
                "mu_friction",
                self.mu_friction.to_string(),
                "Friction coefficient must be >= 0",
            ));
        }
        if !self.max_friction_absolute.is_finite() || self.max_friction_absolute < 0.0 {
            return Err(SamError::invalid_input(
                "max_friction_absolute",
                self.max_friction_absolute.to_string(),
                "Friction ceiling must be >= 0",
            ));
        }
        if !self.safety_threshold.is_finite() || !(0.0..=1.0).contains(&self.safety_threshold) {
            return Err(SamError::invalid_input(
                "safety_threshold",
                self.safety_threshold.to_string(),
                "Safety threshold must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(AnalysisOptions::default().validate().is_ok());
    }

    #[test]
    fn test_gamma_m_below_one_rejected() {
        let mut options = AnalysisOptions::default();
        options.gamma_m = 0.9;
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_fc_below_one_rejected() {
        let mut options = AnalysisOptions::default();
        options.fc = 0.0;
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_out_of_range_shares_pass_validation() {
        // Shares are clamped later, not rejected here.
        let mut options = AnalysisOptions::default();
        options.pier_load_share = 1.4;
        options.spandrel_load_share = -0.4;
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_reduction_factor_range() {
        let mut options = AnalysisOptions::default();
        options.tension_reduction_diagonal = 1.2;
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_slenderness_aliases() {
        for alias in ["\"OOP\"", "\"oop\"", "\"out_of_plane\"", "\"OUT\""] {
            let kind: SlendernessType = serde_json::from_str(alias).unwrap();
            assert_eq!(kind, SlendernessType::OutOfPlane);
        }
        for alias in ["\"IP\"", "\"ip\"", "\"in_plane\"", "\"IN\""] {
            let kind: SlendernessType = serde_json::from_str(alias).unwrap();
            assert_eq!(kind, SlendernessType::InPlane);
        }
    }

    #[test]
    fn test_options_deserialize_partial() {
        let options: AnalysisOptions =
            serde_json::from_str(r#"{"gamma_m": 2.0, "FC": 1.35}"#).unwrap();
        assert_eq!(options.fc, 1.35);
        assert_eq!(options.pier_load_share, 0.7);
    }
}
