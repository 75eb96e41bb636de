//! # Wall Geometry
//!
//! Pier and spandrel panel geometry and the wall container. Dimensions are
//! in meters; derived section properties (areas, section modulus,
//! slenderness) are computed on demand and never cached.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "piers": [
//!     { "length": 1.0, "height": 2.8, "thickness": 0.3 },
//!     { "length": 1.0, "height": 2.8, "thickness": 0.3, "position_x": 3.5 }
//!   ],
//!   "spandrels": [
//!     { "length": 1.5, "height": 0.5, "thickness": 0.3, "arch_rise": 0.1 }
//!   ],
//!   "pier_spacing": 0.5
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::SlendernessType;
use crate::errors::{SamError, SamResult};

/// Minimum admissible panel dimension (m).
pub const MIN_DIMENSION: f64 = 0.05;

/// Minimum admissible cross-sectional area (m²), consistent with
/// `MIN_DIMENSION` squared.
pub const MIN_AREA: f64 = 0.0025;

/// Geometry of a masonry pier (vertical panel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PierGeometry {
    /// In-plane length (m)
    pub length: f64,
    /// Height (m)
    pub height: f64,
    /// Out-of-plane thickness (m)
    pub thickness: f64,
    /// Centroid abscissa along the wall (m); computed from pier order and
    /// spacing when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_x: Option<f64>,
}

impl PierGeometry {
    pub fn new(length: f64, height: f64, thickness: f64) -> Self {
        PierGeometry {
            length,
            height,
            thickness,
            position_x: None,
        }
    }

    /// Cross-sectional area (m²)
    pub fn area(&self) -> f64 {
        self.length * self.thickness
    }

    /// In-plane section modulus W = t·l²/6 (m³)
    pub fn section_modulus(&self) -> f64 {
        self.thickness * self.length.powi(2) / 6.0
    }

    /// Height-to-thickness (out-of-plane) or height-to-length (in-plane)
    /// slenderness ratio.
    pub fn slenderness(&self, kind: SlendernessType) -> f64 {
        match kind {
            SlendernessType::OutOfPlane => self.height / self.thickness,
            SlendernessType::InPlane => self.height / self.length,
        }
    }

    fn validate(&self, index: usize) -> SamResult<()> {
        validate_panel_dimensions("pier", index, self.length, self.height, self.thickness)
    }
}

/// Geometry of a masonry spandrel (horizontal coupling panel over an
/// opening).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpandrelGeometry {
    /// Clear span between piers (m)
    pub length: f64,
    /// Panel height (m)
    pub height: f64,
    /// Out-of-plane thickness (m)
    pub thickness: f64,
    /// Rise of an arched lintel (m); 0 for a straight spandrel
    #[serde(default)]
    pub arch_rise: f64,
}

impl SpandrelGeometry {
    pub fn new(length: f64, height: f64, thickness: f64) -> Self {
        SpandrelGeometry {
            length,
            height,
            thickness,
            arch_rise: 0.0,
        }
    }

    /// Cross-sectional area resisting axial load (m²)
    pub fn area(&self) -> f64 {
        self.height * self.thickness
    }

    /// Area resisting shear along the span (m²)
    pub fn shear_area(&self) -> f64 {
        self.length * self.thickness
    }

    /// Section modulus of the vertical cross section W = t·h²/6 (m³)
    pub fn section_modulus(&self) -> f64 {
        self.thickness * self.height.powi(2) / 6.0
    }

    pub fn is_arched(&self) -> bool {
        self.arch_rise > 0.0
    }

    /// Arch rise limited to the geometrically plausible range
    /// (at most l/2 and at most the panel height).
    pub fn effective_arch_rise(&self) -> f64 {
        self.arch_rise.min(self.length / 2.0).min(self.height)
    }

    /// Slenderness ratio of the panel.
    pub fn slenderness(&self, kind: SlendernessType) -> f64 {
        match kind {
            SlendernessType::OutOfPlane => self.height / self.thickness,
            SlendernessType::InPlane => self.height / self.length,
        }
    }

    fn validate(&self, index: usize) -> SamResult<()> {
        validate_panel_dimensions("spandrel", index, self.length, self.height, self.thickness)?;
        if !self.arch_rise.is_finite() || self.arch_rise < 0.0 {
            return Err(SamError::invalid_input(
                format!("spandrel[{}].arch_rise", index),
                self.arch_rise.to_string(),
                "Arch rise must be >= 0",
            ));
        }
        Ok(())
    }
}

fn validate_panel_dimensions(
    kind: &str,
    index: usize,
    length: f64,
    height: f64,
    thickness: f64,
) -> SamResult<()> {
    for (field, value) in [
        ("length", length),
        ("height", height),
        ("thickness", thickness),
    ] {
        if !value.is_finite() || value < MIN_DIMENSION {
            return Err(SamError::invalid_input(
                format!("{}[{}].{}", kind, index, field),
                value.to_string(),
                format!("Dimension must be >= {} m", MIN_DIMENSION),
            ));
        }
    }
    Ok(())
}

/// A wall: ordered pier and spandrel collections plus optional pier
/// spacing used when pier positions are left implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    #[serde(default)]
    pub piers: Vec<PierGeometry>,
    #[serde(default)]
    pub spandrels: Vec<SpandrelGeometry>,
    /// Nominal clear distance between adjacent piers (m)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pier_spacing: Option<f64>,
}

impl Wall {
    pub fn new(piers: Vec<PierGeometry>, spandrels: Vec<SpandrelGeometry>) -> Self {
        Wall {
            piers,
            spandrels,
            pier_spacing: None,
        }
    }

    /// Validate all panels and the wall as a whole.
    ///
    /// A wall with neither piers nor spandrels cannot be verified and is
    /// rejected here, before any load distribution happens.
    pub fn validate(&self) -> SamResult<()> {
        if self.piers.is_empty() && self.spandrels.is_empty() {
            return Err(SamError::EmptyWall);
        }
        if let Some(spacing) = self.pier_spacing {
            if !spacing.is_finite() || spacing < 0.0 {
                return Err(SamError::invalid_input(
                    "pier_spacing",
                    spacing.to_string(),
                    "Pier spacing must be >= 0",
                ));
            }
        }
        for (i, pier) in self.piers.iter().enumerate() {
            pier.validate(i)?;
        }
        for (i, spandrel) in self.spandrels.iter().enumerate() {
            spandrel.validate(i)?;
        }
        Ok(())
    }

    /// Pier centroid positions (m): explicit where given, otherwise laid
    /// out left to right using `pier_spacing` (default 0.5 m).
    pub fn pier_positions(&self) -> Vec<f64> {
        let spacing = self.pier_spacing.unwrap_or(0.5);
        let mut x_cursor = 0.0;
        self.piers
            .iter()
            .map(|pier| match pier.position_x {
                Some(x) => x,
                None => {
                    let x = x_cursor + pier.length / 2.0;
                    x_cursor += pier.length + spacing;
                    x
                }
            })
            .collect()
    }

    /// Total pier cross-sectional area (m²)
    pub fn total_pier_area(&self) -> f64 {
        self.piers.iter().map(PierGeometry::area).sum()
    }

    /// Total spandrel cross-sectional area (m²)
    pub fn total_spandrel_area(&self) -> f64 {
        self.spandrels.iter().map(SpandrelGeometry::area).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pier_section_properties() {
        let pier = PierGeometry::new(1.2, 3.0, 0.25);
        assert_relative_eq!(pier.area(), 0.3);
        assert_relative_eq!(pier.section_modulus(), 0.25 * 1.44 / 6.0);
    }

    #[test]
    fn test_pier_slenderness_kinds() {
        let pier = PierGeometry::new(1.2, 3.0, 0.25);
        assert_relative_eq!(pier.slenderness(SlendernessType::OutOfPlane), 12.0);
        assert_relative_eq!(pier.slenderness(SlendernessType::InPlane), 2.5);
    }

    #[test]
    fn test_spandrel_areas() {
        let spandrel = SpandrelGeometry::new(2.0, 0.6, 0.25);
        assert_relative_eq!(spandrel.area(), 0.15);
        assert_relative_eq!(spandrel.shear_area(), 0.5);
    }

    #[test]
    fn test_effective_arch_rise_clamped() {
        let mut spandrel = SpandrelGeometry::new(2.0, 0.6, 0.25);
        spandrel.arch_rise = 1.5; // more than l/2 and more than height
        assert_relative_eq!(spandrel.effective_arch_rise(), 0.6);
    }

    #[test]
    fn test_validation_rejects_thin_panel() {
        let wall = Wall::new(vec![PierGeometry::new(1.0, 2.8, 0.01)], vec![]);
        let err = wall.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_empty_wall_rejected() {
        let wall = Wall::new(vec![], vec![]);
        assert_eq!(wall.validate().unwrap_err(), SamError::EmptyWall);
    }

    #[test]
    fn test_pier_positions_from_spacing() {
        let mut wall = Wall::new(
            vec![PierGeometry::new(1.0, 2.8, 0.3), PierGeometry::new(1.0, 2.8, 0.3)],
            vec![],
        );
        wall.pier_spacing = Some(0.4);
        let positions = wall.pier_positions();
        assert_relative_eq!(positions[0], 0.5);
        assert_relative_eq!(positions[1], 1.9);
    }

    #[test]
    fn test_explicit_position_wins() {
        let mut pier = PierGeometry::new(1.0, 2.8, 0.3);
        pier.position_x = Some(4.2);
        let wall = Wall::new(vec![pier], vec![]);
        assert_relative_eq!(wall.pier_positions()[0], 4.2);
    }

    #[test]
    fn test_wall_serde_roundtrip() {
        let wall = Wall::new(
            vec![PierGeometry::new(1.0, 2.8, 0.3)],
            vec![SpandrelGeometry::new(1.5, 0.5, 0.3)],
        );
        let json = serde_json::to_string(&wall).unwrap();
        let roundtrip: Wall = serde_json::from_str(&json).unwrap();
        assert_eq!(wall, roundtrip);
    }
}
