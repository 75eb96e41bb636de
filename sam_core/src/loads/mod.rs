//! # Wall-Level Loads
//!
//! Actions applied to the wall as a whole, and the policy that apportions
//! them to the pier and spandrel populations ([`distribution`]).
//!
//! Sign convention: `vertical` is compression-negative (a wall under
//! gravity load has `vertical < 0`); `moment` and `shear` may carry either
//! sign and the engine compares capacities against their magnitudes.

pub mod distribution;

use serde::{Deserialize, Serialize};

use crate::errors::{SamError, SamResult};

pub use distribution::{
    distribute, ElementDemand, HorizontalSharing, LoadDistribution, ShareRecord, VerticalSharing,
};

/// Wall-level actions. Immutable per analysis call.
///
/// ## JSON Example
///
/// ```json
/// { "vertical": -200.0, "moment": 50.0, "shear": 30.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Loads {
    /// Axial load (kN), compression-negative
    #[serde(default)]
    pub vertical: f64,
    /// In-plane overturning moment (kNm)
    #[serde(default)]
    pub moment: f64,
    /// In-plane shear (kN)
    #[serde(default)]
    pub shear: f64,
}

impl Loads {
    pub fn new(vertical: f64, moment: f64, shear: f64) -> Self {
        Loads {
            vertical,
            moment,
            shear,
        }
    }

    /// Compression magnitude of the vertical load (kN, >= 0 under
    /// compression).
    pub fn compression(&self) -> f64 {
        -self.vertical
    }

    pub fn validate(&self) -> SamResult<()> {
        for (field, value) in [
            ("vertical", self.vertical),
            ("moment", self.moment),
            ("shear", self.shear),
        ] {
            if !value.is_finite() {
                return Err(SamError::invalid_input(
                    field,
                    value.to_string(),
                    "Load must be a finite number",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_sign_flip() {
        let loads = Loads::new(-200.0, 50.0, 30.0);
        assert_eq!(loads.compression(), 200.0);
    }

    #[test]
    fn test_non_finite_load_rejected() {
        let loads = Loads::new(f64::NAN, 0.0, 0.0);
        assert!(loads.validate().is_err());
    }

    #[test]
    fn test_loads_serde_roundtrip() {
        let loads = Loads::new(-150.0, -45.0, 25.0);
        let json = serde_json::to_string(&loads).unwrap();
        let roundtrip: Loads = serde_json::from_str(&json).unwrap();
        assert_eq!(loads, roundtrip);
    }
}
