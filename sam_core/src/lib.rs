//! # sam_core - Masonry Wall Verification Engine
//!
//! `sam_core` implements the SAM (Simplified Analysis of Masonry) method
//! for verifying in-plane loaded masonry walls: a wall is modeled as pier
//! and spandrel panels, each panel is checked against its flexural,
//! sliding-shear, and diagonal-shear capacities, and the wall passes when
//! the worst demand-to-capacity ratio is at most 1 and no panel is in a
//! crushing or degenerate state.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: one verification is one pure function call
//! - **JSON-First**: every input and output type is Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//! - **Contained Numerics**: NaN and infinity never reach the verdict;
//!   degenerate ratios surface as the explicit `"N/D"` marker
//!
//! ## Quick Start
//!
//! ```rust
//! use sam_core::analysis::{analyze, AnalysisOptions};
//! use sam_core::loads::Loads;
//! use sam_core::materials::MaterialProperties;
//! use sam_core::wall::{PierGeometry, SpandrelGeometry, Wall};
//!
//! let wall = Wall::new(
//!     vec![PierGeometry::new(1.0, 2.8, 0.3)],
//!     vec![SpandrelGeometry::new(1.5, 0.5, 0.3)],
//! );
//! let material = MaterialProperties::from_typology("solid_brick_lime_mortar").unwrap();
//! let loads = Loads::new(-150.0, 20.0, 15.0);
//!
//! let report = analyze(&wall, &material, &loads, &AnalysisOptions::default()).unwrap();
//! println!("verified: {}, DCR: {}", report.verified, report.format_global_dcr());
//! ```
//!
//! ## Modules
//!
//! - [`wall`] - Pier/spandrel geometry and the wall container
//! - [`materials`] - Masonry strength parameters and typology presets
//! - [`loads`] - Wall-level actions and the load apportioning policy
//! - [`analysis`] - Capacity formulas, verdicts, and the report
//! - [`diagnostics`] - Pluggable diagnostic sink (logging integration)
//! - [`errors`] - Structured error types

pub mod analysis;
pub mod diagnostics;
pub mod errors;
pub mod loads;
pub mod materials;
pub mod wall;

// Re-export commonly used types at crate root for convenience
pub use analysis::{analyze, analyze_with_sink, AnalysisOptions, WallVerificationResult};
pub use errors::{SamError, SamResult};
pub use loads::Loads;
pub use materials::MaterialProperties;
pub use wall::{PierGeometry, SpandrelGeometry, Wall};
