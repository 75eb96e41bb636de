//! # Capacity Evaluation
//!
//! Closed-form resisting capacities per element and failure mechanism,
//! compared against the demand routed to the element by the load
//! distributor. Three mechanisms are checked:
//!
//! - **Flexure** — pier capacity from the axial-interaction envelope
//!   `M_u = (l²·t·σ0/2)·(1 − σ0/(0.85·fd))`; spandrel capacity from the
//!   section modulus (straight) or the three-hinge arch estimate (arched).
//! - **Sliding shear** — Coulomb model with the cohesion+friction stress
//!   capped at `max_friction_absolute` before the reduction factor.
//! - **Diagonal shear** — Turnšek–Čačovič form with the shape factor `b`
//!   taken from the configured slenderness ratio, clamped into [1.0, 1.5].
//!
//! Numerical policy: axial interaction is disabled when the element axial
//! load is below [`ZERO_TOLERANCE`] (the formulas degenerate to their
//! cohesion-only forms and `axial_effect_active` is reported false), and
//! any non-finite or non-positive capacity facing a real demand is
//! classified [`Classification::Invalid`] instead of letting NaN or
//! infinity leak into the verdict.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::diagnostics::{DiagnosticSink, Severity};
use crate::loads::ElementDemand;
use crate::materials::{design_value, DesignValues, MaterialProperties};
use crate::wall::{PierGeometry, SpandrelGeometry};

use super::config::AnalysisOptions;

/// Axial loads with a magnitude at or below this threshold (kN) are
/// treated as zero: axial-interaction terms are disabled to avoid
/// instability of the formulas around σ0 ≈ 0.
pub const ZERO_TOLERANCE: f64 = 1e-3;

/// Numerical tolerance for treating capacities/demands as zero.
pub(crate) const EPSILON: f64 = 1e-10;

/// Fraction of the design compressive strength bounding the flexural
/// interaction envelope; axial stress beyond `0.85·fd` is crushing.
pub const CRUSHING_ENVELOPE: f64 = 0.85;

const SHAPE_FACTOR_MIN: f64 = 1.0;
const SHAPE_FACTOR_MAX: f64 = 1.5;

/// Failure mechanism whose capacity was evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    Flexure,
    SlidingShear,
    DiagonalShear,
    ArchShear,
}

/// Outcome classification of a single capacity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// Capacity and ratio are meaningful numbers
    #[serde(rename = "OK")]
    Ok,
    /// Axial stress exceeds the compressive envelope; fails regardless of
    /// any numeric ratio
    #[serde(rename = "CRUSHING")]
    Crushing,
    /// Degenerate formula (zero/negative capacity or non-finite result)
    /// facing a real demand; fails regardless of any numeric ratio
    #[serde(rename = "INVALID")]
    Invalid,
}

impl Classification {
    /// Crushing and invalid outcomes fail verification no matter what the
    /// numeric ratios say.
    pub fn is_critical(&self) -> bool {
        matches!(self, Classification::Crushing | Classification::Invalid)
    }
}

/// Governing failure mode tag, at element or wall level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    Flexure,
    SlidingShear,
    DiagonalShear,
    ArchShear,
    Crushing,
    Invalid,
}

impl FailureMode {
    pub fn is_critical(&self) -> bool {
        matches!(self, FailureMode::Crushing | FailureMode::Invalid)
    }
}

impl From<Mechanism> for FailureMode {
    fn from(mechanism: Mechanism) -> Self {
        match mechanism {
            Mechanism::Flexure => FailureMode::Flexure,
            Mechanism::SlidingShear => FailureMode::SlidingShear,
            Mechanism::DiagonalShear => FailureMode::DiagonalShear,
            Mechanism::ArchShear => FailureMode::ArchShear,
        }
    }
}

/// Demand-to-capacity ratio as a validated number.
///
/// `Finite` is guaranteed finite and non-negative by construction;
/// degenerate ratios are the explicit `Undefined` marker, which serializes
/// to the string `"N/D"` so a formatter can never mistake it for a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dcr {
    Finite(f64),
    Undefined,
}

impl Dcr {
    /// Build a ratio, containing non-finite values as `Undefined`.
    pub fn finite(value: f64) -> Self {
        if value.is_finite() {
            Dcr::Finite(value.abs())
        } else {
            Dcr::Undefined
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Dcr::Finite(v) => Some(*v),
            Dcr::Undefined => None,
        }
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, Dcr::Finite(_))
    }

    /// Larger of two ratios; `Undefined` dominates any finite value.
    pub fn max(self, other: Dcr) -> Dcr {
        match (self, other) {
            (Dcr::Finite(a), Dcr::Finite(b)) => Dcr::Finite(a.max(b)),
            _ => Dcr::Undefined,
        }
    }
}

impl fmt::Display for Dcr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dcr::Undefined => write!(f, "N/D"),
            Dcr::Finite(v) if *v > 999.0 => write!(f, ">999"),
            Dcr::Finite(v) => write!(f, "{:.3}", v),
        }
    }
}

impl Serialize for Dcr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Dcr::Finite(v) => serializer.serialize_f64(*v),
            Dcr::Undefined => serializer.serialize_str("N/D"),
        }
    }
}

impl<'de> Deserialize<'de> for Dcr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DcrVisitor;

        impl<'de> Visitor<'de> for DcrVisitor {
            type Value = Dcr;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative number or the marker \"N/D\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Dcr, E> {
                Ok(Dcr::finite(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Dcr, E> {
                Ok(Dcr::finite(v as f64))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Dcr, E> {
                Ok(Dcr::finite(v as f64))
            }

            fn visit_str<E: de::Error>(self, _v: &str) -> Result<Dcr, E> {
                Ok(Dcr::Undefined)
            }
        }

        deserializer.deserialize_any(DcrVisitor)
    }
}

/// Capacity check of one mechanism on one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityResult {
    /// Mechanism that was checked
    pub mechanism: Mechanism,
    /// Resisting capacity (kNm for flexure, kN for shear)
    pub capacity: f64,
    /// Demand magnitude routed to the element (same unit as `capacity`)
    pub demand: f64,
    /// demand / capacity, contained as `"N/D"` when degenerate
    pub ratio: Dcr,
    pub classification: Classification,
    /// Whether axial interaction entered this formula (false below the
    /// near-zero axial threshold)
    pub axial_effect_active: bool,
}

impl CapacityResult {
    fn checked(
        mechanism: Mechanism,
        capacity: f64,
        demand: f64,
        axial_effect_active: bool,
    ) -> Self {
        let demand = demand.abs();
        let (ratio, classification) = if !capacity.is_finite() || !demand.is_finite() {
            (Dcr::Undefined, Classification::Invalid)
        } else if demand <= EPSILON {
            // Nothing to resist: trivially satisfied even at zero capacity.
            (Dcr::Finite(0.0), Classification::Ok)
        } else if capacity <= EPSILON {
            (Dcr::Undefined, Classification::Invalid)
        } else {
            (Dcr::finite(demand / capacity), Classification::Ok)
        };
        CapacityResult {
            mechanism,
            capacity: if capacity.is_finite() { capacity.max(0.0) } else { 0.0 },
            demand,
            ratio,
            classification,
            axial_effect_active,
        }
    }

    fn crushing(mechanism: Mechanism, demand: f64) -> Self {
        CapacityResult {
            mechanism,
            capacity: 0.0,
            demand: demand.abs(),
            ratio: Dcr::Undefined,
            classification: Classification::Crushing,
            axial_effect_active: true,
        }
    }
}

/// Axial state shared by the mechanism formulas of one element.
struct AxialState {
    /// Compressive stress σ0 (MPa, positive in compression, negative in
    /// tension, exactly 0.0 when interaction is disabled)
    sigma_0: f64,
    /// Whether |N| exceeded the near-zero threshold
    active: bool,
}

impl AxialState {
    fn from_demand(axial_kn: f64, area_m2: f64) -> Self {
        // Compression-negative wall convention; σ0 positive in compression.
        let compression = -axial_kn;
        if compression.abs() <= ZERO_TOLERANCE || area_m2 <= 0.0 {
            AxialState {
                sigma_0: 0.0,
                active: false,
            }
        } else {
            AxialState {
                // kN/m² -> MPa
                sigma_0: compression / area_m2 / 1000.0,
                active: true,
            }
        }
    }
}

/// Evaluate the three mechanism capacities of a pier.
pub(crate) fn evaluate_pier(
    index: usize,
    pier: &PierGeometry,
    demand: &ElementDemand,
    material: &MaterialProperties,
    design: &DesignValues,
    options: &AnalysisOptions,
    sink: &dyn DiagnosticSink,
) -> Vec<CapacityResult> {
    let area = pier.area();
    let axial = AxialState::from_demand(demand.axial, area);
    if !axial.active {
        sink.emit(
            Severity::Debug,
            &format!("pier {}: |N| below threshold, axial interaction disabled", index + 1),
        );
    }

    let flexure = pier_flexure(index, pier, demand, design, &axial, sink);
    let sliding = sliding_shear(
        Mechanism::SlidingShear,
        area,
        demand,
        material.sliding_cohesion(true),
        options,
        &axial,
    );
    let diagonal = diagonal_shear(
        Mechanism::DiagonalShear,
        area,
        pier.slenderness(options.slenderness_type),
        demand,
        design,
        options,
        &axial,
        1.0,
    );

    vec![flexure, sliding, diagonal]
}

/// Evaluate the three mechanism capacities of a spandrel.
pub(crate) fn evaluate_spandrel(
    index: usize,
    spandrel: &SpandrelGeometry,
    demand: &ElementDemand,
    material: &MaterialProperties,
    design: &DesignValues,
    options: &AnalysisOptions,
    sink: &dyn DiagnosticSink,
) -> Vec<CapacityResult> {
    let axial = AxialState::from_demand(demand.axial, spandrel.area());
    let arched = spandrel.is_arched();

    // Crushing envelope applies once spandrel axial interaction is real.
    if axial.active && axial.sigma_0 > CRUSHING_ENVELOPE * design.fcd {
        sink.emit(
            Severity::Warning,
            &format!(
                "spandrel {}: axial stress {:.3} MPa exceeds the compressive envelope",
                index + 1,
                axial.sigma_0
            ),
        );
        let demand_m = demand.moment;
        let mut out = vec![CapacityResult::crushing(Mechanism::Flexure, demand_m)];
        out.push(spandrel_sliding(spandrel, demand, material, options, &axial));
        out.push(spandrel_diagonal(spandrel, demand, design, options, &axial, arched));
        return out;
    }

    let flexure_capacity = if arched {
        // Three-hinge arch estimate: fd·t·rise·l/8, MPa·m³ -> kNm.
        design.fcd * spandrel.thickness * spandrel.effective_arch_rise() * spandrel.length * 1000.0
            / 8.0
    } else {
        spandrel.section_modulus() * design.fcd * 1000.0
    };
    let flexure = CapacityResult::checked(
        Mechanism::Flexure,
        flexure_capacity,
        demand.moment,
        axial.active,
    );

    let sliding = spandrel_sliding(spandrel, demand, material, options, &axial);
    let diagonal = spandrel_diagonal(spandrel, demand, design, options, &axial, arched);

    vec![flexure, sliding, diagonal]
}

fn spandrel_sliding(
    spandrel: &SpandrelGeometry,
    demand: &ElementDemand,
    material: &MaterialProperties,
    options: &AnalysisOptions,
    axial: &AxialState,
) -> CapacityResult {
    sliding_shear(
        Mechanism::SlidingShear,
        spandrel.shear_area(),
        demand,
        material.sliding_cohesion(false),
        options,
        axial,
    )
}

fn spandrel_diagonal(
    spandrel: &SpandrelGeometry,
    demand: &ElementDemand,
    design: &DesignValues,
    options: &AnalysisOptions,
    axial: &AxialState,
    arched: bool,
) -> CapacityResult {
    let arch_multiplier = if arched { options.arch_shear_reduction } else { 1.0 };
    let mechanism = if arched {
        Mechanism::ArchShear
    } else {
        Mechanism::DiagonalShear
    };
    diagonal_shear(
        mechanism,
        spandrel.shear_area(),
        spandrel.slenderness(options.slenderness_type),
        demand,
        design,
        options,
        axial,
        arch_multiplier,
    )
}

/// Pier flexural capacity on the axial-interaction envelope.
fn pier_flexure(
    index: usize,
    pier: &PierGeometry,
    demand: &ElementDemand,
    design: &DesignValues,
    axial: &AxialState,
    sink: &dyn DiagnosticSink,
) -> CapacityResult {
    let limit = CRUSHING_ENVELOPE * design.fcd;

    if axial.active && axial.sigma_0 > limit {
        sink.emit(
            Severity::Warning,
            &format!(
                "pier {}: axial stress {:.3} MPa exceeds the compressive envelope {:.3} MPa",
                index + 1,
                axial.sigma_0,
                limit
            ),
        );
        return CapacityResult::crushing(Mechanism::Flexure, demand.moment);
    }

    if axial.active && axial.sigma_0 > 0.9 * limit {
        sink.emit(
            Severity::Warning,
            &format!(
                "pier {}: axial stress {:.3} MPa within 10% of the compressive envelope",
                index + 1,
                axial.sigma_0
            ),
        );
    }

    // Masonry carries no tension; below the axial threshold the envelope
    // formula collapses to zero capacity as well.
    let capacity = if axial.active && axial.sigma_0 > 0.0 && limit > 0.0 {
        // MPa·m³ -> kNm
        pier.length.powi(2) * pier.thickness * axial.sigma_0 / 2.0
            * (1.0 - axial.sigma_0 / limit)
            * 1000.0
    } else {
        0.0
    };

    CapacityResult::checked(Mechanism::Flexure, capacity, demand.moment, axial.active)
}

/// Coulomb sliding-shear capacity with the friction ceiling.
fn sliding_shear(
    mechanism: Mechanism,
    shear_area: f64,
    demand: &ElementDemand,
    cohesion: f64,
    options: &AnalysisOptions,
    axial: &AxialState,
) -> CapacityResult {
    let stress = if axial.active {
        cohesion + options.mu_friction * axial.sigma_0
    } else {
        cohesion
    };
    // Cap the cohesion+friction stress before the reduction factor so the
    // friction contribution can never dominate past the ceiling.
    let capped = stress.min(options.max_friction_absolute);
    let design_stress = design_value(
        capped * options.tension_reduction_sliding,
        options.gamma_m,
        options.fc,
    );
    let capacity = shear_area * design_stress * 1000.0; // MPa·m² -> kN

    CapacityResult::checked(mechanism, capacity, demand.shear, axial.active)
}

/// Turnšek–Čačovič diagonal-shear capacity.
#[allow(clippy::too_many_arguments)]
fn diagonal_shear(
    mechanism: Mechanism,
    shear_area: f64,
    slenderness: f64,
    demand: &ElementDemand,
    design: &DesignValues,
    options: &AnalysisOptions,
    axial: &AxialState,
    extra_multiplier: f64,
) -> CapacityResult {
    let b = slenderness.clamp(SHAPE_FACTOR_MIN, SHAPE_FACTOR_MAX);
    let interaction = if axial.active {
        1.0 + axial.sigma_0 / design.fvd
    } else {
        1.0
    };
    // Tension beyond the shear strength makes the radicand negative; the
    // NaN is contained by the classifier below.
    let capacity = shear_area * design.fvd / b
        * interaction.sqrt()
        * options.tension_reduction_diagonal
        * extra_multiplier
        * 1000.0;

    CapacityResult::checked(mechanism, capacity, demand.shear, axial.active)
}
