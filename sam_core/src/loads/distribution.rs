//! Load apportioning between pier and spandrel populations.
//!
//! The wall-level actions are split in two stages: first between the two
//! element classes using the configured horizontal shares (clamped,
//! renormalized, and overridden where the configured load path is not
//! physically achievable), then within each class by an area-weighted
//! split. Both the *requested* and the *effective* shares are recorded so
//! callers can detect when the engine had to redistribute.

use serde::{Deserialize, Serialize};

use crate::analysis::capacity::ZERO_TOLERANCE;
use crate::analysis::AnalysisOptions;
use crate::diagnostics::{DiagnosticSink, Severity};
use crate::loads::Loads;
use crate::wall::{Wall, MIN_AREA};

/// A load share as configured by the caller and as actually applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShareRecord {
    /// Share requested in the options (before clamping/normalization)
    pub requested: f64,
    /// Share actually applied after clamping, renormalization, and
    /// physical overrides
    pub effective: f64,
}

/// Effective horizontal (shear + moment) sharing between classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizontalSharing {
    pub pier_share: ShareRecord,
    pub spandrel_share: ShareRecord,
}

/// Effective vertical (axial) routing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalSharing {
    /// `vertical_load_to_piers_only` as configured
    pub to_piers_only_requested: bool,
    /// The routing actually applied (differs when no piers exist)
    pub to_piers_only_effective: bool,
    pub consider_spandrel_axial: bool,
    /// Whether any spandrel actually received a non-negligible axial load
    pub axial_effect_active: bool,
    /// Explanation when the configured vertical load path was overridden
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_note: Option<String>,
}

/// Demand routed to a single element (kN, kNm, kN). `axial` keeps the
/// wall-level compression-negative convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementDemand {
    pub axial: f64,
    pub moment: f64,
    pub shear: f64,
}

/// Full result of the load apportioning stage.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadDistribution {
    pub horizontal: HorizontalSharing,
    pub vertical: VerticalSharing,
    pub pier_demands: Vec<ElementDemand>,
    pub spandrel_demands: Vec<ElementDemand>,
}

/// Apportion the wall-level actions across the pier and spandrel
/// populations.
///
/// Share policy, in order:
/// 1. clamp each configured share into [0,1];
/// 2. renormalize by the sum, or fall back to 50/50 when both clamp to 0;
/// 3. override to 1/0 or 0/1 when one class has no elements;
/// 4. split the class demand across its elements weighted by
///    cross-sectional area, falling back to an equal split when the class
///    area is degenerate.
pub fn distribute(
    wall: &Wall,
    loads: &Loads,
    options: &AnalysisOptions,
    sink: &dyn DiagnosticSink,
) -> LoadDistribution {
    let n_piers = wall.piers.len();
    let n_spandrels = wall.spandrels.len();

    let (pier_norm, spandrel_norm) = normalized_shares(options, sink);

    // Physical override: a class with no elements cannot take load.
    let (pier_eff, spandrel_eff) = if n_spandrels == 0 {
        (1.0, 0.0)
    } else if n_piers == 0 {
        (0.0, 1.0)
    } else {
        (pier_norm, spandrel_norm)
    };
    if (pier_eff, spandrel_eff) != (pier_norm, spandrel_norm) {
        sink.emit(
            Severity::Warning,
            &format!(
                "Horizontal shares overridden to {:.2}/{:.2}: configured load path not achievable",
                pier_eff, spandrel_eff
            ),
        );
    }

    let vertical = route_vertical(wall, loads, options, pier_eff, spandrel_eff, sink);

    // Class-level horizontal demand.
    let pier_class_m = loads.moment * pier_eff;
    let pier_class_v = loads.shear * pier_eff;
    let spandrel_class_m = loads.moment * spandrel_eff;
    let spandrel_class_v = loads.shear * spandrel_eff;

    let pier_weights = area_weights(wall.piers.iter().map(|p| p.area()).collect());
    let spandrel_weights = area_weights(wall.spandrels.iter().map(|s| s.area()).collect());

    let pier_demands: Vec<ElementDemand> = pier_weights
        .iter()
        .map(|w| ElementDemand {
            axial: vertical.0 * w,
            moment: pier_class_m * w,
            shear: pier_class_v * w,
        })
        .collect();
    let spandrel_demands: Vec<ElementDemand> = spandrel_weights
        .iter()
        .map(|w| ElementDemand {
            axial: vertical.1 * w,
            moment: spandrel_class_m * w,
            shear: spandrel_class_v * w,
        })
        .collect();

    let axial_effect_active = options.consider_spandrel_axial
        && spandrel_demands
            .iter()
            .any(|d| d.axial.abs() > ZERO_TOLERANCE);
    if options.consider_spandrel_axial && !axial_effect_active {
        sink.emit(
            Severity::Info,
            "consider_spandrel_axial is set but spandrel axial loads are ~0: no capacity effect",
        );
    }

    sink.emit(
        Severity::Info,
        &format!(
            "Effective horizontal sharing - piers: {:.1}%, spandrels: {:.1}%",
            pier_eff * 100.0,
            spandrel_eff * 100.0
        ),
    );

    LoadDistribution {
        horizontal: HorizontalSharing {
            pier_share: ShareRecord {
                requested: options.pier_load_share,
                effective: pier_eff,
            },
            spandrel_share: ShareRecord {
                requested: options.spandrel_load_share,
                effective: spandrel_eff,
            },
        },
        vertical: VerticalSharing {
            to_piers_only_requested: options.vertical_load_to_piers_only,
            to_piers_only_effective: vertical.2,
            consider_spandrel_axial: options.consider_spandrel_axial,
            axial_effect_active,
            override_note: vertical.3,
        },
        pier_demands,
        spandrel_demands,
    }
}

/// Clamp both shares into [0,1] and renormalize so they sum to 1.
fn normalized_shares(options: &AnalysisOptions, sink: &dyn DiagnosticSink) -> (f64, f64) {
    let pier = options.pier_load_share.clamp(0.0, 1.0);
    let spandrel = options.spandrel_load_share.clamp(0.0, 1.0);
    if pier != options.pier_load_share || spandrel != options.spandrel_load_share {
        sink.emit(
            Severity::Warning,
            &format!(
                "Load shares clamped into [0,1]: {:.3}/{:.3}",
                pier, spandrel
            ),
        );
    }

    let total = pier + spandrel;
    if total <= 0.0 {
        sink.emit(
            Severity::Warning,
            "Both load shares are zero: falling back to a 50/50 split",
        );
        return (0.5, 0.5);
    }
    if (total - 1.0).abs() > 1e-3 {
        sink.emit(
            Severity::Warning,
            &format!("Load shares sum to {:.3}: renormalizing to 1.0", total),
        );
    }
    (pier / total, spandrel / total)
}

/// Route the vertical load between the classes. Returns
/// (pier class axial, spandrel class axial, to_piers_only_effective, note)
/// with axial values in the compression-negative convention.
fn route_vertical(
    wall: &Wall,
    loads: &Loads,
    options: &AnalysisOptions,
    pier_share: f64,
    spandrel_share: f64,
    sink: &dyn DiagnosticSink,
) -> (f64, f64, bool, Option<String>) {
    let n = loads.vertical;
    let has_piers = !wall.piers.is_empty();
    let has_spandrels = !wall.spandrels.is_empty();

    let mut note = None;
    let to_piers_only_effective = if options.vertical_load_to_piers_only && !has_piers {
        let msg =
            "vertical_load_to_piers_only ignored: no piers present, axial load rerouted".to_string();
        sink.emit(Severity::Warning, &msg);
        note = Some(msg);
        false
    } else {
        options.vertical_load_to_piers_only
    };

    if to_piers_only_effective {
        return (n, 0.0, true, note);
    }

    // Spandrels only ever receive axial demand when explicitly enabled.
    let spandrel_axial = if options.consider_spandrel_axial && has_spandrels {
        if has_piers {
            n * spandrel_share
        } else {
            n
        }
    } else {
        0.0
    };
    let pier_axial = if has_piers { n - spandrel_axial } else { 0.0 };

    if !has_piers && (n - spandrel_axial).abs() > ZERO_TOLERANCE {
        let msg = format!(
            "Axial load of {:.1} kN could not be assigned (no piers, spandrel axial disabled)",
            n - spandrel_axial
        );
        sink.emit(Severity::Warning, &msg);
        note = Some(msg);
    }

    (pier_axial, spandrel_axial, false, note)
}

/// Per-element weights proportional to cross-sectional area, with an equal
/// split when the class area is degenerate.
fn area_weights(areas: Vec<f64>) -> Vec<f64> {
    if areas.is_empty() {
        return areas;
    }
    let total: f64 = areas.iter().sum();
    if total > MIN_AREA {
        areas.iter().map(|a| a / total).collect()
    } else {
        let equal = 1.0 / areas.len() as f64;
        vec![equal; areas.len()]
    }
}
