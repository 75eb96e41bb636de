//! Verification report assembly.
//!
//! The report is a self-contained JSON-serializable record of one
//! verification run: the verdict, per-element breakdowns, aggregate
//! capacities, the effective load-sharing policy, the design strengths
//! actually used, a units block, and an echo of the configuration. A
//! reader should be able to audit the run from the report alone.

use serde::{Deserialize, Serialize};

use crate::loads::{HorizontalSharing, VerticalSharing};
use crate::materials::DesignValues;

use super::capacity::{Dcr, FailureMode, Mechanism};
use super::config::AnalysisOptions;
use super::dcr::{ElementVerification, SafetyState, WallVerdict};

/// Units the engine works in. Fixed; recorded so downstream consumers
/// never have to guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitsBlock {
    pub length: String,
    pub force: String,
    pub moment: String,
    pub stress: String,
}

impl Default for UnitsBlock {
    fn default() -> Self {
        UnitsBlock {
            length: "m".to_string(),
            force: "kN".to_string(),
            moment: "kNm".to_string(),
            stress: "MPa".to_string(),
        }
    }
}

/// Effective load-sharing policy applied during the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSharingSummary {
    pub horizontal: HorizontalSharing,
    pub vertical: VerticalSharing,
}

/// Condensed verdict for report consumers that skip the element detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub load_sharing: LoadSharingSummary,
    /// Governing element label (largest ratio, or the critical one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_component: Option<String>,
    pub has_critical_failures: bool,
    /// Every element in a crushing or invalid state
    pub critical_components: Vec<String>,
}

/// Complete result of one wall verification.
///
/// ## JSON Example (abridged)
///
/// ```json
/// {
///   "method": "SAM",
///   "verified": true,
///   "global_dcr": 0.756,
///   "failure_mode": "sliding_shear",
///   "safety_state": "near_limit",
///   "n_piers": 2,
///   "n_spandrels": 1,
///   "capacity_flexure": 112.4,
///   "capacity_shear": 48.2,
///   "units": { "length": "m", "force": "kN", "moment": "kNm", "stress": "MPa" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallVerificationResult {
    /// Verification method identifier, always `"SAM"`
    pub method: String,
    pub verified: bool,
    pub global_dcr: Dcr,
    pub failure_mode: FailureMode,
    pub safety_state: SafetyState,
    pub n_piers: usize,
    pub n_spandrels: usize,
    /// Sum of element flexural capacities (kNm)
    pub capacity_flexure: f64,
    /// Sum of element governing shear capacities (kN)
    pub capacity_shear: f64,
    /// Design strengths used by the capacity formulas (MPa)
    pub design_values: DesignValues,
    pub piers: Vec<ElementVerification>,
    pub spandrels: Vec<ElementVerification>,
    pub summary: VerificationSummary,
    pub units: UnitsBlock,
    /// Echo of the options the run was evaluated with
    pub config: AnalysisOptions,
}

impl WallVerificationResult {
    /// Governing DCR formatted for display (`"0.756"`, `">999"`, `"N/D"`).
    pub fn format_global_dcr(&self) -> String {
        self.global_dcr.to_string()
    }
}

/// Flexural capacity of one element (kNm); zero when the flexure check
/// degenerated.
fn flexural_capacity(element: &ElementVerification) -> f64 {
    element
        .checks
        .iter()
        .find(|c| c.mechanism == Mechanism::Flexure)
        .map(|c| c.capacity)
        .unwrap_or(0.0)
}

/// Governing (smallest) shear capacity of one element (kN).
fn governing_shear_capacity(element: &ElementVerification) -> f64 {
    element
        .checks
        .iter()
        .filter(|c| c.mechanism != Mechanism::Flexure)
        .map(|c| c.capacity)
        .fold(f64::NAN, f64::min)
}

pub(crate) fn build_report(
    piers: Vec<ElementVerification>,
    spandrels: Vec<ElementVerification>,
    verdict: WallVerdict,
    load_sharing: LoadSharingSummary,
    design_values: DesignValues,
    options: &AnalysisOptions,
) -> WallVerificationResult {
    let capacity_flexure = piers
        .iter()
        .chain(spandrels.iter())
        .map(flexural_capacity)
        .sum();
    let capacity_shear = piers
        .iter()
        .chain(spandrels.iter())
        .map(governing_shear_capacity)
        .filter(|c| c.is_finite())
        .sum();

    WallVerificationResult {
        method: "SAM".to_string(),
        verified: verdict.verified,
        global_dcr: verdict.global_dcr,
        failure_mode: verdict.failure_mode,
        safety_state: verdict.safety_state,
        n_piers: piers.len(),
        n_spandrels: spandrels.len(),
        capacity_flexure,
        capacity_shear,
        design_values,
        piers,
        spandrels,
        summary: VerificationSummary {
            load_sharing,
            critical_component: verdict.critical_component,
            has_critical_failures: verdict.has_critical_failures,
            critical_components: verdict.critical_components,
        },
        units: UnitsBlock::default(),
        config: options.clone(),
    }
}
