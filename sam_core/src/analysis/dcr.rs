//! Governing demand-to-capacity ratios and the wall-level verdict.
//!
//! Element level: the governing mechanism is the one with the largest
//! finite ratio among its OK checks. Crushing or invalid checks take
//! absolute precedence over any numeric ratio, however small.
//!
//! Wall level: the global DCR is the largest finite governing ratio across
//! all elements, and the wall is verified only when that ratio is at most
//! 1 **and** no element is in a crushing or invalid state.

use serde::{Deserialize, Serialize};

use super::capacity::{CapacityResult, Classification, Dcr, FailureMode};

/// Element class, for labeling and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Pier,
    Spandrel,
}

impl ElementKind {
    /// Human-readable element label, 1-based ("pier_1", "spandrel_2").
    pub fn label(&self, index: usize) -> String {
        match self {
            ElementKind::Pier => format!("pier_{}", index + 1),
            ElementKind::Spandrel => format!("spandrel_{}", index + 1),
        }
    }
}

/// Qualitative safety state relative to the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyState {
    /// DCR at or below the safety threshold
    Safe,
    /// DCR above the threshold but at most 1
    NearLimit,
    /// DCR above 1, or a crushing/invalid state
    Failed,
}

impl SafetyState {
    fn from_dcr(dcr: Dcr, critical: bool, threshold: f64) -> Self {
        if critical {
            return SafetyState::Failed;
        }
        match dcr.value() {
            Some(v) if v <= threshold => SafetyState::Safe,
            Some(v) if v <= 1.0 => SafetyState::NearLimit,
            _ => SafetyState::Failed,
        }
    }
}

/// Verification outcome of a single element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementVerification {
    pub kind: ElementKind,
    /// 0-based position within the element's class
    pub index: usize,
    /// Element label ("pier_1", ...)
    pub name: String,
    /// All mechanism checks that were evaluated
    pub checks: Vec<CapacityResult>,
    /// Mode with the largest ratio, or the critical state
    pub governing_mode: FailureMode,
    /// Governing demand-to-capacity ratio
    pub dcr: Dcr,
    pub classification: Classification,
    pub safety_state: SafetyState,
}

/// Reduce an element's mechanism checks to its governing verdict.
///
/// Crushing wins over invalid, and both win over every finite ratio.
pub fn verify_element(
    kind: ElementKind,
    index: usize,
    checks: Vec<CapacityResult>,
    safety_threshold: f64,
) -> ElementVerification {
    let name = kind.label(index);

    let classification = if checks
        .iter()
        .any(|c| c.classification == Classification::Crushing)
    {
        Classification::Crushing
    } else if checks
        .iter()
        .any(|c| c.classification == Classification::Invalid)
    {
        Classification::Invalid
    } else {
        Classification::Ok
    };

    let (governing_mode, dcr) = match classification {
        Classification::Crushing => (FailureMode::Crushing, Dcr::Undefined),
        Classification::Invalid => (FailureMode::Invalid, Dcr::Undefined),
        Classification::Ok => governing_ratio(&checks),
    };

    let safety_state = SafetyState::from_dcr(dcr, classification.is_critical(), safety_threshold);

    ElementVerification {
        kind,
        index,
        name,
        checks,
        governing_mode,
        dcr,
        classification,
        safety_state,
    }
}

/// Largest finite ratio among OK checks and its mechanism.
fn governing_ratio(checks: &[CapacityResult]) -> (FailureMode, Dcr) {
    let mut governing: Option<(FailureMode, f64)> = None;
    for check in checks {
        if let Dcr::Finite(ratio) = check.ratio {
            let candidate = (FailureMode::from(check.mechanism), ratio);
            governing = match governing {
                Some((_, best)) if best >= ratio => governing,
                _ => Some(candidate),
            };
        }
    }
    match governing {
        Some((mode, ratio)) => (mode, Dcr::Finite(ratio)),
        // No check produced a finite ratio: nothing meaningful to report.
        None => (FailureMode::Invalid, Dcr::Undefined),
    }
}

/// Wall-level verdict derived from the element verdicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallVerdict {
    /// Largest finite governing ratio across elements; `"N/D"` when none
    /// is finite
    pub global_dcr: Dcr,
    /// Mode of the governing element, or the critical state
    pub failure_mode: FailureMode,
    /// Label of the governing (or first critical) element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_component: Option<String>,
    pub verified: bool,
    pub has_critical_failures: bool,
    /// Labels of every element in a crushing or invalid state
    pub critical_components: Vec<String>,
    pub safety_state: SafetyState,
}

/// Aggregate the element verdicts into the wall verdict.
///
/// Crushing/invalid elements fail the wall no matter what the numeric
/// ratios of the remaining elements say; crushing is reported ahead of
/// invalid when both occur.
pub fn aggregate(elements: &[ElementVerification], safety_threshold: f64) -> WallVerdict {
    let critical_components: Vec<String> = elements
        .iter()
        .filter(|e| e.classification.is_critical())
        .map(|e| e.name.clone())
        .collect();
    let has_critical_failures = !critical_components.is_empty();

    let mut global_dcr = Dcr::Undefined;
    let mut governing: Option<&ElementVerification> = None;
    for element in elements {
        if let Dcr::Finite(ratio) = element.dcr {
            let better = match global_dcr {
                Dcr::Finite(best) => ratio > best,
                Dcr::Undefined => true,
            };
            if better {
                global_dcr = Dcr::Finite(ratio);
                governing = Some(element);
            }
        }
    }

    let (failure_mode, critical_component) = if has_critical_failures {
        let crushing = elements
            .iter()
            .find(|e| e.classification == Classification::Crushing);
        match crushing {
            Some(element) => (FailureMode::Crushing, Some(element.name.clone())),
            None => {
                let invalid = elements
                    .iter()
                    .find(|e| e.classification == Classification::Invalid);
                (
                    FailureMode::Invalid,
                    invalid.map(|e| e.name.clone()),
                )
            }
        }
    } else {
        match governing {
            Some(element) => (element.governing_mode, Some(element.name.clone())),
            None => (FailureMode::Invalid, None),
        }
    };

    let verified = !has_critical_failures
        && matches!(global_dcr, Dcr::Finite(v) if v <= 1.0);

    let safety_state = SafetyState::from_dcr(global_dcr, has_critical_failures, safety_threshold);

    WallVerdict {
        global_dcr,
        failure_mode,
        critical_component,
        verified,
        has_critical_failures,
        critical_components,
        safety_state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::capacity::Mechanism;

    fn ok_check(mechanism: Mechanism, ratio: f64) -> CapacityResult {
        CapacityResult {
            mechanism,
            capacity: 10.0,
            demand: 10.0 * ratio,
            ratio: Dcr::Finite(ratio),
            classification: Classification::Ok,
            axial_effect_active: true,
        }
    }

    fn critical_check(mechanism: Mechanism, classification: Classification) -> CapacityResult {
        CapacityResult {
            mechanism,
            capacity: 0.0,
            demand: 5.0,
            ratio: Dcr::Undefined,
            classification,
            axial_effect_active: true,
        }
    }

    #[test]
    fn test_governing_mode_is_largest_ratio() {
        let element = verify_element(
            ElementKind::Pier,
            0,
            vec![
                ok_check(Mechanism::Flexure, 0.45),
                ok_check(Mechanism::SlidingShear, 0.76),
                ok_check(Mechanism::DiagonalShear, 0.38),
            ],
            0.8,
        );
        assert_eq!(element.governing_mode, FailureMode::SlidingShear);
        assert_eq!(element.dcr, Dcr::Finite(0.76));
        assert_eq!(element.safety_state, SafetyState::Safe);
        assert_eq!(element.name, "pier_1");
    }

    #[test]
    fn test_crushing_beats_tiny_ratios() {
        let element = verify_element(
            ElementKind::Pier,
            1,
            vec![
                critical_check(Mechanism::Flexure, Classification::Crushing),
                ok_check(Mechanism::SlidingShear, 0.01),
            ],
            0.8,
        );
        assert_eq!(element.governing_mode, FailureMode::Crushing);
        assert_eq!(element.dcr, Dcr::Undefined);
        assert_eq!(element.safety_state, SafetyState::Failed);
    }

    #[test]
    fn test_crushing_reported_ahead_of_invalid() {
        let element = verify_element(
            ElementKind::Spandrel,
            0,
            vec![
                critical_check(Mechanism::SlidingShear, Classification::Invalid),
                critical_check(Mechanism::Flexure, Classification::Crushing),
            ],
            0.8,
        );
        assert_eq!(element.governing_mode, FailureMode::Crushing);
        assert_eq!(element.classification, Classification::Crushing);
    }

    #[test]
    fn test_wall_verified_below_unity() {
        let elements = vec![
            verify_element(
                ElementKind::Pier,
                0,
                vec![ok_check(Mechanism::Flexure, 0.45)],
                0.8,
            ),
            verify_element(
                ElementKind::Spandrel,
                0,
                vec![ok_check(Mechanism::DiagonalShear, 0.31)],
                0.8,
            ),
        ];
        let verdict = aggregate(&elements, 0.8);
        assert!(verdict.verified);
        assert_eq!(verdict.global_dcr, Dcr::Finite(0.45));
        assert_eq!(verdict.failure_mode, FailureMode::Flexure);
        assert_eq!(verdict.critical_component.as_deref(), Some("pier_1"));
        assert_eq!(verdict.safety_state, SafetyState::Safe);
    }

    #[test]
    fn test_wall_fails_above_unity() {
        let elements = vec![verify_element(
            ElementKind::Pier,
            0,
            vec![ok_check(Mechanism::DiagonalShear, 1.2)],
            0.8,
        )];
        let verdict = aggregate(&elements, 0.8);
        assert!(!verdict.verified);
        assert_eq!(verdict.safety_state, SafetyState::Failed);
        assert_eq!(verdict.failure_mode, FailureMode::DiagonalShear);
    }

    #[test]
    fn test_near_limit_band() {
        let elements = vec![verify_element(
            ElementKind::Pier,
            0,
            vec![ok_check(Mechanism::Flexure, 0.9)],
            0.8,
        )];
        let verdict = aggregate(&elements, 0.8);
        assert!(verdict.verified);
        assert_eq!(verdict.safety_state, SafetyState::NearLimit);
    }

    #[test]
    fn test_critical_element_fails_wall_despite_low_global_dcr() {
        let elements = vec![
            verify_element(
                ElementKind::Pier,
                0,
                vec![critical_check(Mechanism::Flexure, Classification::Crushing)],
                0.8,
            ),
            verify_element(
                ElementKind::Pier,
                1,
                vec![ok_check(Mechanism::SlidingShear, 0.1)],
                0.8,
            ),
        ];
        let verdict = aggregate(&elements, 0.8);
        assert!(!verdict.verified);
        assert!(verdict.has_critical_failures);
        // Finite ratios still reported for transparency.
        assert_eq!(verdict.global_dcr, Dcr::Finite(0.1));
        assert_eq!(verdict.failure_mode, FailureMode::Crushing);
        assert_eq!(verdict.critical_components, vec!["pier_1".to_string()]);
        assert_eq!(verdict.critical_component.as_deref(), Some("pier_1"));
    }

    #[test]
    fn test_all_undefined_gives_nd_global() {
        let elements = vec![verify_element(
            ElementKind::Pier,
            0,
            vec![critical_check(Mechanism::Flexure, Classification::Invalid)],
            0.8,
        )];
        let verdict = aggregate(&elements, 0.8);
        assert_eq!(verdict.global_dcr, Dcr::Undefined);
        assert!(!verdict.verified);
        assert_eq!(verdict.failure_mode, FailureMode::Invalid);
    }
}
