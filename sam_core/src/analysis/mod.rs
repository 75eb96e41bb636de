//! # Wall Verification Pipeline
//!
//! Stateless orchestration of one verification run: validate the inputs,
//! derive the design strengths, apportion the wall loads across the
//! elements, evaluate every mechanism capacity, reduce to per-element and
//! wall-level verdicts, and assemble the report.
//!
//! [`analyze`] is a pure function of its inputs: identical inputs produce
//! an identical report, element order follows input order, and nothing is
//! cached or mutated between calls.
//!
//! ## Example
//!
//! ```rust
//! use sam_core::analysis::{analyze, AnalysisOptions};
//! use sam_core::loads::Loads;
//! use sam_core::materials::MaterialProperties;
//! use sam_core::wall::{PierGeometry, Wall};
//!
//! let wall = Wall::new(vec![PierGeometry::new(1.2, 2.8, 0.3)], vec![]);
//! let material = MaterialProperties::from_typology("solid_brick_lime_mortar").unwrap();
//! let loads = Loads::new(-150.0, 20.0, 15.0);
//!
//! let report = analyze(&wall, &material, &loads, &AnalysisOptions::default()).unwrap();
//! assert_eq!(report.method, "SAM");
//! ```

pub mod capacity;
pub mod config;
pub mod dcr;
pub mod report;

use crate::diagnostics::{DiagnosticSink, NullSink, Severity};
use crate::errors::SamResult;
use crate::loads::{distribute, Loads};
use crate::materials::MaterialProperties;
use crate::wall::Wall;

pub use capacity::{CapacityResult, Classification, Dcr, FailureMode, Mechanism};
pub use config::{AnalysisOptions, SlendernessType};
pub use dcr::{ElementKind, ElementVerification, SafetyState, WallVerdict};
pub use report::{LoadSharingSummary, UnitsBlock, VerificationSummary, WallVerificationResult};

/// Verify a wall. Pure and deterministic; diagnostics are discarded.
pub fn analyze(
    wall: &Wall,
    material: &MaterialProperties,
    loads: &Loads,
    options: &AnalysisOptions,
) -> SamResult<WallVerificationResult> {
    analyze_with_sink(wall, material, loads, options, &NullSink)
}

/// Verify a wall, emitting diagnostics to the given sink.
///
/// The sink receives progress and warning messages only; the returned
/// report is identical whatever sink is supplied.
pub fn analyze_with_sink(
    wall: &Wall,
    material: &MaterialProperties,
    loads: &Loads,
    options: &AnalysisOptions,
    sink: &dyn DiagnosticSink,
) -> SamResult<WallVerificationResult> {
    options.validate()?;
    material.validate()?;
    wall.validate()?;
    loads.validate()?;

    let design = material.design_values(options.gamma_m, options.fc);
    sink.emit(
        Severity::Info,
        &format!(
            "Design strengths: fcd={:.3} MPa, fvd0={:.3} MPa, fvd={:.3} MPa",
            design.fcd, design.fvd0, design.fvd
        ),
    );

    let distribution = distribute(wall, loads, options, sink);

    let piers: Vec<ElementVerification> = wall
        .piers
        .iter()
        .zip(&distribution.pier_demands)
        .enumerate()
        .map(|(i, (pier, demand))| {
            let checks = capacity::evaluate_pier(i, pier, demand, material, &design, options, sink);
            let element = dcr::verify_element(ElementKind::Pier, i, checks, options.safety_threshold);
            sink.emit(
                Severity::Debug,
                &format!("{}: DCR {} ({:?})", element.name, element.dcr, element.governing_mode),
            );
            element
        })
        .collect();
    let spandrels: Vec<ElementVerification> = wall
        .spandrels
        .iter()
        .zip(&distribution.spandrel_demands)
        .enumerate()
        .map(|(i, (spandrel, demand))| {
            let checks =
                capacity::evaluate_spandrel(i, spandrel, demand, material, &design, options, sink);
            let element =
                dcr::verify_element(ElementKind::Spandrel, i, checks, options.safety_threshold);
            sink.emit(
                Severity::Debug,
                &format!("{}: DCR {} ({:?})", element.name, element.dcr, element.governing_mode),
            );
            element
        })
        .collect();

    let all: Vec<ElementVerification> = piers.iter().chain(spandrels.iter()).cloned().collect();
    let verdict = dcr::aggregate(&all, options.safety_threshold);

    sink.emit(
        Severity::Info,
        &format!(
            "Verdict: verified={}, global DCR={}, mode={:?}",
            verdict.verified, verdict.global_dcr, verdict.failure_mode
        ),
    );

    Ok(report::build_report(
        piers,
        spandrels,
        verdict,
        LoadSharingSummary {
            horizontal: distribution.horizontal,
            vertical: distribution.vertical,
        },
        design,
        options,
    ))
}
