//! # SAM CLI
//!
//! Batch runner for masonry wall verification. Reads one JSON case or an
//! array of cases from a file (or stdin), verifies each wall, and prints
//! the reports as pretty JSON on stdout.
//!
//! A case is an object `{ "wall": ..., "material": ... | "typology": "...",
//! "loads": ..., "options": ... }`. Failures are isolated per case: a bad
//! case yields an `{"error": ...}` entry without aborting the batch.
//!
//! Exit code is 0 only when every case parsed, analyzed, and verified.
//!
//! ```text
//! sam_cli walls.json
//! sam_cli --verbose walls.json
//! cat walls.json | sam_cli
//! sam_cli --typologies
//! ```

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use serde::Deserialize;
use serde_json::{json, Value};

use sam_core::analysis::{analyze_with_sink, AnalysisOptions, WallVerificationResult};
use sam_core::diagnostics::{DiagnosticSink, NullSink, Severity};
use sam_core::errors::{SamError, SamResult};
use sam_core::loads::Loads;
use sam_core::materials::MaterialProperties;
use sam_core::wall::Wall;

/// One verification case as supplied by the caller.
#[derive(Debug, Deserialize)]
struct WallCase {
    wall: Wall,
    /// Explicit material parameters; wins over `typology` when both given
    #[serde(default)]
    material: Option<MaterialProperties>,
    /// Name of a typology preset, used when `material` is omitted
    #[serde(default)]
    typology: Option<String>,
    loads: Loads,
    #[serde(default)]
    options: AnalysisOptions,
}

impl WallCase {
    fn material(&self) -> SamResult<MaterialProperties> {
        match (&self.material, &self.typology) {
            (Some(material), _) => Ok(material.clone()),
            (None, Some(name)) => MaterialProperties::from_typology(name),
            (None, None) => Err(SamError::invalid_input(
                "material",
                "null",
                "Provide either a material object or a typology name",
            )),
        }
    }

    fn run(&self, sink: &dyn DiagnosticSink) -> SamResult<WallVerificationResult> {
        let material = self.material()?;
        analyze_with_sink(&self.wall, &material, &self.loads, &self.options, sink)
    }
}

/// Diagnostic sink that prints to stderr, for `--verbose` runs.
struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn emit(&self, severity: Severity, message: &str) {
        let tag = match severity {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warn",
        };
        eprintln!("[{}] {}", tag, message);
    }
}

fn usage() -> ! {
    eprintln!("Usage: sam_cli [--verbose] [FILE]");
    eprintln!("       sam_cli --typologies");
    eprintln!();
    eprintln!("Reads a JSON case or array of cases from FILE (or stdin) and");
    eprintln!("prints the verification reports on stdout. Exit code 0 only");
    eprintln!("when every wall verified.");
    std::process::exit(2)
}

fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some("-") | None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        Some(path) => fs::read_to_string(path),
    }
}

fn error_value(error: SamError) -> Value {
    json!({ "error": error.to_string(), "details": error })
}

/// Run one case, folding any failure into an `{"error": ...}` value.
fn run_case(raw: Value, sink: &dyn DiagnosticSink) -> (Value, bool) {
    let case: WallCase = match serde_json::from_value(raw) {
        Ok(case) => case,
        Err(e) => return (error_value(SamError::from(e)), false),
    };
    match case.run(sink) {
        Ok(report) => {
            let verified = report.verified;
            match serde_json::to_value(&report) {
                Ok(value) => (value, verified),
                Err(e) => (error_value(SamError::from(e)), false),
            }
        }
        Err(error) => (error_value(error), false),
    }
}

fn main() -> ExitCode {
    let mut verbose = false;
    let mut list_typologies = false;
    let mut path: Option<String> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--verbose" | "-v" => verbose = true,
            "--typologies" => list_typologies = true,
            "--help" | "-h" => usage(),
            other if other.starts_with('-') && other != "-" => usage(),
            other => {
                if path.is_some() {
                    usage();
                }
                path = Some(other.to_string());
            }
        }
    }

    if list_typologies {
        for name in MaterialProperties::typology_names() {
            println!("{}", name);
        }
        return ExitCode::SUCCESS;
    }

    let input = match read_input(path.as_deref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error reading input: {}", e);
            return ExitCode::from(2);
        }
    };

    let parsed: Value = match serde_json::from_str(&input) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error parsing JSON: {}", e);
            return ExitCode::from(2);
        }
    };

    let stderr_sink = StderrSink;
    let sink: &dyn DiagnosticSink = if verbose { &stderr_sink } else { &NullSink };

    let (output, all_verified) = match parsed {
        Value::Array(cases) => {
            let mut results = Vec::with_capacity(cases.len());
            let mut all = true;
            for case in cases {
                let (value, verified) = run_case(case, sink);
                all &= verified;
                results.push(value);
            }
            (Value::Array(results), all)
        }
        single => run_case(single, sink),
    };

    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            return ExitCode::from(2);
        }
    }

    if all_verified {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passing_case() -> Value {
        json!({
            "wall": {
                "piers": [{ "length": 1.0, "height": 2.8, "thickness": 1.0 }],
                "spandrels": [{ "length": 1.5, "height": 0.5, "thickness": 1.0 }]
            },
            "material": { "fk": 1.4, "fvk0": 0.035, "fvk": 0.074 },
            "loads": { "vertical": -100.0, "moment": 25.0, "shear": 15.0 },
            "options": { "gamma_m": 2.0, "FC": 1.35 }
        })
    }

    #[test]
    fn test_case_with_explicit_material() {
        let (value, verified) = run_case(passing_case(), &NullSink);
        assert!(verified);
        assert_eq!(value["method"], "SAM");
        assert_eq!(value["verified"], true);
    }

    #[test]
    fn test_case_with_typology() {
        let mut case = passing_case();
        case.as_object_mut().unwrap().remove("material");
        case["typology"] = json!("solid_brick_lime_mortar");
        let (value, _) = run_case(case, &NullSink);
        assert_eq!(value["method"], "SAM");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_case_without_material_errors() {
        let mut case = passing_case();
        case.as_object_mut().unwrap().remove("material");
        let (value, verified) = run_case(case, &NullSink);
        assert!(!verified);
        assert!(value.get("error").is_some());
    }

    #[test]
    fn test_unknown_typology_is_isolated() {
        let mut case = passing_case();
        case.as_object_mut().unwrap().remove("material");
        case["typology"] = json!("adobe");
        let (value, verified) = run_case(case, &NullSink);
        assert!(!verified);
        assert_eq!(value["details"]["type"], "TypologyNotFound");
        assert!(value["error"].as_str().unwrap().contains("adobe"));
    }

    #[test]
    fn test_malformed_case_is_isolated() {
        let (value, verified) = run_case(json!({ "loads": {} }), &NullSink);
        assert!(!verified);
        assert!(value.get("error").is_some());
    }
}
