//! # Diagnostics Side-Channel
//!
//! The engine reports traceability events (clamped load shares, near-zero
//! axial activation, crushing proximity) through an injected [`DiagnosticSink`]
//! rather than a process-global logger. This keeps the core testable in
//! isolation and safe to call from parallel workers: sinks only observe,
//! they never influence computed values or control flow.
//!
//! [`NullSink`] discards everything (the default for [`crate::analyze`]);
//! [`LogSink`] forwards to the `log` facade for applications that already
//! carry a logger.

/// Severity of a diagnostic event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
}

/// Observer for engine trace events.
///
/// Implementations must not panic; the engine treats the sink as
/// fire-and-forget. `Send + Sync` so a single sink can serve walls analyzed
/// from multiple worker threads.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, severity: Severity, message: &str);
}

/// Sink that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _severity: Severity, _message: &str) {}
}

/// Sink that forwards events to the `log` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => log::debug!("{}", message),
            Severity::Info => log::info!("{}", message),
            Severity::Warning => log::warn!("{}", message),
        }
    }
}
