//! Reporting classes that could not be resolved.
//!
//! The engine only records names. This module turns that record into
//! diagnostics a caller can print or forward.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use super::engine::SymbolEngine;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// How serious a diagnostic is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// A diagnostic about a class.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Flat name of the class the diagnostic is about.
    pub class_name: SmolStr,
    pub severity: Severity,
    /// Error/warning code (e.g., "W0101").
    pub code: Option<Arc<str>>,
    pub message: Arc<str>,
}

impl Diagnostic {
    pub fn error(class_name: impl Into<SmolStr>, message: impl Into<Arc<str>>) -> Self {
        Self {
            class_name: class_name.into(),
            severity: Severity::Error,
            code: None,
            message: message.into(),
        }
    }

    pub fn warning(class_name: impl Into<SmolStr>, message: impl Into<Arc<str>>) -> Self {
        Self {
            class_name: class_name.into(),
            severity: Severity::Warning,
            code: None,
            message: message.into(),
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: impl Into<Arc<str>>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// `warning[W0101]: a.B: class not found on classpath: 'a.B'`
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.severity.as_str())?;
        if let Some(code) = &self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}: {}", self.class_name, self.message)
    }
}

// ============================================================================
// DIAGNOSTIC CODES
// ============================================================================

/// Diagnostic codes.
pub mod codes {
    /// A referenced class has no class file on the classpath.
    pub const CLASS_NOT_FOUND: &str = "W0101";
    /// A class file could not be read or decoded.
    pub const UNREADABLE_CLASS: &str = "E0101";
}

// ============================================================================
// DIAGNOSTIC COLLECTOR
// ============================================================================

/// Collects diagnostics during an analysis run.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Add a class-not-found warning.
    pub fn class_not_found(&mut self, class_name: &str) {
        self.add(
            Diagnostic::warning(class_name, format!("class not found on classpath: '{class_name}'"))
                .with_code(codes::CLASS_NOT_FOUND),
        );
    }

    /// Add an error for a class file that could not be used.
    pub fn unreadable_class(&mut self, error: &crate::error::EngineError) {
        self.add(
            Diagnostic::error(error.class_name(), error.to_string()).with_code(codes::UNREADABLE_CLASS),
        );
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warning).count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Take all diagnostics, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }
}

/// One warning per class the engine could not find, in name order.
pub fn missing_classes(engine: &SymbolEngine) -> Vec<Diagnostic> {
    let mut collector = DiagnosticCollector::new();
    for name in engine.diagnostics() {
        collector.class_not_found(name);
    }
    collector.take()
}
