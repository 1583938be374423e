//! In-process source analysis.
//!
//! Python sources get a syntax check, per-function cyclomatic complexity and
//! a maintainability index without spawning anything. The heavy lifting is
//! done by tree-sitter; with the `tree-sitter` feature disabled the checks are
//! skipped and every source is reported as parsed with no metrics.

#[cfg(feature = "tree-sitter")]
pub mod python;

use crate::types::ComplexityEntry;

/// Location and description of the first syntax error in a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxFault {
    pub message: String,
    /// 1-based
    pub line: u32,
    /// 1-based
    pub column: u32,
}

/// Metrics for a source that parsed cleanly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PythonMetrics {
    pub complexity: Vec<ComplexityEntry>,
    pub maintainability: Option<f64>,
}

/// Outcome of the in-process Python pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PythonCheck {
    SyntaxError(SyntaxFault),
    Parsed(PythonMetrics),
}

/// Parse `source` and either report its first syntax error or its metrics.
#[cfg(feature = "tree-sitter")]
pub fn check_python(source: &str) -> anyhow::Result<PythonCheck> {
    let parsed = python::PythonSource::parse(source)?;
    if let Some(fault) = parsed.syntax_fault() {
        return Ok(PythonCheck::SyntaxError(fault));
    }
    Ok(PythonCheck::Parsed(PythonMetrics {
        complexity: parsed.complexity()?,
        maintainability: Some(parsed.maintainability_index()),
    }))
}

/// Without tree-sitter there is nothing to check in-process.
#[cfg(not(feature = "tree-sitter"))]
pub fn check_python(_source: &str) -> anyhow::Result<PythonCheck> {
    Ok(PythonCheck::Parsed(PythonMetrics::default()))
}
