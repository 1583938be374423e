//! Tool adapters.
//!
//! Each adapter wraps one external analyzer and provides:
//! - A scoped temporary workspace holding the submitted code
//! - Invocation with a fixed argument template and a bounded timeout
//! - Raw diagnostics in the tool's native shape (see [`RawDiagnostics`])
//!
//! Adapter failures never propagate: a missing tool becomes a single
//! `ToolMissing` issue, a timeout or spawn failure a single `Error` issue.

mod cpp;
mod java;
mod javascript;
pub mod process;
mod python;

pub use process::{is_available, run_tool, ToolError, ToolOutput, Workspace};

use std::path::Path;

use crate::config::{ToolConfig, ToolsConfig};
use crate::language::Language;
use crate::types::{ComplexityEntry, Issue, IssueKind};

/// Diagnostics as produced by a tool, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDiagnostics {
    /// `pylint --output-format=json` stdout
    Pylint(String),
    /// `eslint -f json` stdout
    Eslint(String),
    /// Unstructured compiler/checker text (g++, gcc, javac, cppcheck)
    CompilerText(String),
    /// Issues synthesized by the adapter itself
    Issues(Vec<Issue>),
}

/// Everything an adapter learned about one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdapterOutput {
    pub raw: Vec<RawDiagnostics>,
    pub complexity: Vec<ComplexityEntry>,
    pub maintainability: Option<f64>,
}

impl AdapterOutput {
    /// Output consisting of a single synthesized issue.
    pub fn single(issue: Issue) -> Self {
        Self {
            raw: vec![RawDiagnostics::Issues(vec![issue])],
            ..Default::default()
        }
    }
}

/// Which compiler front-end the C-family adapter drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CppDialect {
    C,
    Cpp,
}

/// The fixed set of adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adapter {
    Python,
    JavaScript,
    Java,
    Cpp(CppDialect),
}

impl Adapter {
    /// Select the adapter for a detected language.
    ///
    /// Unclassified code goes down the Python path.
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Python | Language::Unknown => Adapter::Python,
            Language::JavaScript => Adapter::JavaScript,
            Language::Java => Adapter::Java,
            Language::C => Adapter::Cpp(CppDialect::C),
            Language::Cpp => Adapter::Cpp(CppDialect::Cpp),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Adapter::Python => "python",
            Adapter::JavaScript => "javascript",
            Adapter::Java => "java",
            Adapter::Cpp(CppDialect::C) => "c",
            Adapter::Cpp(CppDialect::Cpp) => "cpp",
        }
    }

    /// The tool this adapter cannot work without.
    pub fn primary_tool<'a>(&self, tools: &'a ToolsConfig) -> &'a ToolConfig {
        match self {
            Adapter::Python => &tools.pylint,
            Adapter::JavaScript => &tools.eslint,
            Adapter::Java => &tools.javac,
            Adapter::Cpp(CppDialect::C) => &tools.gcc,
            Adapter::Cpp(CppDialect::Cpp) => &tools.gxx,
        }
    }

    /// Run the adapter against `code`, reporting issues under `path`.
    pub async fn analyze(&self, code: &str, path: &str, tools: &ToolsConfig) -> AdapterOutput {
        match self {
            Adapter::Python => python::analyze(code, path, tools).await,
            Adapter::JavaScript => javascript::analyze(code, path, tools).await,
            Adapter::Java => java::analyze(code, path, tools).await,
            Adapter::Cpp(dialect) => cpp::analyze(*dialect, code, path, tools).await,
        }
    }
}

/// Convert a failed invocation into the single issue that replaces its output.
pub(crate) fn tool_failure(err: &ToolError, path: &str, install_hint: &str) -> Issue {
    match err {
        ToolError::NotFound(program) => Issue::unlocated(
            IssueKind::ToolMissing,
            format!("{} not found on PATH. {}", program, install_hint),
            path,
        ),
        ToolError::Timeout { .. } | ToolError::Io { .. } => {
            Issue::unlocated(IssueKind::Error, err.to_string(), path)
        }
    }
}

/// Issue for a workspace that could not be created.
pub(crate) fn workspace_failure(err: &std::io::Error, path: &str) -> Issue {
    Issue::unlocated(
        IssueKind::Error,
        format!("failed to prepare temporary file: {}", err),
        path,
    )
}

/// File name used inside the workspace.
///
/// Keeps the submitted base name when its extension is one of `extensions`,
/// so tool configs keyed on file names still apply; otherwise
/// `<default_stem>.<extensions[0]>`.
pub(crate) fn workspace_file_name(path: &str, default_stem: &str, extensions: &[&str]) -> String {
    let candidate = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|name| {
            Path::new(name)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
                .unwrap_or(false)
        })
        .filter(|name| {
            name.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        });
    match candidate {
        Some(name) => name.to_string(),
        None => format!("{}.{}", default_stem, extensions[0]),
    }
}

/// Replace the workspace path in tool output with the submitted path.
pub(crate) fn scrub_paths(text: &str, ws: &Workspace, path: &str) -> String {
    match ws.file().to_str() {
        Some(tmp) => text.replace(tmp, path),
        None => text.to_string(),
    }
}
