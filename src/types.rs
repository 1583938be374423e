//! Core types shared by every stage of the pipeline.
//!
//! The serialized field names follow the JSON report format consumed by the
//! desktop client and written to `analysis_report.json`.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Placeholder file name for code submitted without a filename.
pub const SUBMITTED: &str = "<submitted>";

/// One unit of work: a piece of code and the name it was submitted under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl AnalysisRequest {
    pub fn new(code: impl Into<String>, filename: Option<String>) -> Self {
        Self {
            code: code.into(),
            filename,
        }
    }

    /// The name used in reports and issue paths.
    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or(SUBMITTED)
    }
}

/// Normalized issue categories.
///
/// Deserialization accepts any label: tool severity words are mapped the way
/// the normalizer maps them and anything unrecognized becomes `Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IssueKind {
    SyntaxError,
    Style,
    Warning,
    Error,
    ToolMissing,
    Info,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::SyntaxError => "SyntaxError",
            IssueKind::Style => "Style",
            IssueKind::Warning => "Warning",
            IssueKind::Error => "Error",
            IssueKind::ToolMissing => "ToolMissing",
            IssueKind::Info => "Info",
        }
    }

    /// Kind for a type label written by any producer, case-insensitive.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "syntaxerror" | "syntax-error" | "syntax error" => IssueKind::SyntaxError,
            "style" | "convention" | "refactor" | "performance" | "portability" => {
                IssueKind::Style
            }
            "warning" => IssueKind::Warning,
            "error" | "fatal" | "fatal error" => IssueKind::Error,
            "toolmissing" | "tool-missing" => IssueKind::ToolMissing,
            _ => IssueKind::Info,
        }
    }
}

impl<'de> Deserialize<'de> for IssueKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.map_or(IssueKind::Info, |l| IssueKind::from_label(&l)))
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic finding.
///
/// `line` and `column` are 1-based. `None` means the tool could not localize
/// the finding; it serializes as `null`, never as `0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "type", default = "unknown_kind")]
    pub kind: IssueKind,
    #[serde(default)]
    pub message: String,
    /// Empty when the producer omitted it; filled from the result's file
    /// during normalization.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub column: Option<u32>,
    /// Tool rule identifier (pylint message-id, eslint ruleId).
    #[serde(rename = "message-id", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

fn unknown_kind() -> IssueKind {
    IssueKind::Info
}

impl Issue {
    /// An issue without a source location.
    pub fn unlocated(kind: IssueKind, message: impl Into<String>, path: &str) -> Self {
        Self {
            kind,
            message: message.into(),
            path: path.to_string(),
            line: None,
            column: None,
            code: None,
        }
    }

    pub fn at(mut self, line: Option<u32>, column: Option<u32>) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code.filter(|c| !c.is_empty());
        self
    }
}

/// Cyclomatic complexity of one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityEntry {
    #[serde(rename = "name")]
    pub function_name: String,
    #[serde(rename = "lineno")]
    pub line_number: u32,
    #[serde(rename = "complexity")]
    pub cyclomatic_complexity: u32,
    /// Recomputed from the complexity when a result is normalized.
    #[serde(default)]
    pub rank: char,
}

impl ComplexityEntry {
    pub fn new(function_name: impl Into<String>, line_number: u32, complexity: u32) -> Self {
        let complexity = complexity.max(1);
        Self {
            function_name: function_name.into(),
            line_number,
            cyclomatic_complexity: complexity,
            rank: rank(complexity),
        }
    }
}

/// Letter grade for a cyclomatic complexity value.
///
/// A: 1-5, B: 6-10, C: 11-20, D: 21-30, E: 31-40, F: 41+
pub fn rank(complexity: u32) -> char {
    match complexity {
        0..=5 => 'A',
        6..=10 => 'B',
        11..=20 => 'C',
        21..=30 => 'D',
        31..=40 => 'E',
        _ => 'F',
    }
}

/// The normalized result of analyzing one request.
///
/// Older backends send `maintainability_index` instead of `maintainability`;
/// some send both. The client folds the two keys together before
/// deserializing, see [`crate::client::parse_response`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub file: String,
    /// Recomputed from the issues during normalization, so a `null` is fine.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub score: f64,
    #[serde(rename = "maintainability", default)]
    pub maintainability_index: Option<f64>,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub complexity: Vec<ComplexityEntry>,
    #[serde(default)]
    pub suggestions: BTreeSet<String>,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl AnalysisResult {
    /// An empty result for `file`, before any stage has run.
    pub fn new(language: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            file: file.into(),
            score: 100.0,
            maintainability_index: None,
            issues: Vec::new(),
            complexity: Vec::new(),
            suggestions: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_boundaries() {
        assert_eq!(rank(1), 'A');
        assert_eq!(rank(5), 'A');
        assert_eq!(rank(6), 'B');
        assert_eq!(rank(10), 'B');
        assert_eq!(rank(11), 'C');
        assert_eq!(rank(21), 'D');
        assert_eq!(rank(31), 'E');
        assert_eq!(rank(41), 'F');
    }

    #[test]
    fn test_missing_location_serializes_as_null() {
        let issue = Issue::unlocated(IssueKind::ToolMissing, "g++ not found", "a.cpp");
        let json = serde_json::to_value(&issue).unwrap();
        assert!(json["line"].is_null());
        assert!(json["column"].is_null());
        assert_eq!(json["type"], "ToolMissing");
        assert!(json.get("message-id").is_none());

        let located = issue.clone().at(Some(1), Some(0));
        let json = serde_json::to_value(&located).unwrap();
        assert_eq!(json["line"], 1);
        assert_eq!(json["column"], 0);
    }

    #[test]
    fn test_result_tolerates_null_score() {
        let json = r#"{"language":"python","file":"a.py","score":null,"maintainability":72.5}"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.score, 0.0);
        assert_eq!(result.maintainability_index, Some(72.5));
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_issue_kind_labels() {
        assert_eq!(IssueKind::from_label("SyntaxError"), IssueKind::SyntaxError);
        assert_eq!(IssueKind::from_label("toolmissing"), IssueKind::ToolMissing);
        assert_eq!(IssueKind::from_label("convention"), IssueKind::Style);
        assert_eq!(IssueKind::from_label("error"), IssueKind::Error);
        assert_eq!(IssueKind::from_label("fatal error"), IssueKind::Error);
        assert_eq!(IssueKind::from_label("Compiler"), IssueKind::Info);

        let issue: Issue = serde_json::from_str(r#"{"type":"WARNING","message":"m"}"#).unwrap();
        assert_eq!(issue.kind, IssueKind::Warning);
        assert_eq!(issue.path, "");
        assert_eq!(issue.line, None);

        let issue: Issue = serde_json::from_str(r#"{"type":null,"message":"m"}"#).unwrap();
        assert_eq!(issue.kind, IssueKind::Info);
    }

    #[test]
    fn test_complexity_entry_floor() {
        let entry = ComplexityEntry::new("f", 1, 0);
        assert_eq!(entry.cyclomatic_complexity, 1);
        assert_eq!(entry.rank, 'A');
    }
}
