//! Report rendering.
//!
//! Supports four output formats:
//! - HTML: styled per-file report
//! - PDF: paginated plain-text document
//! - JSON: the result itself (an array for combined reports)
//! - Text: plain-text report with a generation timestamp
//!
//! plus a colored terminal summary (see [`pretty`]).

pub mod html;
pub mod pdf;
pub mod pretty;
pub mod text;

use thiserror::Error;

use crate::types::{AnalysisResult, Issue};

/// File name of the combined JSON report.
pub const JSON_REPORT: &str = "analysis_report.json";
/// File name of the combined PDF report.
pub const PDF_REPORT: &str = "analysis_report.pdf";
/// File name of the combined text report.
pub const TEXT_REPORT: &str = "analysis_report.txt";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Report output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Html,
    Pdf,
    Json,
    Text,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Pdf => "pdf",
            Format::Json => "json",
            Format::Text => "text",
        }
    }

    /// File extension for reports in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Pdf => "pdf",
            Format::Json => "json",
            Format::Text => "txt",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Format::Html),
            "pdf" => Ok(Format::Pdf),
            "json" => Ok(Format::Json),
            "text" | "txt" => Ok(Format::Text),
            _ => Err(format!(
                "unknown format: {} (expected html, pdf, json or text)",
                s
            )),
        }
    }
}

/// Render a single result.
pub fn render(result: &AnalysisResult, format: Format) -> Result<Vec<u8>, ReportError> {
    match format {
        // A single JSON report is the object, not a one-element array
        Format::Json => Ok(serde_json::to_vec_pretty(result)?),
        _ => render_all(std::slice::from_ref(result), format),
    }
}

/// Render several results into one combined report.
pub fn render_all(results: &[AnalysisResult], format: Format) -> Result<Vec<u8>, ReportError> {
    Ok(match format {
        Format::Html => html::render_all(results).into_bytes(),
        Format::Pdf => pdf::render_lines(&text::report_lines(results, &text::timestamp())),
        Format::Json => serde_json::to_vec_pretty(results)?,
        Format::Text => text::render_all(results, &text::timestamp()).into_bytes(),
    })
}

/// Placeholder shown for absent optional values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Maintainability index with two decimals, or `N/A`.
pub fn maintainability_label(result: &AnalysisResult) -> String {
    result
        .maintainability_index
        .map(|mi| format!("{:.2}", mi))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn position(value: Option<u32>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One-line issue description: `[Kind] path:line:col -> message (code)`.
pub fn issue_line(issue: &Issue) -> String {
    let mut line = format!(
        "[{}] {}:{}:{} -> {}",
        issue.kind,
        issue.path,
        position(issue.line),
        position(issue.column),
        issue.message
    );
    if let Some(code) = &issue.code {
        line.push_str(&format!(" ({})", code));
    }
    line
}
