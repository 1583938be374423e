//! Normalization of tool output into the common issue schema.
//!
//! Every tool speaks its own dialect: pylint and eslint emit JSON with their
//! own field names and severity vocabularies, compilers emit free text. This
//! module maps all of them onto [`Issue`]. Two rules hold everywhere:
//! - positions are 1-based, and an unknown position is `None`, never `0`
//! - nothing a tool reports is dropped; text that cannot be parsed is kept
//!   as an `Info` issue

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::adapters::RawDiagnostics;
use crate::score;
use crate::types::{AnalysisResult, ComplexityEntry, Issue, IssueKind};

/// Normalize one raw output, attributing every issue to `path`.
pub fn normalize(raw: RawDiagnostics, path: &str) -> Vec<Issue> {
    let issues = match raw {
        RawDiagnostics::Pylint(json) => {
            parse_pylint(&json, path).unwrap_or_else(|| fallback_text("pylint", &json, path))
        }
        RawDiagnostics::Eslint(json) => {
            parse_eslint(&json, path).unwrap_or_else(|| fallback_text("eslint", &json, path))
        }
        RawDiagnostics::CompilerText(text) => parse_compiler_text(&text, path),
        RawDiagnostics::Issues(issues) => issues,
    };
    issues.into_iter().map(normalize_issue).collect()
}

/// Normalize a sequence of raw outputs, preserving order.
pub fn normalize_all(raw: Vec<RawDiagnostics>, path: &str) -> Vec<Issue> {
    raw.into_iter().flat_map(|r| normalize(r, path)).collect()
}

fn fallback_text(tool: &str, text: &str, path: &str) -> Vec<Issue> {
    tracing::warn!("{} output is not valid JSON, keeping it as text", tool);
    parse_compiler_text(text, path)
}

/// A positive position, or `None`.
fn position(value: Option<i64>) -> Option<u32> {
    value
        .filter(|v| *v >= 1)
        .and_then(|v| u32::try_from(v).ok())
}

// =============================================================================
// pylint
// =============================================================================

#[derive(Deserialize)]
struct PylintMessage {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    message: String,
    line: Option<i64>,
    column: Option<i64>,
    #[serde(rename = "message-id")]
    message_id: Option<String>,
    symbol: Option<String>,
}

/// Map a pylint message type to an issue kind.
pub fn pylint_kind(kind: &str, message_id: Option<&str>, symbol: Option<&str>) -> IssueKind {
    if message_id == Some("E0001") || symbol == Some("syntax-error") {
        return IssueKind::SyntaxError;
    }
    IssueKind::from_label(kind)
}

/// Parse `pylint --output-format=json`. `None` if the text is not that JSON.
pub fn parse_pylint(json: &str, path: &str) -> Option<Vec<Issue>> {
    let messages: Vec<PylintMessage> = serde_json::from_str(json.trim()).ok()?;
    Some(
        messages
            .into_iter()
            .map(|m| {
                let kind = pylint_kind(&m.kind, m.message_id.as_deref(), m.symbol.as_deref());
                // pylint columns are 0-based
                let column = m.column.filter(|c| *c >= 0).map(|c| c + 1);
                Issue::unlocated(kind, m.message.trim(), path)
                    .at(position(m.line), position(column))
                    .with_code(m.message_id)
            })
            .collect(),
    )
}

// =============================================================================
// eslint
// =============================================================================

#[derive(Deserialize)]
struct EslintFile {
    #[serde(default)]
    messages: Vec<EslintMessage>,
}

#[derive(Deserialize)]
struct EslintMessage {
    #[serde(rename = "ruleId")]
    rule_id: Option<String>,
    #[serde(default)]
    severity: i64,
    #[serde(default)]
    message: String,
    line: Option<i64>,
    column: Option<i64>,
    #[serde(default)]
    fatal: bool,
}

/// Map an eslint severity to an issue kind. Fatal messages are parse errors.
pub fn eslint_kind(severity: i64, fatal: bool) -> IssueKind {
    if fatal {
        return IssueKind::SyntaxError;
    }
    match severity {
        2 => IssueKind::Error,
        1 => IssueKind::Warning,
        _ => IssueKind::Info,
    }
}

/// Parse `eslint -f json`. `None` if the text is not that JSON.
pub fn parse_eslint(json: &str, path: &str) -> Option<Vec<Issue>> {
    let files: Vec<EslintFile> = serde_json::from_str(json.trim()).ok()?;
    Some(
        files
            .into_iter()
            .flat_map(|f| f.messages)
            .map(|m| {
                Issue::unlocated(eslint_kind(m.severity, m.fatal), m.message.trim(), path)
                    .at(position(m.line), position(m.column))
                    .with_code(m.rule_id)
            })
            .collect(),
    )
}

// =============================================================================
// Compiler text
// =============================================================================

/// `<file>:<line>:[<col>:] <severity>: <message>` as printed by gcc, g++,
/// clang, javac and cppcheck's gcc template.
static DIAGNOSTIC_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<file>.*?):(?P<line>\d+):(?:(?P<col>\d+):)?\s*(?P<sev>fatal error|error|warning|note|style|performance|portability|information):\s*(?P<msg>.*)$",
    )
    .unwrap()
});

/// Trailing `[-Wflag]` (gcc) or `[checkId]` (cppcheck).
static TRAILING_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<msg>.*?)\s*\[(?P<code>[A-Za-z0-9_=+-]+)\]$").unwrap());

/// Map a compiler severity word to an issue kind.
pub fn compiler_kind(word: &str) -> IssueKind {
    IssueKind::from_label(word)
}

/// Parse free-form compiler diagnostics line by line.
///
/// Matching lines become located issues; every other non-blank line is kept
/// as an unlocated `Info` issue.
pub fn parse_compiler_text(text: &str, path: &str) -> Vec<Issue> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| parse_compiler_line(line, path))
        .collect()
}

fn parse_compiler_line(line: &str, path: &str) -> Issue {
    let caps = match DIAGNOSTIC_LINE.captures(line) {
        Some(caps) => caps,
        None => return Issue::unlocated(IssueKind::Info, line.trim(), path),
    };

    let line_no = caps["line"].parse::<i64>().ok();
    let column = caps.name("col").and_then(|c| c.as_str().parse::<i64>().ok());
    let message = caps["msg"].trim();
    let (message, code) = match TRAILING_CODE.captures(message) {
        Some(c) => (
            c.name("msg").map(|m| m.as_str()).unwrap_or(message).to_string(),
            c.name("code").map(|m| m.as_str().to_string()),
        ),
        None => (message.to_string(), None),
    };

    Issue::unlocated(compiler_kind(&caps["sev"]), message, path)
        .at(position(line_no), position(column))
        .with_code(code)
}

// =============================================================================
// Whole results
// =============================================================================

fn normalize_issue(mut issue: Issue) -> Issue {
    issue.line = issue.line.filter(|l| *l >= 1);
    issue.column = issue.column.filter(|c| *c >= 1);
    let trimmed = issue.message.trim();
    if trimmed.len() != issue.message.len() {
        issue.message = trimmed.to_string();
    }
    issue.code = issue.code.filter(|c| !c.trim().is_empty());
    issue
}

/// Bring a result (possibly deserialized from elsewhere) into canonical form.
///
/// Idempotent: normalizing an already normalized result changes nothing.
pub fn normalize_result(mut result: AnalysisResult) -> AnalysisResult {
    let language = result.language.trim().to_lowercase();
    result.language = if language.is_empty() {
        "unknown".to_string()
    } else {
        language
    };
    let file = &result.file;
    result.issues = std::mem::take(&mut result.issues)
        .into_iter()
        .map(|mut issue| {
            if issue.path.trim().is_empty() {
                issue.path = file.clone();
            }
            normalize_issue(issue)
        })
        .collect();
    result.complexity = result
        .complexity
        .into_iter()
        .map(|c| ComplexityEntry::new(c.function_name, c.line_number, c.cyclomatic_complexity))
        .collect();
    result.maintainability_index = result
        .maintainability_index
        .filter(|mi| mi.is_finite())
        .map(|mi| mi.clamp(0.0, 100.0));
    result.score = score::score(&result.issues);
    result
}
