//! Plain-text report.
//!
//! Also the line source for the PDF renderer.

use chrono::Local;

use crate::score;
use crate::types::AnalysisResult;

use super::{issue_line, maintainability_label, NOT_AVAILABLE};

const TITLE: &str = "CodeSage - Analysis Report";
const RULE_WIDTH: usize = 60;

/// Local time in the report header format.
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Report lines for `results`, stamped with `generated`.
pub fn report_lines(results: &[AnalysisResult], generated: &str) -> Vec<String> {
    let mut lines = vec![
        TITLE.to_string(),
        "=".repeat(RULE_WIDTH),
        format!("Generated: {}", generated),
    ];

    for result in results {
        lines.push("-".repeat(RULE_WIDTH));
        lines.push(format!("File: {}", result.file));
        lines.push(format!("Language: {}", result.language));
        lines.push(format!(
            "Score: {:.2}/100 ({})",
            result.score,
            score::grade(result.score)
        ));
        lines.push(format!(
            "Maintainability Index: {}",
            maintainability_label(result)
        ));

        lines.push(String::new());
        if result.issues.is_empty() {
            lines.push("No issues found!".to_string());
        } else {
            lines.push(format!("Issues ({}):", result.issues.len()));
            lines.extend(result.issues.iter().map(|i| format!(" - {}", issue_line(i))));
        }

        lines.push(String::new());
        lines.push("Complexity:".to_string());
        if result.complexity.is_empty() {
            lines.push(format!(" - {}", NOT_AVAILABLE));
        }
        for entry in &result.complexity {
            lines.push(format!(
                " - {} (line {}): CC={}, rank {}",
                entry.function_name, entry.line_number, entry.cyclomatic_complexity, entry.rank
            ));
        }

        lines.push(String::new());
        lines.push("Suggestions:".to_string());
        lines.extend(result.suggestions.iter().map(|s| format!(" - {}", s)));
    }

    lines
}

/// Text report for one result.
pub fn render(result: &AnalysisResult, generated: &str) -> String {
    render_all(std::slice::from_ref(result), generated)
}

/// Combined text report.
pub fn render_all(results: &[AnalysisResult], generated: &str) -> String {
    let mut text = report_lines(results, generated).join("\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ComplexityEntry, Issue, IssueKind};

    #[test]
    fn test_clean_report() {
        let mut result = AnalysisResult::new("python", "a.py");
        result.maintainability_index = Some(100.0);
        result.complexity.push(ComplexityEntry::new("f", 1, 1));
        result.suggestions.insert("Code looks clean! Great job!".to_string());

        let text = render(&result, "2024-01-01 00:00:00");
        assert!(text.starts_with("CodeSage - Analysis Report\n"));
        assert!(text.contains("Generated: 2024-01-01 00:00:00"));
        assert!(text.contains("File: a.py"));
        assert!(text.contains("Score: 100.00/100 (A)"));
        assert!(text.contains("Maintainability Index: 100.00"));
        assert!(text.contains("No issues found!"));
        assert!(text.contains(" - f (line 1): CC=1, rank A"));
        assert!(text.contains(" - Code looks clean! Great job!"));
    }

    #[test]
    fn test_issues_and_placeholders() {
        let mut result = AnalysisResult::new("cpp", "a.cpp");
        result.issues.push(
            Issue::unlocated(IssueKind::Error, "expected ';' before '}' token", "a.cpp")
                .at(Some(2), Some(10)),
        );
        result.score = 95.0;

        let text = render(&result, "now");
        assert!(text.contains("Issues (1):"));
        assert!(text.contains(" - [Error] a.cpp:2:10 -> expected ';' before '}' token"));
        assert!(text.contains("Maintainability Index: N/A"));
        assert!(text.contains("Complexity:\n - N/A"));
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
    }
}
