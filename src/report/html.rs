//! HTML report.

use crate::score;
use crate::types::{AnalysisResult, ComplexityEntry};

use super::{maintainability_label, NOT_AVAILABLE};

const STYLE: &str = r#"<style>
body { font-family: Segoe UI, system-ui, -apple-system, Arial; margin: 24px; color: #222; }
h1 { color: #1b365d; margin-bottom: 4px; }
h2 { color: #274472; margin-top: 24px; }
.card { border: 1px solid #eee; border-radius: 12px; padding: 16px; margin: 12px 0; }
.kpi { display: inline-block; padding: 12px 16px; border-radius: 10px; background: #f7f9fc; margin-right: 8px; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; border-bottom: 1px solid #eee; padding: 8px; }
th { background: #f5f7fb; }
.badge { display: inline-block; padding: 4px 8px; border-radius: 8px; background: #eef2ff; color: #334155; font-size: 12px; }
.high { color: #b91c1c; font-weight: bold; }
.medium { color: #b45309; }
.low { color: #15803d; }
</style>"#;

/// Escape text for inclusion in HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn cell(value: Option<u32>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn complexity_class(entry: &ComplexityEntry) -> &'static str {
    match entry.cyclomatic_complexity {
        cc if cc > 10 => "high",
        cc if cc > 5 => "medium",
        _ => "low",
    }
}

/// A complete HTML document for one result.
pub fn render(result: &AnalysisResult) -> String {
    render_all(std::slice::from_ref(result))
}

/// A complete HTML document with one section per result.
pub fn render_all(results: &[AnalysisResult]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html><head><meta charset='utf-8'>\n");
    html.push_str("<title>CodeSage Report</title>\n");
    html.push_str(STYLE);
    html.push_str("\n</head><body>\n<h1>CodeSage Report</h1>\n");
    for result in results {
        write_section(&mut html, result);
    }
    html.push_str("</body></html>\n");
    html
}

fn write_section(html: &mut String, result: &AnalysisResult) {
    html.push_str("<section class='report'>\n");
    html.push_str(&format!("<h2>File: {}</h2>\n", escape(&result.file)));

    html.push_str("<div class='card'>\n");
    html.push_str(&format!(
        "<span class='kpi'><b>Language:</b> {}</span>\n",
        escape(&result.language)
    ));
    html.push_str(&format!(
        "<span class='kpi'><b>Score:</b> {:.2} / 100 ({})</span>\n",
        result.score,
        score::grade(result.score)
    ));
    html.push_str(&format!(
        "<span class='kpi'><b>Maintainability:</b> {}</span>\n",
        maintainability_label(result)
    ));
    html.push_str(&format!(
        "<span class='kpi'><b>Issues:</b> {}</span>\n",
        result.issues.len()
    ));
    html.push_str("</div>\n");

    html.push_str("<h3>Issues</h3><div class='card'>\n");
    if result.issues.is_empty() {
        html.push_str("<p>No major issues found.</p>\n");
    } else {
        html.push_str("<table><thead><tr><th>Type</th><th>Message</th><th>Path</th><th>Line</th><th>Column</th><th>Code</th></tr></thead><tbody>\n");
        for issue in &result.issues {
            html.push_str(&format!(
                "<tr><td><span class='badge'>{}</span></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                issue.kind,
                escape(&issue.message),
                escape(&issue.path),
                cell(issue.line),
                cell(issue.column),
                escape(issue.code.as_deref().unwrap_or("-")),
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</div>\n");

    html.push_str("<h3>Complexity</h3><div class='card'>\n");
    if result.complexity.is_empty() {
        html.push_str(&format!("<p>{}</p>\n", NOT_AVAILABLE));
    } else {
        html.push_str("<table><thead><tr><th>Function</th><th>Line</th><th>Complexity</th><th>Rank</th></tr></thead><tbody>\n");
        for entry in &result.complexity {
            html.push_str(&format!(
                "<tr class='{}'><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                complexity_class(entry),
                escape(&entry.function_name),
                entry.line_number,
                entry.cyclomatic_complexity,
                entry.rank,
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</div>\n");

    html.push_str("<h3>Suggestions</h3><div class='card'>\n<ul>\n");
    for suggestion in &result.suggestions {
        html.push_str(&format!("<li>{}</li>\n", escape(suggestion)));
    }
    html.push_str("</ul>\n</div>\n</section>\n");
}
