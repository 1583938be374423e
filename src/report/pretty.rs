//! Colored terminal summary.

use std::collections::BTreeSet;

use colored::*;

use crate::score;
use crate::types::{AnalysisResult, Issue, IssueKind};

use super::maintainability_label;

/// Print a summary of `results` followed by the union of their suggestions.
pub fn write_summary(target: &str, results: &[AnalysisResult]) {
    println!();
    print!("  ");
    print!("{}", "codesage".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Analyzing: ".dimmed());
    println!("{}", target);
    print!("  {}", "Files:     ".dimmed());
    println!("{}", results.len());
    println!();

    for result in results {
        write_result(result);
    }

    let suggestions: BTreeSet<&String> = results.iter().flat_map(|r| &r.suggestions).collect();
    if !suggestions.is_empty() {
        println!("  {}", "Suggestions:".bold());
        for s in suggestions {
            println!("    - {}", s);
        }
        println!();
    }
}

fn write_result(result: &AnalysisResult) {
    print!("  {}", result.file.blue());
    print!("  {}", format!("[{}]", result.language).dimmed());
    print!("  Score: ");
    write_colored_score(result.score);
    print!("  Grade: ");
    write_colored_grade(score::grade(result.score));
    print!("  MI: {}", maintainability_label(result));
    println!();

    for issue in &result.issues {
        write_issue(issue);
    }
    println!();
}

fn write_colored_score(s: f64) {
    let text = format!("{:.0}", s);
    match s {
        s if s >= score::grades::A_MIN => print!("{}", text.green().bold()),
        s if s >= score::grades::B_MIN => print!("{}", text.green()),
        s if s >= score::grades::C_MIN => print!("{}", text.yellow()),
        s if s >= score::grades::D_MIN => print!("{}", text.yellow().bold()),
        _ => print!("{}", text.red()),
    }
}

fn write_colored_grade(grade: &str) {
    match grade {
        "A" => print!("{}", grade.green().bold()),
        "B" => print!("{}", grade.green()),
        "C" => print!("{}", grade.yellow()),
        "D" => print!("{}", grade.yellow().bold()),
        _ => print!("{}", grade.red()),
    }
}

fn write_issue(issue: &Issue) {
    match issue.kind {
        IssueKind::SyntaxError | IssueKind::Error => print!("    {} ", "ERROR".red()),
        IssueKind::Warning => print!("    {} ", "WARN ".yellow()),
        IssueKind::Style => print!("    {} ", "STYLE".cyan()),
        IssueKind::ToolMissing => print!("    {} ", "TOOL ".magenta()),
        IssueKind::Info => print!("    {} ", "INFO ".blue()),
    }
    if let Some(line) = issue.line {
        print!("{}", format!("{:>5}", format!(":{}", line)).dimmed());
    } else {
        print!("{}", "     ".dimmed());
    }
    print!("  {}", issue.message);
    if let Some(code) = &issue.code {
        print!(" {}", format!("({})", code).dimmed());
    }
    println!();
}
