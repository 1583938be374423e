//! Advisory suggestions derived from an analysis result.
//!
//! A fixed decision table over issue codes, complexity and maintainability.
//! The output is an ordered set, so the same result always yields the same
//! suggestions in the same order.

use std::collections::BTreeSet;

use crate::types::{AnalysisResult, Issue};

/// Functions above this complexity are flagged as very complex.
pub const VERY_COMPLEX: u32 = 10;
/// Functions above this complexity are flagged as somewhat complex.
pub const SOMEWHAT_COMPLEX: u32 = 5;
/// Maintainability below this triggers the global advisory.
pub const LOW_MAINTAINABILITY: f64 = 65.0;

pub const MODULE_DOCSTRING: &str =
    "Add a module-level docstring to describe the purpose of the file.";
pub const DOCSTRINGS: &str = "Add docstrings for all functions and methods.";
pub const UNUSED_IMPORTS: &str = "Remove unused imports to keep the code clean.";
pub const UNUSED_VARIABLES: &str = "Remove unused variables to simplify the code.";
pub const TOO_MANY_BRANCHES: &str =
    "Too many branches in a function. Consider splitting into smaller functions.";
pub const TOO_MANY_STATEMENTS: &str = "Function has too many statements. Refactor for clarity.";
pub const LOW_MAINTAINABILITY_ADVICE: &str =
    "Maintainability index is low. Break code into smaller, reusable functions.";
pub const CLEAN_CODE: &str = "Code looks clean! Great job!";

/// Fixed advice for a known issue code (pylint message-id, eslint rule,
/// compiler flag).
pub fn advice_for_code(code: &str) -> Option<&'static str> {
    match code {
        "C0114" => Some(MODULE_DOCSTRING),
        "C0115" | "C0116" | "require-jsdoc" | "valid-jsdoc" => Some(DOCSTRINGS),
        "W0611" | "no-unused-imports" | "unused-imports/no-unused-imports" => Some(UNUSED_IMPORTS),
        "W0612" | "no-unused-vars" | "-Wunused-variable" | "unusedVariable" | "unreadVariable" => {
            Some(UNUSED_VARIABLES)
        }
        "R0912" | "complexity" => Some(TOO_MANY_BRANCHES),
        "R0915" | "max-statements" => Some(TOO_MANY_STATEMENTS),
        _ => None,
    }
}

fn issue_advice(issue: &Issue) -> String {
    issue
        .code
        .as_deref()
        .and_then(advice_for_code)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Review: {}", issue.message))
}

/// Generate the suggestion set for `result`.
pub fn generate(result: &AnalysisResult) -> BTreeSet<String> {
    let mut suggestions: BTreeSet<String> = result.issues.iter().map(issue_advice).collect();

    for entry in &result.complexity {
        let cc = entry.cyclomatic_complexity;
        if cc > VERY_COMPLEX {
            suggestions.insert(format!(
                "Function `{}` is very complex (CC={}). Strongly consider refactoring.",
                entry.function_name, cc
            ));
        } else if cc > SOMEWHAT_COMPLEX {
            suggestions.insert(format!(
                "Function `{}` is somewhat complex (CC={}). Refactor if possible.",
                entry.function_name, cc
            ));
        }
    }

    if result
        .maintainability_index
        .map(|mi| mi < LOW_MAINTAINABILITY)
        .unwrap_or(false)
    {
        suggestions.insert(LOW_MAINTAINABILITY_ADVICE.to_string());
    }

    if suggestions.is_empty() {
        suggestions.insert(CLEAN_CODE.to_string());
    }

    suggestions
}
