//! Quality score calculation.
//!
//! The score starts at 100 and loses a flat 5 points per issue, whatever
//! the issue's kind. It never goes below 0.

use crate::types::Issue;

/// Points deducted per issue.
pub const PENALTY_PER_ISSUE: usize = 5;

/// Score of a clean result.
pub const MAX_SCORE: usize = 100;

/// Grade thresholds (minimum score for each grade).
pub mod grades {
    pub const A_MIN: f64 = 90.0;
    pub const B_MIN: f64 = 75.0;
    pub const C_MIN: f64 = 50.0;
    pub const D_MIN: f64 = 25.0;
}

/// `max(0, 100 - 5 * issues.len())`
pub fn score(issues: &[Issue]) -> f64 {
    let penalty = issues.len().saturating_mul(PENALTY_PER_ISSUE);
    MAX_SCORE.saturating_sub(penalty) as f64
}

/// Letter grade for a score, used by the human-readable reports.
pub fn grade(score: f64) -> &'static str {
    match score {
        s if s >= grades::A_MIN => "A",
        s if s >= grades::B_MIN => "B",
        s if s >= grades::C_MIN => "C",
        s if s >= grades::D_MIN => "D",
        _ => "F",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IssueKind;

    fn issues(n: usize) -> Vec<Issue> {
        (0..n)
            .map(|i| Issue::unlocated(IssueKind::Warning, format!("issue {}", i), "a.py"))
            .collect()
    }

    #[test]
    fn test_score_formula() {
        for n in 0..30 {
            let expected = (100.0 - 5.0 * n as f64).clamp(0.0, 100.0);
            assert_eq!(score(&issues(n)), expected, "n = {}", n);
        }
    }

    #[test]
    fn test_score_ignores_severity() {
        let missing = vec![Issue::unlocated(IssueKind::ToolMissing, "g++ not found", "a.cpp")];
        let syntax = vec![Issue::unlocated(IssueKind::SyntaxError, "bad", "a.py")];
        assert_eq!(score(&missing), score(&syntax));
        assert_eq!(score(&missing), 95.0);
    }

    #[test]
    fn test_score_floor() {
        assert_eq!(score(&issues(20)), 0.0);
        assert_eq!(score(&issues(500)), 0.0);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(grade(100.0), "A");
        assert_eq!(grade(90.0), "A");
        assert_eq!(grade(85.0), "B");
        assert_eq!(grade(75.0), "B");
        assert_eq!(grade(70.0), "C");
        assert_eq!(grade(25.0), "D");
        assert_eq!(grade(0.0), "F");
    }
}
