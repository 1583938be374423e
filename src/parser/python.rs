//! Python analysis on a tree-sitter parse tree.
//!
//! Cyclomatic complexity follows the radon rules so numbers line up with what
//! Python developers see from their own tooling:
//! - Start at 1
//! - +1 for each: if, elif, ternary, with, assert, except, match case,
//!   comprehension `for` and `if`, each `and`/`or`
//! - +1 for each loop, +1 more when the loop has an `else`
//! - +1 for a `try` with an `else`
//!
//! Nested functions and classes are measured on their own and do not add to
//! the enclosing function.

use std::collections::HashSet;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor, Tree};

use super::SyntaxFault;
use crate::types::ComplexityEntry;

/// Tree-sitter query for finding function definitions (including methods).
const FUNCTION_QUERY: &str = r#"
(function_definition name: (identifier) @name) @func
"#;

/// A parsed Python source.
pub struct PythonSource {
    language: Language,
    tree: Tree,
    source: String,
}

impl PythonSource {
    pub fn parse(source: &str) -> anyhow::Result<Self> {
        let language: Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language)?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse source"))?;
        Ok(Self {
            language,
            tree,
            source: source.to_string(),
        })
    }

    fn text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// The first syntax error in document order, if any.
    ///
    /// The grammar still accepts a few Python 2 forms (`print x`, `exec code`,
    /// `<>`, `except E, e:`); those are reported as errors too.
    pub fn syntax_fault(&self) -> Option<SyntaxFault> {
        let root = self.tree.root_node();
        let (node, legacy) = match first_fault(root) {
            Some(fault) => fault,
            None if root.has_error() => (root, None),
            None => return None,
        };
        let pos = node.start_position();
        let message = if let Some(message) = legacy {
            message.to_string()
        } else if node.is_missing() {
            format!("expected '{}'", node.kind())
        } else {
            let snippet = self.text(node).lines().next().unwrap_or("").trim();
            if snippet.is_empty() {
                "invalid syntax".to_string()
            } else {
                let snippet: String = snippet.chars().take(40).collect();
                format!("invalid syntax near `{}`", snippet)
            }
        };
        Some(SyntaxFault {
            message,
            line: pos.row as u32 + 1,
            column: pos.column as u32 + 1,
        })
    }

    /// Complexity of every function and method, in source order.
    pub fn complexity(&self) -> anyhow::Result<Vec<ComplexityEntry>> {
        let query = Query::new(&self.language, FUNCTION_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, self.tree.root_node(), self.source.as_bytes());

        let mut entries = Vec::new();
        while let Some(m) = matches.next() {
            let mut func_node = None;
            let mut func_name = None;
            for capture in m.captures {
                match query.capture_names()[capture.index as usize] {
                    "func" => func_node = Some(capture.node),
                    "name" => func_name = Some(self.text(capture.node).to_string()),
                    _ => {}
                }
            }
            if let (Some(node), Some(name)) = (func_node, func_name) {
                let complexity = 1 + decision_points(node);
                entries.push((node.start_byte(), ComplexityEntry::new(
                    name,
                    node.start_position().row as u32 + 1,
                    complexity,
                )));
            }
        }

        entries.sort_by_key(|(start, _)| *start);
        Ok(entries.into_iter().map(|(_, e)| e).collect())
    }

    /// Maintainability index in [0, 100].
    ///
    /// `MI = max(0, (171 - 5.2 ln V - 0.23 G - 16.2 ln L + 50 sin(sqrt(2.46 C))) * 100 / 171)`
    /// with V the Halstead volume, G the total complexity, L the logical
    /// line count and C the comment percentage (in radians).
    pub fn maintainability_index(&self) -> f64 {
        let root = self.tree.root_node();
        let volume = self.halstead_volume();
        let functions: u32 = self
            .complexity()
            .map(|entries| entries.iter().map(|e| e.cyclomatic_complexity).sum())
            .unwrap_or(0);
        let total_complexity = functions + decision_points(root);
        let lloc = logical_lines(root);

        let sloc = self.source.lines().filter(|l| !l.trim().is_empty()).count();
        let comment_lines = comment_lines(root);
        let comment_pct = if sloc == 0 {
            0.0
        } else {
            comment_lines as f64 / sloc as f64 * 100.0
        };

        mi_compute(volume, total_complexity, lloc, comment_pct)
    }

    /// Halstead volume `N * log2(n)` over operator expressions.
    fn halstead_volume(&self) -> f64 {
        let mut operators: HashSet<String> = HashSet::new();
        let mut operands: HashSet<String> = HashSet::new();
        let mut n_operators = 0usize;
        let mut n_operands = 0usize;

        let mut stack = vec![self.tree.root_node()];
        while let Some(node) = stack.pop() {
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).collect();

            match node.kind() {
                "binary_operator" | "boolean_operator" | "comparison_operator"
                | "unary_operator" | "not_operator" | "augmented_assignment" => {
                    for child in &children {
                        let text = self.text(*child).to_string();
                        if child.is_named() {
                            n_operands += 1;
                            operands.insert(text);
                        } else {
                            n_operators += 1;
                            operators.insert(text);
                        }
                    }
                }
                _ => {}
            }

            stack.extend(children);
        }

        let vocabulary = operators.len() + operands.len();
        if vocabulary == 0 {
            return 0.0;
        }
        (n_operators + n_operands) as f64 * (vocabulary as f64).log2()
    }
}

/// First error, missing or Python 2 only node in document order.
fn first_fault(node: Node) -> Option<(Node, Option<&'static str>)> {
    if node.is_error() || node.is_missing() {
        return Some((node, None));
    }
    if let Some(message) = legacy_syntax(node) {
        return Some((node, Some(message)));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(fault) = first_fault(child) {
            return Some(fault);
        }
    }
    None
}

fn legacy_syntax(node: Node) -> Option<&'static str> {
    match node.kind() {
        "print_statement" => Some("Missing parentheses in call to 'print'. Did you mean print(...)?"),
        "exec_statement" => Some("Missing parentheses in call to 'exec'. Did you mean exec(...)?"),
        "comparison_operator" if has_child_kind(node, "<>") => Some("invalid syntax near `<>`"),
        // `except A, B:` binds B as the alias; Python 3 only has `as`
        "except_clause" if has_child_kind(node, ",") => {
            Some("multiple exception types must be parenthesized")
        }
        _ => None,
    }
}

fn has_child_kind(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == kind);
    found
}

fn node_weight(node: Node) -> u32 {
    match node.kind() {
        "if_statement" | "elif_clause" | "conditional_expression" | "with_statement"
        | "assert_statement" | "except_clause" | "except_group_clause" | "case_clause"
        | "for_in_clause" | "if_clause" | "boolean_operator" => 1,
        "for_statement" | "while_statement" => 1 + has_child_kind(node, "else_clause") as u32,
        "try_statement" => has_child_kind(node, "else_clause") as u32,
        _ => 0,
    }
}

/// Decision points below `node`, not descending into nested definitions.
fn decision_points(node: Node) -> u32 {
    let mut total = 0;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if matches!(child.kind(), "function_definition" | "class_definition") {
            continue;
        }
        total += node_weight(child) + decision_points(child);
    }
    total
}

fn logical_lines(node: Node) -> u32 {
    let own = match node.kind() {
        "function_definition" | "class_definition" => 1,
        kind if kind.ends_with("_statement") => 1,
        _ => 0,
    };
    let mut cursor = node.walk();
    let nested: u32 = node
        .children(&mut cursor)
        .map(logical_lines)
        .sum();
    own + nested
}

/// Comment lines plus the lines of multi-line string statements (docstrings).
fn comment_lines(node: Node) -> u32 {
    match node.kind() {
        "comment" => return 1,
        "expression_statement" if node.named_child_count() == 1 => {
            if let Some(child) = node.named_child(0) {
                if child.kind() == "string" {
                    let span = child.end_position().row - child.start_position().row;
                    if span > 0 {
                        return span as u32 + 1;
                    }
                }
            }
        }
        _ => {}
    }
    let mut cursor = node.walk();
    let total = node.children(&mut cursor).map(comment_lines).sum();
    total
}

fn mi_compute(volume: f64, complexity: u32, lloc: u32, comment_pct: f64) -> f64 {
    if volume <= 0.0 || lloc == 0 {
        return 100.0;
    }
    let raw = 171.0 - 5.2 * volume.ln() - 0.23 * complexity as f64 - 16.2 * (lloc as f64).ln()
        + 50.0 * (2.46 * comment_pct.to_radians()).sqrt().sin();
    (raw * 100.0 / 171.0).clamp(0.0, 100.0)
}
