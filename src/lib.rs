//! CodeSage - multi-language static code reviewer.
//!
//! Takes a piece of source code, works out its language, runs the matching
//! external analyzer, and turns whatever that tool printed into a single
//! normalized result: issues, per-function complexity, a maintainability
//! index, a score and a set of suggestions.
//!
//! # Architecture
//!
//! - `language`: language detection from file extension or content
//! - `adapters`: one adapter per language family, invoking external tools
//! - `parser`: tree-sitter based Python syntax check and metrics
//! - `normalize`: tool output to [`types::Issue`] records
//! - `score` / `suggest`: scoring and advice
//! - `analyzer`: the pipeline tying the stages together
//! - `report`: HTML, PDF, JSON and text rendering
//! - `server` / `client`: HTTP front end and remote backend client
//! - `cli`: command-line entry points

pub mod adapters;
pub mod analyzer;
pub mod cli;
pub mod client;
pub mod config;
pub mod language;
pub mod normalize;
pub mod parser;
pub mod report;
pub mod score;
pub mod server;
pub mod suggest;
pub mod types;

pub use analyzer::Analyzer;
pub use config::Config;
pub use language::Language;
pub use report::Format;
pub use types::{AnalysisRequest, AnalysisResult, ComplexityEntry, Issue, IssueKind};
