//! The analysis pipeline for a single request.
//!
//! Detector → Adapter → Normalizer → Scorer + Suggestions.

use std::path::Path;

use thiserror::Error;

use crate::adapters::Adapter;
use crate::config::ToolsConfig;
use crate::language::{self, Language};
use crate::normalize;
use crate::score;
use crate::suggest;
use crate::types::{AnalysisRequest, AnalysisResult};

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

/// Runs requests through the pipeline with a fixed tool configuration.
pub struct Analyzer {
    tools: ToolsConfig,
}

impl Analyzer {
    pub fn new(tools: ToolsConfig) -> Self {
        Self { tools }
    }

    /// Analyze one request. Adapter failures surface as issues, never as
    /// errors.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        let language = language::detect(&request.code, request.filename.as_deref());
        let adapter = Adapter::for_language(language);
        let path = request.display_name();

        if language == Language::Unknown {
            tracing::debug!("{}: language not recognized, using the python path", path);
        }
        tracing::debug!(
            "{}: {} via {} adapter ({})",
            path,
            language,
            adapter.name(),
            adapter.primary_tool(&self.tools).program
        );

        let output = adapter.analyze(&request.code, path, &self.tools).await;

        let mut result = AnalysisResult::new(language.as_str(), path);
        result.issues = normalize::normalize_all(output.raw, path);
        result.complexity = output.complexity;
        result.maintainability_index = output.maintainability;
        result.score = score::score(&result.issues);
        result.suggestions = suggest::generate(&result);
        result
    }

    /// Read and analyze a file on disk.
    pub async fn analyze_file(&self, path: &Path) -> Result<AnalysisResult, AnalyzeError> {
        let code = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| AnalyzeError::Read {
                path: path.display().to_string(),
                source,
            })?;
        let request = AnalysisRequest::new(code, Some(path.to_string_lossy().into_owned()));
        Ok(self.analyze(&request).await)
    }
}
