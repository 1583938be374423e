//! Client for a remote analysis backend.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::normalize;
use crate::types::{AnalysisRequest, AnalysisResult};

/// Per-request time budget.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("no analyze endpoints configured")]
    NoEndpoints,
    #[error("All analyze endpoints failed. Last error: {last}")]
    AllFailed { last: String },
}

/// Posts code to the backend, trying each endpoint in order.
pub struct Client {
    http: reqwest::Client,
    endpoints: Vec<String>,
}

impl Client {
    pub fn new(endpoints: Vec<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self { http, endpoints })
    }

    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        Self::new(config.analyze_endpoints())
    }

    /// Submit `request`. The first endpoint answering 200 with a usable body
    /// wins; the rest are not tried.
    pub async fn submit(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ClientError> {
        if self.endpoints.is_empty() {
            return Err(ClientError::NoEndpoints);
        }

        let mut last = String::new();
        for url in &self.endpoints {
            match self.try_endpoint(url, request).await {
                Ok(result) => {
                    tracing::debug!("{} answered", url);
                    return Ok(result);
                }
                Err(e) => {
                    tracing::debug!("{} failed: {}", url, e);
                    last = e;
                }
            }
        }
        Err(ClientError::AllFailed { last })
    }

    async fn try_endpoint(
        &self,
        url: &str,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, String> {
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| format!("{}: {}", url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(format!("{} returned HTTP {}", url, status));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| format!("{}: invalid JSON: {}", url, e))?;
        parse_response(data).map_err(|e| format!("{}: {}", url, e))
    }
}

/// Accept either `{"analysis": result}` or a bare result.
///
/// The MI may arrive as `maintainability`, `maintainability_index` or both;
/// a non-null `maintainability` wins.
pub fn parse_response(data: Value) -> Result<AnalysisResult, serde_json::Error> {
    let mut analysis = match data {
        Value::Object(mut map) if map.contains_key("analysis") => {
            map.remove("analysis").unwrap_or(Value::Null)
        }
        other => other,
    };
    if let Value::Object(map) = &mut analysis {
        if let Some(legacy) = map.remove("maintainability_index") {
            if map.get("maintainability").map_or(true, Value::is_null) {
                map.insert("maintainability".to_string(), legacy);
            }
        }
    }
    let result: AnalysisResult = serde_json::from_value(analysis)?;
    Ok(normalize::normalize_result(result))
}
