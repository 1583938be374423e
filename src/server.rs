//! Web front end and JSON analysis backend.
//!
//! `GET /` serves an upload form, `POST /` analyzes the uploaded file and
//! shows the text report. The JSON routes accept `{"code", "filename"}` and
//! answer `{"analysis": result}`, which is what [`crate::client`] expects.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::report::{html, text};
use crate::types::{AnalysisRequest, AnalysisResult};

pub const NO_FILE_UPLOADED: &str = "[Error] No file uploaded";
pub const NO_FILE_SELECTED: &str = "[Error] No file selected";

/// Name of the multipart field carrying the upload.
const FILE_FIELD: &str = "file";

/// Body of the JSON analysis routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: AnalysisResult,
}

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<Analyzer>,
    upload_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(analyzer: Analyzer, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            upload_dir: Arc::new(upload_dir.into()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Analyzer::new(config.tools.clone()), config.upload_dir.clone())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(upload))
        .route("/analyze", post(analyze_code))
        .route("/analyze/", post(analyze_code))
        .route("/analyze/code", post(analyze_code))
        .route("/analyze/code/", post(analyze_code))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(config: &Config, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;
    let local: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on http://{}", local);
    tracing::info!("uploads saved to {}", config.upload_dir.display());

    axum::serve(listener, router(AppState::from_config(config)))
        .await
        .context("server error")?;
    Ok(())
}

async fn index() -> Html<String> {
    Html(page(None))
}

async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Html<String> {
    let output = handle_upload(&state, &mut multipart).await;
    Html(page(Some(&output)))
}

async fn analyze_code(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Json<AnalyzeResponse> {
    tracing::debug!("analyze request for {}", request.display_name());
    let analysis = state.analyzer.analyze(&request).await;
    Json(AnalyzeResponse { analysis })
}

/// Process an upload and return the text shown on the result page.
async fn handle_upload(state: &AppState, multipart: &mut Multipart) -> String {
    let mut upload = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some(FILE_FIELD) {
                    continue;
                }
                let name = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => upload = Some((name, bytes)),
                    Err(e) => return format!("[Error] Upload failed: {}", e),
                }
                break;
            }
            Ok(None) => break,
            Err(e) => return format!("[Error] Upload failed: {}", e),
        }
    }

    let Some((name, bytes)) = upload else {
        return NO_FILE_UPLOADED.to_string();
    };
    if name.trim().is_empty() {
        return NO_FILE_SELECTED.to_string();
    }

    let file_name = sanitize_filename(&name);
    let saved = match save_upload(&state.upload_dir, &file_name, &bytes).await {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("cannot save upload {}: {}", file_name, e);
            return format!("[Error] Could not save {}: {}", file_name, e);
        }
    };
    tracing::info!("saved upload to {}", saved.display());

    let code = String::from_utf8_lossy(&bytes).into_owned();
    let request = AnalysisRequest::new(code, Some(file_name));
    let result = state.analyzer.analyze(&request).await;
    text::render(&result, &text::timestamp())
}

async fn save_upload(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(file_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Reduce a client-supplied file name to a safe single path component.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

fn page(output: Option<&str>) -> String {
    let mut body = String::from(
        r#"<!DOCTYPE html>
<html><head><meta charset='utf-8'><title>CodeSage</title>
<style>
body { font-family: Segoe UI, system-ui, -apple-system, Arial; margin: 24px; color: #222; }
h1 { color: #1b365d; }
pre { background: #f7f9fc; border: 1px solid #eee; border-radius: 8px; padding: 16px; white-space: pre-wrap; }
</style>
</head><body>
<h1>CodeSage</h1>
<form method="post" enctype="multipart/form-data">
<input type="file" name="file">
<button type="submit">Analyze</button>
</form>
"#,
    );
    if let Some(output) = output {
        body.push_str(&format!("<pre>{}</pre>\n", html::escape(output)));
    }
    body.push_str("</body></html>\n");
    body
}
