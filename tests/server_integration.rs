//! Integration tests for the HTTP server and the backend client.

mod common;

use std::net::SocketAddr;
use std::path::Path;

use codesage::client::Client;
use codesage::server::{self, AnalyzeResponse, AppState, NO_FILE_SELECTED, NO_FILE_UPLOADED};
use codesage::{AnalysisRequest, Analyzer, IssueKind};
use reqwest::multipart::{Form, Part};
use tempfile::TempDir;

use common::offline_tools;

async fn spawn_server(upload_dir: &Path) -> SocketAddr {
    let state = AppState::new(Analyzer::new(offline_tools()), upload_dir);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, server::router(state)).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_index_serves_form() {
    let temp = TempDir::new().unwrap();
    let addr = spawn_server(temp.path()).await;

    let body = reqwest::get(format!("http://{}/", addr))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("enctype=\"multipart/form-data\""));
    assert!(body.contains("name=\"file\""));
}

#[tokio::test]
async fn test_json_backend_routes() {
    let temp = TempDir::new().unwrap();
    let addr = spawn_server(temp.path()).await;
    let http = reqwest::Client::new();

    for route in ["/analyze", "/analyze/", "/analyze/code", "/analyze/code/"] {
        let response = http
            .post(format!("http://{}{}", addr, route))
            .json(&AnalysisRequest::new(
                "public class Hidden {}",
                Some("Hidden.java".to_string()),
            ))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK, "{}", route);

        let body: AnalyzeResponse = response.json().await.unwrap();
        assert_eq!(body.analysis.language, "java");
        assert_eq!(body.analysis.file, "Hidden.java");
        assert_eq!(body.analysis.issues[0].kind, IssueKind::ToolMissing);
    }
}

#[tokio::test]
async fn test_client_falls_back_to_next_endpoint() {
    let temp = TempDir::new().unwrap();
    let addr = spawn_server(temp.path()).await;

    let client = Client::new(vec![
        format!("http://{}/missing/", addr),
        format!("http://{}/analyze/code", addr),
    ])
    .unwrap();
    let result = client
        .submit(&AnalysisRequest::new("int main() { return 0; }", Some("a.cpp".to_string())))
        .await
        .unwrap();
    assert_eq!(result.language, "cpp");
    assert_eq!(result.score, 95.0);
}

#[tokio::test]
async fn test_client_reports_last_error() {
    let temp = TempDir::new().unwrap();
    let addr = spawn_server(temp.path()).await;

    let client = Client::new(vec![
        format!("http://{}/missing/", addr),
        format!("http://{}/gone", addr),
    ])
    .unwrap();
    let err = client
        .submit(&AnalysisRequest::new("x = 1", None))
        .await
        .unwrap_err()
        .to_string();
    assert!(err.starts_with("All analyze endpoints failed. Last error: "));
    assert!(err.contains("/gone"));
    assert!(err.contains("404"));
}

#[tokio::test]
async fn test_upload_is_saved_and_analyzed() {
    let temp = TempDir::new().unwrap();
    let uploads = temp.path().join("uploads");
    let addr = spawn_server(&uploads).await;

    let form = Form::new().part(
        "file",
        Part::bytes(b"public class Upload {}\n".to_vec()).file_name("../Upload.java"),
    );
    let body = reqwest::Client::new()
        .post(format!("http://{}/", addr))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("File: Upload.java"));
    assert!(body.contains("Language: java"));
    assert!(body.contains("[ToolMissing]"));
    assert_eq!(
        std::fs::read_to_string(uploads.join("Upload.java")).unwrap(),
        "public class Upload {}\n"
    );
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let temp = TempDir::new().unwrap();
    let addr = spawn_server(temp.path()).await;

    let form = Form::new().text("comment", "no file here");
    let body = reqwest::Client::new()
        .post(format!("http://{}/", addr))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains(NO_FILE_UPLOADED));
}

#[tokio::test]
async fn test_upload_with_empty_filename() {
    let temp = TempDir::new().unwrap();
    let addr = spawn_server(temp.path()).await;

    let form = Form::new().part("file", Part::bytes(Vec::new()).file_name(""));
    let body = reqwest::Client::new()
        .post(format!("http://{}/", addr))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains(NO_FILE_SELECTED));
}
