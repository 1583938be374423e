//! Integration tests for report output and the analyze command.

mod common;

use std::path::PathBuf;

use codesage::cli::{self, AnalyzeArgs, EXIT_ERROR, EXIT_SUCCESS};
use codesage::config::Config;
use codesage::report::{self, Format};
use codesage::{Analyzer, AnalysisResult};
use tempfile::TempDir;

use common::{offline_tools, testdata_path};

fn offline_config() -> Config {
    Config {
        tools: offline_tools(),
        ..Config::default()
    }
}

fn args(path: Option<PathBuf>, output: PathBuf) -> AnalyzeArgs {
    AnalyzeArgs {
        path,
        output,
        all_languages: false,
        pdf: false,
        text: false,
    }
}

async fn fixture_results() -> Vec<AnalysisResult> {
    let analyzer = Analyzer::new(offline_tools());
    let mut results = Vec::new();
    for file in ["clean.py", "Hello.java"] {
        results.push(
            analyzer
                .analyze_file(&testdata_path().join(file))
                .await
                .expect("fixture should be readable"),
        );
    }
    results
}

#[tokio::test]
async fn test_write_reports_all_formats() {
    let temp = TempDir::new().unwrap();
    let results = fixture_results().await;
    let mut opts = args(None, temp.path().join("reports"));
    opts.pdf = true;
    opts.text = true;

    let written = cli::write_reports(&opts.output, &results, &opts).unwrap();
    assert_eq!(written.len(), 5);

    let dir = temp.path().join("reports");
    let html = std::fs::read_to_string(dir.join("clean_report.html")).unwrap();
    assert!(html.contains("<h2>File: "));
    assert!(html.contains("clean.py"));
    assert!(dir.join("Hello_report.html").exists());

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.join("analysis_report.json")).unwrap()).unwrap();
    let entries = json.as_array().expect("combined report is an array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["language"], "java");
    assert_eq!(entries[1]["issues"][0]["type"], "ToolMissing");

    let pdf = std::fs::read(dir.join("analysis_report.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-1.4"));
    assert!(pdf.ends_with(b"%%EOF\n"));

    let text = std::fs::read_to_string(dir.join("analysis_report.txt")).unwrap();
    assert!(text.contains("Language: java"));
    assert!(text.contains("[ToolMissing]"));
}

#[tokio::test]
async fn test_json_round_trips_through_serde() {
    let results = fixture_results().await;
    let bytes = report::render(&results[0], Format::Json).unwrap();
    let back: AnalysisResult = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(back, results[0]);
}

#[tokio::test]
async fn test_run_analyze_directory() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    std::fs::create_dir_all(src.join("__pycache__")).unwrap();
    std::fs::copy(testdata_path().join("clean.py"), src.join("clean.py")).unwrap();
    std::fs::copy(testdata_path().join("broken.py"), src.join("broken.py")).unwrap();
    std::fs::copy(testdata_path().join("app.js"), src.join("app.js")).unwrap();
    std::fs::write(src.join("__pycache__").join("stale.py"), "x = 1\n").unwrap();

    let out = temp.path().join("out");
    let code = cli::run_analyze(&args(Some(src), out.clone()), &offline_config())
        .await
        .unwrap();
    assert_eq!(code, EXIT_SUCCESS);

    assert!(out.join("clean_report.html").exists());
    assert!(out.join("broken_report.html").exists());
    assert!(!out.join("app_report.html").exists());
    assert!(!out.join("stale_report.html").exists());
    assert!(!out.join("analysis_report.pdf").exists());

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(out.join("analysis_report.json")).unwrap()).unwrap();
    assert_eq!(json.as_array().map(|a| a.len()), Some(2));
}

#[tokio::test]
async fn test_run_analyze_rejects_non_python_file() {
    let temp = TempDir::new().unwrap();
    let code = cli::run_analyze(
        &args(Some(testdata_path().join("app.js")), temp.path().join("out")),
        &offline_config(),
    )
    .await
    .unwrap();
    assert_eq!(code, EXIT_ERROR);
}

#[tokio::test]
async fn test_run_analyze_missing_path() {
    let temp = TempDir::new().unwrap();
    let code = cli::run_analyze(
        &args(Some(temp.path().join("nope")), temp.path().join("out")),
        &offline_config(),
    )
    .await
    .unwrap();
    assert_eq!(code, EXIT_ERROR);
}
