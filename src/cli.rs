//! Command-line interface for codesage.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::analyzer::Analyzer;
use crate::client::Client;
use crate::config::Config;
use crate::language::Language;
use crate::report::{self, pretty, Format};
use crate::server;
use crate::types::{AnalysisRequest, AnalysisResult};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "venv", "__pycache__"];

/// Multi-language static code reviewer.
///
/// Runs each file through a language-specific analyzer (pylint, eslint,
/// javac, g++/gcc, cppcheck), normalizes the findings, scores the result and
/// writes HTML/JSON reports.
#[derive(Parser)]
#[command(name = "codesage")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub analyze: AnalyzeArgs,

    /// Path to config YAML file (default: auto-discover)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a file or directory and write reports (the default)
    Analyze(AnalyzeArgs),
    /// Serve the upload form and the JSON analysis backend
    Serve(ServeArgs),
    /// Send a file to a remote analysis backend
    Submit(SubmitArgs),
    /// Show which external tools are available
    Tools,
}

/// Arguments for the analyze command.
#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    /// Python file or directory to analyze
    pub path: Option<PathBuf>,

    /// Directory for the generated reports
    #[arg(short, long, default_value = "reports")]
    pub output: PathBuf,

    /// Analyze every supported language, not just Python
    #[arg(long)]
    pub all_languages: bool,

    /// Also write analysis_report.pdf
    #[arg(long)]
    pub pdf: bool,

    /// Also write analysis_report.txt
    #[arg(long)]
    pub text: bool,
}

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Listen address (default: from config)
    #[arg(short, long)]
    pub bind: Option<String>,
}

/// Arguments for the submit command.
#[derive(Args)]
pub struct SubmitArgs {
    /// Source file to submit
    pub file: PathBuf,

    /// Output format: html, json, text or pdf
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

fn wanted(path: &Path, all_languages: bool) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if all_languages {
        Language::supported_extensions()
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    } else {
        ext.eq_ignore_ascii_case("py")
    }
}

/// Collect source files under `root`, sorted.
pub fn collect_files(root: &Path, all_languages: bool) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !is_hidden(&name) && !name.starts_with(".venv") && !SKIPPED_DIRS.contains(&name.as_ref())
        })
    {
        let entry = entry?;
        if entry.file_type().is_file() && wanted(entry.path(), all_languages) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn report_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snippet".to_string())
}

/// `<stem>_report.html`
pub fn html_report_name(path: &Path) -> String {
    format!("{}_report.html", report_stem(path))
}

/// One HTML report name per result. A file whose name is already taken by an
/// earlier one (same stem, different directory) gets `<stem>_<n>_report.html`.
pub fn html_report_names(results: &[AnalysisResult]) -> Vec<String> {
    let mut taken = HashSet::new();
    results
        .iter()
        .map(|result| {
            let path = Path::new(&result.file);
            let mut name = html_report_name(path);
            let mut n = 1;
            while !taken.insert(name.clone()) {
                n += 1;
                name = format!("{}_{}_report.html", report_stem(path), n);
            }
            if n > 1 {
                tracing::warn!(
                    "{} has the same report name as an earlier file, writing {}",
                    result.file,
                    name
                );
            }
            name
        })
        .collect()
}

/// Where `submit` writes a report: `output` itself, or
/// `<output>/<stem>_report.<ext>` when `output` is a directory.
pub fn submit_output_path(output: &Path, file: &Path, format: Format) -> PathBuf {
    if output.is_dir() {
        output.join(format!("{}_report.{}", report_stem(file), format.extension()))
    } else {
        output.to_path_buf()
    }
}

fn write_report(dir: &Path, name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!("wrote {}", path.display());
    Ok(path)
}

/// Write every report for `results` into `dir`.
pub fn write_reports(
    dir: &Path,
    results: &[AnalysisResult],
    args: &AnalyzeArgs,
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let mut written = Vec::new();
    for (result, name) in results.iter().zip(html_report_names(results)) {
        let html = report::render(result, Format::Html)?;
        written.push(write_report(dir, &name, &html)?);
    }

    let json = report::render_all(results, Format::Json)?;
    written.push(write_report(dir, report::JSON_REPORT, &json)?);

    if args.pdf {
        let pdf = report::render_all(results, Format::Pdf)?;
        written.push(write_report(dir, report::PDF_REPORT, &pdf)?);
    }
    if args.text {
        let text = report::render_all(results, Format::Text)?;
        written.push(write_report(dir, report::TEXT_REPORT, &text)?);
    }

    Ok(written)
}

/// Run the analyze command.
pub async fn run_analyze(args: &AnalyzeArgs, config: &Config) -> anyhow::Result<i32> {
    let Some(path) = &args.path else {
        eprintln!("Error: no path given");
        eprintln!("Usage: codesage <PATH> [--output <DIR>]");
        return Ok(EXIT_ERROR);
    };

    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let files = if metadata.is_dir() {
        collect_files(path, args.all_languages)?
    } else if args.all_languages || wanted(path, false) {
        vec![path.clone()]
    } else {
        eprintln!(
            "Error: {} is not a Python file (use --all-languages for other languages)",
            path.display()
        );
        return Ok(EXIT_ERROR);
    };

    if files.is_empty() {
        eprintln!("Warning: no files to analyze");
        return Ok(EXIT_SUCCESS);
    }
    tracing::info!("analyzing {} file(s)", files.len());

    let analyzer = Analyzer::new(config.tools.clone());
    let mut results = Vec::with_capacity(files.len());
    for file in &files {
        match analyzer.analyze_file(file).await {
            Ok(result) => results.push(result),
            Err(e) => tracing::warn!("skipping: {}", e),
        }
    }

    if results.is_empty() {
        eprintln!("Error: none of the files could be read");
        return Ok(EXIT_ERROR);
    }

    let written = write_reports(&args.output, &results, args)?;

    pretty::write_summary(&path.display().to_string(), &results);
    println!(
        "  {} {} report file(s) in {}",
        "Wrote".dimmed(),
        written.len(),
        args.output.display()
    );
    println!();

    Ok(EXIT_SUCCESS)
}

/// Run the serve command.
pub async fn run_serve(args: &ServeArgs, config: &Config) -> anyhow::Result<i32> {
    let bind = args.bind.as_deref().unwrap_or(&config.bind);
    server::serve(config, bind).await?;
    Ok(EXIT_SUCCESS)
}

/// Run the submit command.
pub async fn run_submit(args: &SubmitArgs, config: &Config) -> anyhow::Result<i32> {
    let format: Format = match args.format.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if format == Format::Pdf && args.output.is_none() {
        eprintln!("Error: pdf output needs --output <FILE>");
        return Ok(EXIT_ERROR);
    }

    let code = match tokio::fs::read_to_string(&args.file).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", args.file.display(), e);
            return Ok(EXIT_ERROR);
        }
    };
    let request = AnalysisRequest::new(code, Some(args.file.to_string_lossy().into_owned()));

    let client = Client::from_config(config)?;
    tracing::info!("submitting {} to {}", args.file.display(), config.api_base);
    let result = match client.submit(&request).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let bytes = report::render(&result, format)?;
    match &args.output {
        Some(output) => {
            let path = submit_output_path(output, &args.file, format);
            std::fs::write(&path, &bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {} report to {}", format, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }

    Ok(EXIT_SUCCESS)
}

/// Run the tools command.
pub fn run_tools(config: &Config) -> anyhow::Result<i32> {
    println!("External tools:");
    println!();

    for (name, tool) in config.tools.entries() {
        let status = if !tool.enabled {
            "disabled".dimmed().to_string()
        } else {
            match which::which(&tool.program) {
                Ok(found) => format!("{} {}", "found".green(), found.display()),
                Err(_) => "missing".red().to_string(),
            }
        };
        println!(
            "  {:<10} {:<12} {:>4}s  {}",
            name, tool.program, tool.timeout_secs, status
        );
    }

    println!();
    println!("Configure programs and timeouts under `tools:` in codesage.yaml");

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_invocation_is_analyze() {
        let cli = Cli::try_parse_from(["codesage", "src", "-o", "out"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.analyze.path, Some(PathBuf::from("src")));
        assert_eq!(cli.analyze.output, PathBuf::from("out"));
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["codesage", "serve", "--bind", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Some(Commands::Serve(args)) => assert_eq!(args.bind.as_deref(), Some("0.0.0.0:9000")),
            _ => panic!("expected serve"),
        }

        let cli = Cli::try_parse_from(["codesage", "submit", "a.py", "--format", "json", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Submit(args)) => {
                assert_eq!(args.file, PathBuf::from("a.py"));
                assert_eq!(args.format, "json");
            }
            _ => panic!("expected submit"),
        }

        let cli = Cli::try_parse_from(["codesage", "analyze", "x.py", "--pdf"]).unwrap();
        match cli.command {
            Some(Commands::Analyze(args)) => {
                assert!(args.pdf);
                assert_eq!(args.output, PathBuf::from("reports"));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["codesage", "-v", "-q", "x.py"]).is_err());
    }

    #[test]
    fn test_collect_files_skips_noise() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        for dir in ["pkg", ".git", "node_modules", "venv", ".venv", "__pycache__"] {
            std::fs::create_dir_all(root.join(dir)).unwrap();
            std::fs::write(root.join(dir).join("mod.py"), "x = 1\n").unwrap();
        }
        std::fs::write(root.join("main.py"), "x = 1\n").unwrap();
        std::fs::write(root.join("app.js"), "let x = 1;\n").unwrap();
        std::fs::write(root.join("README.md"), "# hi\n").unwrap();

        let files = collect_files(root, false).unwrap();
        assert_eq!(files, vec![root.join("main.py"), root.join("pkg").join("mod.py")]);

        let files = collect_files(root, true).unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.contains(&root.join("app.js")));
    }

    #[test]
    fn test_html_report_name() {
        assert_eq!(html_report_name(Path::new("src/app/main.py")), "main_report.html");
        assert_eq!(html_report_name(Path::new("<submitted>")), "<submitted>_report.html");
    }

    #[test]
    fn test_html_report_names_do_not_collide() {
        let results = vec![
            AnalysisResult::new("python", "a/main.py"),
            AnalysisResult::new("python", "b/main.py"),
            AnalysisResult::new("python", "c/main_2.py"),
            AnalysisResult::new("python", "util.py"),
        ];
        assert_eq!(
            html_report_names(&results),
            vec![
                "main_report.html",
                "main_2_report.html",
                "main_2_2_report.html",
                "util_report.html",
            ]
        );
    }

    #[test]
    fn test_write_reports_keeps_same_named_files() {
        let temp = TempDir::new().unwrap();
        let results = vec![
            AnalysisResult::new("python", "a/main.py"),
            AnalysisResult::new("python", "b/main.py"),
        ];
        let args = AnalyzeArgs {
            path: None,
            output: temp.path().to_path_buf(),
            all_languages: false,
            pdf: false,
            text: false,
        };

        let written = write_reports(temp.path(), &results, &args).unwrap();
        assert_eq!(written.len(), 3);
        let first = std::fs::read_to_string(temp.path().join("main_report.html")).unwrap();
        let second = std::fs::read_to_string(temp.path().join("main_2_report.html")).unwrap();
        assert!(first.contains("a/main.py"));
        assert!(second.contains("b/main.py"));
    }

    #[test]
    fn test_submit_output_path() {
        let temp = TempDir::new().unwrap();
        assert_eq!(
            submit_output_path(temp.path(), Path::new("src/job.py"), Format::Json),
            temp.path().join("job_report.json")
        );
        assert_eq!(
            submit_output_path(temp.path(), Path::new("job.py"), Format::Text),
            temp.path().join("job_report.txt")
        );
        let file = temp.path().join("out.html");
        assert_eq!(submit_output_path(&file, Path::new("job.py"), Format::Html), file);
    }

    #[test]
    fn test_wanted_extensions() {
        assert!(wanted(Path::new("a.py"), false));
        assert!(wanted(Path::new("A.PY"), false));
        assert!(!wanted(Path::new("a.js"), false));
        assert!(wanted(Path::new("a.JS"), true));
        assert!(wanted(Path::new("lib.hpp"), true));
        assert!(!wanted(Path::new("notes.md"), true));
        assert!(!wanted(Path::new("Makefile"), true));
    }
}
