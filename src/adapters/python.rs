//! Python adapter - in-process syntax check and metrics, then pylint.
//!
//! pylint is optional here: when it is missing or fails the result simply
//! carries no lint issues.

use std::ffi::OsStr;

use super::{run_tool, workspace_file_name, AdapterOutput, RawDiagnostics, Workspace};
use crate::config::ToolsConfig;
use crate::parser::{self, PythonCheck};
use crate::types::{Issue, IssueKind};

pub(super) async fn analyze(code: &str, path: &str, tools: &ToolsConfig) -> AdapterOutput {
    let mut output = AdapterOutput::default();

    match parser::check_python(code) {
        Ok(PythonCheck::SyntaxError(fault)) => {
            // Unparseable source: no linting, no metrics
            return AdapterOutput::single(
                Issue::unlocated(IssueKind::SyntaxError, fault.message, path)
                    .at(Some(fault.line), Some(fault.column)),
            );
        }
        Ok(PythonCheck::Parsed(metrics)) => {
            output.complexity = metrics.complexity;
            output.maintainability = metrics.maintainability;
        }
        Err(e) => {
            tracing::warn!("python metrics unavailable for {}: {}", path, e);
        }
    }

    if !tools.pylint.enabled {
        return output;
    }

    let ws = match Workspace::create(&workspace_file_name(path, "snippet", &["py", "pyw"]), code) {
        Ok(ws) => ws,
        Err(e) => {
            tracing::debug!("pylint skipped, no workspace: {}", e);
            return output;
        }
    };

    let args = [OsStr::new("--output-format=json"), ws.file().as_os_str()];
    match run_tool(&tools.pylint, &args, ws.dir()).await {
        Ok(out) => {
            // pylint's exit status is a bit mask of message categories
            if !out.stdout.trim().is_empty() {
                output.raw.push(RawDiagnostics::Pylint(out.stdout));
            }
        }
        Err(e) => tracing::debug!("pylint skipped: {}", e),
    }

    output
}
