//! Running external tools against a scoped temporary workspace.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tempfile::TempDir;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::ToolConfig;

/// Ways a tool invocation can fail before producing diagnostics.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0} not found on PATH")]
    NotFound(String),
    #[error("{tool} timed out after {secs}s")]
    Timeout { tool: String, secs: u64 },
    #[error("failed to run {tool}: {source}")]
    Io { tool: String, source: io::Error },
}

/// Captured output of a finished tool.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: Option<i32>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Diagnostic text, preferring stderr like compilers do.
    pub fn diagnostics(&self) -> &str {
        if self.stderr.trim().is_empty() {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

/// A temporary directory holding one source file.
///
/// The directory and everything the tool writes into it are removed when the
/// workspace is dropped, on every exit path.
pub struct Workspace {
    dir: TempDir,
    file: PathBuf,
}

impl Workspace {
    /// Write `code` to `<tempdir>/<file_name>`.
    pub fn create(file_name: &str, code: &str) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("codesage-").tempdir()?;
        let file = dir.path().join(file_name);
        std::fs::write(&file, code)?;
        Ok(Self { dir, file })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// Run `tool` with `args`, bounded by the tool's timeout.
///
/// The child is killed if the timeout elapses.
pub async fn run_tool(
    tool: &ToolConfig,
    args: &[&std::ffi::OsStr],
    cwd: &Path,
) -> Result<ToolOutput, ToolError> {
    tracing::debug!("running {} {:?}", tool.program, args);

    let mut cmd = Command::new(&tool.program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|e| spawn_error(&tool.program, e))?;

    let output = match timeout(tool.timeout(), child.wait_with_output()).await {
        Ok(result) => result.map_err(|source| ToolError::Io {
            tool: tool.program.clone(),
            source,
        })?,
        Err(_) => {
            return Err(ToolError::Timeout {
                tool: tool.program.clone(),
                secs: tool.timeout_secs,
            })
        }
    };

    Ok(ToolOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        status: output.status.code(),
    })
}

fn spawn_error(program: &str, e: io::Error) -> ToolError {
    if e.kind() == io::ErrorKind::NotFound {
        ToolError::NotFound(program.to_string())
    } else {
        ToolError::Io {
            tool: program.to_string(),
            source: e,
        }
    }
}

/// Whether `program` resolves on PATH.
pub fn is_available(program: &str) -> bool {
    which::which(program).is_ok()
}
