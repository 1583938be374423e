//! JavaScript adapter - eslint with JSON output.

use std::ffi::OsStr;

use super::{
    run_tool, scrub_paths, tool_failure, workspace_failure, workspace_file_name, AdapterOutput,
    RawDiagnostics, Workspace,
};
use crate::config::ToolsConfig;
use crate::types::{Issue, IssueKind};

const INSTALL_HINT: &str = "Install eslint (npm install -g eslint) for JavaScript diagnostics.";

pub(super) async fn analyze(code: &str, path: &str, tools: &ToolsConfig) -> AdapterOutput {
    let ws = match Workspace::create(
        &workspace_file_name(path, "snippet", &["js", "mjs", "cjs", "jsx"]),
        code,
    ) {
        Ok(ws) => ws,
        Err(e) => return AdapterOutput::single(workspace_failure(&e, path)),
    };

    let args = [OsStr::new("-f"), OsStr::new("json"), ws.file().as_os_str()];
    let out = match run_tool(&tools.eslint, &args, ws.dir()).await {
        Ok(out) => out,
        Err(e) => return AdapterOutput::single(tool_failure(&e, path, INSTALL_HINT)),
    };

    if out.stdout.trim().is_empty() {
        if out.success() {
            return AdapterOutput::default();
        }
        // eslint itself failed (bad config, crash) before reporting anything
        let reason = out
            .stderr
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("no output");
        return AdapterOutput::single(Issue::unlocated(
            IssueKind::Error,
            format!("eslint failed: {}", scrub_paths(reason, &ws, path)),
            path,
        ));
    }

    AdapterOutput {
        raw: vec![RawDiagnostics::Eslint(out.stdout)],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolConfig;

    #[tokio::test]
    async fn test_missing_eslint() {
        let tools = ToolsConfig {
            eslint: ToolConfig::new("codesage-missing-eslint", 5),
            ..ToolsConfig::default()
        };
        let out = analyze("function x() { console.log('hi' ", "a.js", &tools).await;
        assert!(out.complexity.is_empty());
        match &out.raw[..] {
            [RawDiagnostics::Issues(issues)] => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].kind, IssueKind::ToolMissing);
                assert!(issues[0].message.contains("codesage-missing-eslint"));
            }
            other => panic!("unexpected raw output {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hanging_eslint_times_out_and_cleans_up() {
        use std::os::unix::fs::PermissionsExt;

        // Stand-in linter: records its working directory, then hangs
        let bin = tempfile::tempdir().unwrap();
        let marker = bin.path().join("cwd.txt");
        let script = bin.path().join("slow-eslint");
        std::fs::write(
            &script,
            format!("#!/bin/sh\npwd > '{}'\nexec sleep 5\n", marker.display()),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let tools = ToolsConfig {
            eslint: ToolConfig::new(&script.to_string_lossy(), 1),
            ..ToolsConfig::default()
        };
        let out = analyze("let x = 1;\n", "a.js", &tools).await;
        match &out.raw[..] {
            [RawDiagnostics::Issues(issues)] => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].kind, IssueKind::Error);
                assert!(issues[0].message.contains("timed out after 1s"));
                assert_eq!(issues[0].path, "a.js");
            }
            other => panic!("unexpected raw output {:?}", other),
        }

        let workspace = std::fs::read_to_string(&marker).unwrap();
        let workspace = std::path::Path::new(workspace.trim());
        assert!(workspace
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("codesage-")));
        assert!(!workspace.exists());
    }
}
