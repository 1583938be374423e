//! Java adapter - compile with javac and keep its diagnostics.

use std::ffi::OsStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{
    run_tool, scrub_paths, tool_failure, workspace_failure, AdapterOutput, RawDiagnostics,
    Workspace,
};
use crate::config::ToolsConfig;

const INSTALL_HINT: &str = "Install a JDK for Java diagnostics.";

static PUBLIC_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bpublic\s+(?:(?:abstract|final|sealed|static|strictfp)\s+)*(?:class|interface|enum|record)\s+([A-Za-z_$][A-Za-z0-9_$]*)")
        .unwrap()
});

/// javac requires a public type to live in `<Type>.java`.
fn java_file_name(code: &str) -> String {
    PUBLIC_TYPE
        .captures(code)
        .map(|c| format!("{}.java", &c[1]))
        .unwrap_or_else(|| "Main.java".to_string())
}

pub(super) async fn analyze(code: &str, path: &str, tools: &ToolsConfig) -> AdapterOutput {
    let ws = match Workspace::create(&java_file_name(code), code) {
        Ok(ws) => ws,
        Err(e) => return AdapterOutput::single(workspace_failure(&e, path)),
    };

    // Class files go into the workspace so nothing outlives it
    let args = [OsStr::new("-d"), ws.dir().as_os_str(), ws.file().as_os_str()];
    let out = match run_tool(&tools.javac, &args, ws.dir()).await {
        Ok(out) => out,
        Err(e) => return AdapterOutput::single(tool_failure(&e, path, INSTALL_HINT)),
    };

    let text = out.diagnostics();
    if text.trim().is_empty() {
        return AdapterOutput::default();
    }
    AdapterOutput {
        raw: vec![RawDiagnostics::CompilerText(scrub_paths(text, &ws, path))],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolConfig;
    use crate::types::IssueKind;

    #[test]
    fn test_java_file_name() {
        assert_eq!(
            java_file_name("public class Test { public static void main(String[] a) {} }"),
            "Test.java"
        );
        assert_eq!(
            java_file_name("public final class Util {}"),
            "Util.java"
        );
        assert_eq!(java_file_name("class Hidden {}"), "Main.java");
    }

    #[tokio::test]
    async fn test_missing_javac() {
        let tools = ToolsConfig {
            javac: ToolConfig::new("codesage-missing-javac", 5),
            ..ToolsConfig::default()
        };
        let out = analyze("public class Test {}", "Test.java", &tools).await;
        match &out.raw[..] {
            [RawDiagnostics::Issues(issues)] => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].kind, IssueKind::ToolMissing);
                assert_eq!(issues[0].path, "Test.java");
            }
            other => panic!("unexpected raw output {:?}", other),
        }
    }
}
