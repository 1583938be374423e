//! C/C++ adapter - compiler syntax check, optionally followed by cppcheck.

use std::ffi::OsStr;

use super::{
    is_available, run_tool, scrub_paths, tool_failure, workspace_failure, workspace_file_name,
    AdapterOutput, CppDialect, RawDiagnostics, Workspace,
};
use crate::config::ToolsConfig;

const INSTALL_HINT: &str = "Install a C/C++ compiler for C/C++ diagnostics.";

pub(super) async fn analyze(
    dialect: CppDialect,
    code: &str,
    path: &str,
    tools: &ToolsConfig,
) -> AdapterOutput {
    let (compiler, file_name) = match dialect {
        CppDialect::C => (&tools.gcc, workspace_file_name(path, "snippet", &["c", "h"])),
        CppDialect::Cpp => (
            &tools.gxx,
            workspace_file_name(path, "snippet", &["cpp", "cc", "cxx", "hpp", "hh", "hxx"]),
        ),
    };

    let ws = match Workspace::create(&file_name, code) {
        Ok(ws) => ws,
        Err(e) => return AdapterOutput::single(workspace_failure(&e, path)),
    };

    let args = [OsStr::new("-fsyntax-only"), ws.file().as_os_str()];
    let out = match run_tool(compiler, &args, ws.dir()).await {
        Ok(out) => out,
        Err(e) => return AdapterOutput::single(tool_failure(&e, path, INSTALL_HINT)),
    };

    let mut output = AdapterOutput::default();
    let text = out.diagnostics();
    if !text.trim().is_empty() {
        output
            .raw
            .push(RawDiagnostics::CompilerText(scrub_paths(text, &ws, path)));
    }

    if tools.cppcheck.enabled && is_available(&tools.cppcheck.program) {
        let args = [
            OsStr::new("--enable=all"),
            OsStr::new("--template=gcc"),
            OsStr::new("--quiet"),
            ws.file().as_os_str(),
        ];
        match run_tool(&tools.cppcheck, &args, ws.dir()).await {
            Ok(out) => {
                let text = out.diagnostics();
                if !text.trim().is_empty() {
                    output
                        .raw
                        .push(RawDiagnostics::CompilerText(scrub_paths(text, &ws, path)));
                }
            }
            Err(e) => tracing::debug!("cppcheck skipped: {}", e),
        }
    }

    output
}
