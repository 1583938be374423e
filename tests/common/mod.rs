//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use codesage::config::{ToolConfig, ToolsConfig};

pub fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

/// Tool config whose programs cannot exist on any PATH.
pub fn offline_tools() -> ToolsConfig {
    ToolsConfig {
        pylint: ToolConfig::new("codesage-missing-pylint", 5),
        eslint: ToolConfig::new("codesage-missing-eslint", 5),
        javac: ToolConfig::new("codesage-missing-javac", 5),
        gxx: ToolConfig::new("codesage-missing-gxx", 5),
        gcc: ToolConfig::new("codesage-missing-gcc", 5),
        cppcheck: ToolConfig::new("codesage-missing-cppcheck", 5),
    }
}
