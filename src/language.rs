//! Language detection by file extension or source content.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Languages the pipeline knows how to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Python,
    JavaScript,
    Java,
    C,
    Cpp,
    Unknown,
}

impl Language {
    /// Lowercase tag used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Unknown => "unknown",
        }
    }

    /// Map a file extension (without dot, any case).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "py" | "pyw" | "pyi" => Some(Language::Python),
            "js" | "mjs" | "cjs" | "jsx" => Some(Language::JavaScript),
            "java" => Some(Language::Java),
            "c" | "h" => Some(Language::C),
            "cpp" | "cc" | "cxx" | "c++" | "hpp" | "hh" | "hxx" => Some(Language::Cpp),
            _ => None,
        }
    }

    /// Every extension `from_extension` recognizes.
    pub fn supported_extensions() -> &'static [&'static str] {
        &[
            "py", "pyw", "pyi", "js", "mjs", "cjs", "jsx", "java", "c", "h", "cpp", "cc", "cxx",
            "c++", "hpp", "hh", "hxx",
        ]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

static SHEBANG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#!.*\b(python[0-9.]*|node)\b").unwrap());

static JAVA_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(^\s*(public\s+)?(final\s+)?class\s+\w+|System\.out\.|^\s*import\s+java\.|^\s*package\s+[\w.]+;)")
        .unwrap()
});

static C_INCLUDE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*#\s*include\s*[<\x22]").unwrap());

static CPP_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(std::|iostream|\bnamespace\b|\bclass\s+\w+|template\s*<|\bcout\b|\bnew\s+\w+)").unwrap()
});

static JS_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(\bfunction\s*\w*\s*\(|\bconsole\.\w+|=>|\brequire\(|^\s*(const|let|var)\s+\w+\s*=|\bdocument\.)")
        .unwrap()
});

static PYTHON_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(^\s*def\s+\w+\s*\(|^\s*import\s+\w+\s*$|^\s*from\s+[\w.]+\s+import\s|\bprint\(|^\s*elif\b|^\s*class\s+\w+.*:\s*$)")
        .unwrap()
});

/// Detect the language of `code`.
///
/// A filename with a recognized extension wins. Otherwise the content is
/// sampled; when nothing matches the result is `Language::Unknown`.
pub fn detect(code: &str, filename: Option<&str>) -> Language {
    if let Some(lang) = filename.and_then(extension_language) {
        return lang;
    }
    guess_from_content(code)
}

fn extension_language(filename: &str) -> Option<Language> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Language::from_extension)
}

/// Best-effort content guess. Order matters: Java and C++ sources also
/// contain JavaScript-looking tokens.
pub fn guess_from_content(code: &str) -> Language {
    if let Some(caps) = SHEBANG.captures(code) {
        return if &caps[1] == "node" {
            Language::JavaScript
        } else {
            Language::Python
        };
    }

    if C_INCLUDE.is_match(code) {
        return if CPP_MARKERS.is_match(code) {
            Language::Cpp
        } else {
            Language::C
        };
    }

    if JAVA_MARKERS.is_match(code) && !PYTHON_MARKERS.is_match(code) {
        return Language::Java;
    }

    if PYTHON_MARKERS.is_match(code) {
        return Language::Python;
    }

    if JS_MARKERS.is_match(code) {
        return Language::JavaScript;
    }

    Language::Unknown
}
