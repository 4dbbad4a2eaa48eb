//! Helpers for cleaning generated source code.
//!
//! LLM responses frequently wrap code in markdown fences despite prompt
//! instructions; every solver stage strips them before writing the source
//! to disk.

use std::sync::OnceLock;

use regex::Regex;

fn fence_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^```[A-Za-z0-9_+\-]*[ \t]*$").expect("valid regex"))
}

/// Removes a surrounding markdown code fence from a response, if present.
///
/// Handles both language-tagged (```` ```python ````) and bare fences. Text
/// without a leading fence is returned trimmed but otherwise unchanged.
pub fn strip_code_fences(content: &str) -> String {
    let trimmed = content.trim();
    let mut lines: Vec<&str> = trimmed.lines().collect();

    if lines.first().is_some_and(|l| fence_open().is_match(l)) {
        lines.remove(0);
        if lines.last().is_some_and(|l| l.trim() == "```") {
            lines.pop();
        }
        return lines.join("\n").trim().to_string();
    }

    trimmed.to_string()
}

/// Heuristic check that a response resembles runnable script source rather
/// than prose or markdown.
///
/// Accepts shebang lines, so candidates for non-Python interpreters pass as
/// long as they declare themselves.
pub fn looks_like_code(code: &str) -> bool {
    let stripped = code.trim_start();
    if stripped.is_empty() {
        return false;
    }

    const KEYWORDS: [&str; 10] = [
        "import ", "from ", "def ", "class ", "#!", "@", "for ", "while ", "if ", "print(",
    ];
    if KEYWORDS.iter().any(|k| stripped.starts_with(k)) {
        return true;
    }

    let first_line = stripped.lines().next().unwrap_or("").trim();
    ["print", "if", "for", "while", "def", "class"]
        .iter()
        .any(|k| first_line.starts_with(k))
}
