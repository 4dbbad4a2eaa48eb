//! JSON extraction from LLM responses.
//!
//! The judge requests a strict-JSON verdict, but models still wrap objects
//! in markdown fences or surround them with commentary. Extraction tries,
//! in order: direct JSON, JSON inside a code block, and brace matching
//! anywhere in the content (string-literal aware).

/// Extracts the first complete JSON object from a response.
///
/// Returns `None` when no balanced object is found; a truncated object
/// (opened but never closed) also yields `None`.
pub fn extract_json_object(content: &str) -> Option<String> {
    let trimmed = content.trim();

    // Direct JSON
    if trimmed.starts_with('{') {
        if let Some(json) = match_balanced_object(trimmed) {
            return Some(json);
        }
    }

    // JSON inside a code block
    if let Some(block) = extract_code_block(trimmed) {
        if let Some(start) = block.find('{') {
            if let Some(json) = match_balanced_object(&block[start..]) {
                return Some(json);
            }
        }
    }

    // Brace matching anywhere in the content
    let start = trimmed.find('{')?;
    match_balanced_object(&trimmed[start..])
}

/// Returns the body of the first fenced code block, if any.
fn extract_code_block(content: &str) -> Option<&str> {
    let open = content.find("```")?;
    let after_fence = &content[open + 3..];
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(&body[..close])
}

/// Scans from a leading `{` and returns the balanced object, tracking
/// string literals and escapes so braces inside strings do not count.
fn match_balanced_object(content: &str) -> Option<String> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in content.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(content[..=idx].to_string());
                }
            }
            _ => {}
        }
    }

    None
}
