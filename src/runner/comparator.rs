//! Textual output comparison.
//!
//! Verdicts use exact string matching that is invariant to trailing
//! whitespace only: trailing whitespace on each line and trailing blank
//! lines are ignored, any other difference is a non-match.

use std::path::Path;

/// Compares candidate output against expected output.
#[derive(Debug, Clone, Default)]
pub struct OutputComparator;

impl OutputComparator {
    /// Creates a new comparator.
    pub fn new() -> Self {
        Self
    }

    /// Returns true when the two texts match after normalization.
    pub fn matches(&self, expected: &str, actual: &str) -> bool {
        normalize(expected) == normalize(actual)
    }

    /// File-based variant of [`matches`](Self::matches).
    pub fn matches_files(&self, expected: &Path, actual: &Path) -> std::io::Result<bool> {
        let expected = std::fs::read_to_string(expected)?;
        let actual = std::fs::read_to_string(actual)?;
        Ok(self.matches(&expected, &actual))
    }

    /// Summarizes the first difference for feedback prompts.
    ///
    /// Returns `None` when the texts match.
    pub fn diff_summary(&self, expected: &str, actual: &str) -> Option<String> {
        let expected_lines = normalize(expected);
        let actual_lines = normalize(actual);

        if expected_lines == actual_lines {
            return None;
        }

        for (idx, (exp, act)) in expected_lines.iter().zip(actual_lines.iter()).enumerate() {
            if exp != act {
                return Some(format!(
                    "first mismatch at line {}: expected '{}', got '{}'",
                    idx + 1,
                    exp,
                    act
                ));
            }
        }

        Some(format!(
            "line count mismatch: expected {} lines, got {}",
            expected_lines.len(),
            actual_lines.len()
        ))
    }

    /// File-based variant of [`diff_summary`](Self::diff_summary).
    pub fn diff_summary_files(
        &self,
        expected: &Path,
        actual: &Path,
    ) -> std::io::Result<Option<String>> {
        let expected = std::fs::read_to_string(expected)?;
        let actual = std::fs::read_to_string(actual)?;
        Ok(self.diff_summary(&expected, &actual))
    }
}

/// Strips trailing whitespace per line and drops trailing blank lines.
fn normalize(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.lines().map(|l| l.trim_end()).collect();
    while lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let cmp = OutputComparator::new();
        assert!(cmp.matches("4\n7\n", "4\n7\n"));
    }

    #[test]
    fn test_trailing_newline_insensitive() {
        let cmp = OutputComparator::new();
        assert!(cmp.matches("4\n", "4"));
        assert!(cmp.matches("4", "4\n\n"));
    }

    #[test]
    fn test_trailing_whitespace_per_line_insensitive() {
        let cmp = OutputComparator::new();
        assert!(cmp.matches("4  \n7\t\n", "4\n7\n"));
    }

    #[test]
    fn test_leading_whitespace_is_significant() {
        let cmp = OutputComparator::new();
        assert!(!cmp.matches("4", "  4"));
    }

    #[test]
    fn test_interior_blank_lines_are_significant() {
        let cmp = OutputComparator::new();
        assert!(!cmp.matches("4\n\n7", "4\n7"));
    }

    #[test]
    fn test_any_other_difference_is_a_mismatch() {
        let cmp = OutputComparator::new();
        assert!(!cmp.matches("4", "5"));
        assert!(!cmp.matches("4 5", "45"));
    }

    #[test]
    fn test_diff_summary_reports_first_mismatch() {
        let cmp = OutputComparator::new();
        let diff = cmp.diff_summary("1\n2\n3", "1\n9\n3").unwrap();
        assert!(diff.contains("line 2"));
        assert!(diff.contains("'2'"));
        assert!(diff.contains("'9'"));
    }

    #[test]
    fn test_diff_summary_reports_line_count() {
        let cmp = OutputComparator::new();
        let diff = cmp.diff_summary("1\n2", "1\n2\n3").unwrap();
        assert!(diff.contains("expected 2 lines, got 3"));
    }

    #[test]
    fn test_diff_summary_none_on_match() {
        let cmp = OutputComparator::new();
        assert!(cmp.diff_summary("4 \n", "4").is_none());
    }
}
