//! Text cleanup for extracted page and element text.
//!
//! Composes to NFC, unifies line endings, collapses runs of spaces and tabs,
//! and trims every line.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse multiple whitespace characters into one.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());

/// Collapses every whitespace run, including newlines.
static ANY_WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Whether to preserve original line breaks.
    preserve_line_breaks: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    /// Normalizer that keeps line breaks.
    pub fn new() -> Self {
        Self {
            preserve_line_breaks: true,
        }
    }

    /// Set whether to preserve original line breaks.
    pub fn with_preserve_line_breaks(mut self, preserve: bool) -> Self {
        self.preserve_line_breaks = preserve;
        self
    }

    /// Normalize a block of text.
    ///
    /// With line breaks preserved, blank lines are dropped; otherwise the
    /// result is a single line.
    pub fn normalize(&self, text: &str) -> String {
        let composed: String = text.nfc().collect();
        let unified = composed.replace("\r\n", "\n").replace('\r', "\n");

        if self.preserve_line_breaks {
            unified
                .lines()
                .map(|line| WHITESPACE_COLLAPSE_REGEX.replace_all(line, " ").trim().to_string())
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            ANY_WHITESPACE_REGEX.replace_all(&unified, " ").trim().to_string()
        }
    }

    /// Normalized non-empty lines.
    pub fn normalize_to_lines(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .lines()
            .map(str::to_string)
            .filter(|l| !l.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_breaks_preserved() {
        let normalizer = TextNormalizer::new();
        assert_eq!(
            normalizer.normalize("  Hello   world \r\n\r\n\tSecond\tline  \r"),
            "Hello world\nSecond line"
        );
    }

    #[test]
    fn test_single_line() {
        let normalizer = TextNormalizer::new().with_preserve_line_breaks(false);
        assert_eq!(normalizer.normalize(" a \n  b\tc "), "a b c");
    }

    #[test]
    fn test_nfc_composition() {
        // Hangul jamo sequence composes to a single syllable.
        let decomposed = "\u{1112}\u{1161}\u{11AB}";
        assert_eq!(TextNormalizer::new().normalize(decomposed), "한");
        assert_eq!(TextNormalizer::new().normalize("e\u{301}"), "é");
    }

    #[test]
    fn test_normalize_to_lines() {
        let lines = TextNormalizer::new().normalize_to_lines("one\n\n two \n");
        assert_eq!(lines, vec!["one", "two"]);
    }
}
