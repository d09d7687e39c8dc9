//! Structural extraction from Markdown and MDX text.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Language reported for fences that carry no tag.
pub const DEFAULT_LANGUAGE: &str = "plaintext";

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+(.*\S)").expect("heading pattern is valid"));

// Non-greedy: a block ends at the first closing fence after it opens.
static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(\w+)?\r?\n(.*?)```").expect("code fence pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeExample {
    pub language: String,
    pub code: String,
}

/// Heading text of every `#`..`######` line, in document order. Levels are
/// flattened.
pub fn extract_headings(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| HEADING_RE.captures(line))
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

/// Every fenced code block in `content`. An opening fence with no closing
/// fence after it produces nothing.
pub fn extract_code_examples(content: &str) -> Vec<CodeExample> {
    CODE_FENCE_RE
        .captures_iter(content)
        .map(|caps| CodeExample {
            language: caps
                .get(1)
                .map_or(DEFAULT_LANGUAGE, |m| m.as_str())
                .to_string(),
            code: caps[2].trim().to_string(),
        })
        .collect()
}
