//! Substring search across every document in the catalog.
//!
//! Relevance is the raw number of non-overlapping, case-insensitive
//! occurrences of the query. Search is best-effort: a document that fails to
//! resolve is logged and left out of the results instead of failing the whole
//! query.

use serde::Serialize;

use crate::markdown::extract_code_examples;
use crate::retrieval::Retriever;

/// Characters of context kept before the first match.
pub const SNIPPET_BEFORE: usize = 100;
/// Characters of context kept after the start of the first match.
pub const SNIPPET_AFTER: usize = 200;
/// Longest code sample returned by code search before truncation.
pub const MAX_CODE_CHARS: usize = 300;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub key: String,
    pub location: String,
    pub snippet: String,
    pub match_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSearchResult {
    pub key: String,
    /// 1-based position of the example within its document.
    pub example_number: usize,
    pub language: String,
    pub code: String,
}

/// Ranks every catalog document containing `query`, most matches first.
/// Documents with equal counts keep catalog order. Whitespace is matched
/// literally like any other text; only the empty query matches nothing.
pub async fn search(retriever: &Retriever, query: &str) -> Vec<SearchResult> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();
    for entry in retriever.catalog().entries() {
        let content = match retriever.resolve(&entry.key).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Error searching {}: {}", entry.path, e);
                continue;
            }
        };

        let haystack = content.to_lowercase();
        let Some(first) = haystack.find(&needle) else {
            continue;
        };

        results.push(SearchResult {
            key: entry.key.clone(),
            location: entry.path.clone(),
            snippet: snippet_around(&content, &haystack, first),
            match_count: haystack.matches(&needle).count(),
        });
    }

    results.sort_by(|a, b| b.match_count.cmp(&a.match_count));
    results
}

/// Code examples whose code contains `query`, in catalog then document order.
pub async fn search_code_examples(retriever: &Retriever, query: &str) -> Vec<CodeSearchResult> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();
    for entry in retriever.catalog().entries() {
        let content = match retriever.resolve(&entry.key).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Error searching code in {}: {}", entry.path, e);
                continue;
            }
        };

        for (index, example) in extract_code_examples(&content).into_iter().enumerate() {
            if example.code.to_lowercase().contains(&needle) {
                results.push(CodeSearchResult {
                    key: entry.key.clone(),
                    example_number: index + 1,
                    language: example.language,
                    code: truncate_chars(&example.code, MAX_CODE_CHARS),
                });
            }
        }
    }
    results
}

/// Window of `content` from `SNIPPET_BEFORE` characters before the first
/// match to `SNIPPET_AFTER` characters after its start, wrapped in ellipses.
///
/// `match_byte` is a byte offset into `lowered`, the lower-cased copy of
/// `content`; it is converted to a character offset before windowing the
/// original text.
fn snippet_around(content: &str, lowered: &str, match_byte: usize) -> String {
    let match_char = lowered[..match_byte].chars().count();
    let start = match_char.saturating_sub(SNIPPET_BEFORE);
    let end = match_char + SNIPPET_AFTER;

    let window: String = content.chars().skip(start).take(end - start).collect();
    format!("{ELLIPSIS}{window}{ELLIPSIS}")
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocError;
    use crate::retrieval::tests::{StubSource, catalog_of};
    use std::sync::Arc;

    fn retriever_over(docs: &[(&str, &str)]) -> Retriever {
        let keys: Vec<&str> = docs.iter().map(|(key, _)| *key).collect();
        let files: Vec<(String, String)> = docs
            .iter()
            .map(|(key, body)| (format!("{}.md", key), body.to_string()))
            .collect();
        let source = StubSource::new(files.iter().map(|(name, body)| (name.as_str(), body.as_str())));
        Retriever::with_ttl_cache(catalog_of(&keys, None), Arc::new(source))
    }

    fn ranking(results: &[SearchResult]) -> Vec<(&str, usize)> {
        results
            .iter()
            .map(|result| (result.key.as_str(), result.match_count))
            .collect()
    }

    #[tokio::test]
    async fn test_search_ranks_by_match_count() {
        let retriever = retriever_over(&[("a", "a cat sat"), ("b", "no match"), ("c", "cat cat")]);

        let results = search(&retriever, "cat").await;
        assert_eq!(ranking(&results), vec![("c", 2), ("a", 1)]);
        assert_eq!(results[0].location, "c.md");
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let retriever = retriever_over(&[("a", "a Cat sat"), ("b", "no match"), ("c", "CAT cat")]);

        let lower = search(&retriever, "cat").await;
        let upper = search(&retriever, "CAT").await;
        assert_eq!(ranking(&lower), ranking(&upper));
        assert_eq!(ranking(&upper), vec![("c", 2), ("a", 1)]);
    }

    #[tokio::test]
    async fn test_search_ties_keep_catalog_order() {
        let retriever = retriever_over(&[("x", "dog"), ("y", "dog dog"), ("z", "dog")]);

        let results = search(&retriever, "dog").await;
        assert_eq!(ranking(&results), vec![("y", 2), ("x", 1), ("z", 1)]);
    }

    #[tokio::test]
    async fn test_search_counts_non_overlapping() {
        let retriever = retriever_over(&[("a", "aaaa")]);
        let results = search(&retriever, "aa").await;
        assert_eq!(results[0].match_count, 2);
    }

    #[tokio::test]
    async fn test_search_skips_failing_documents() {
        let keys = ["ok", "broken", "missing"];
        let source = StubSource::new([("ok.md", "find me")]);
        source.put(
            "broken.md",
            Err(DocError::fetch_failed("/docs/broken.md", "timed out")),
        );
        let retriever = Retriever::with_ttl_cache(catalog_of(&keys, None), Arc::new(source));

        let results = search(&retriever, "find").await;
        assert_eq!(ranking(&results), vec![("ok", 1)]);
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let retriever = retriever_over(&[("a", "anything")]);
        assert!(search(&retriever, "").await.is_empty());
        assert!(search_code_examples(&retriever, "").await.is_empty());
    }

    #[tokio::test]
    async fn test_search_whitespace_query_matches_literally() {
        let retriever = retriever_over(&[("a", "a cat sat"), ("b", "nomatch")]);

        let results = search(&retriever, " ").await;
        assert_eq!(ranking(&results), vec![("a", 2)]);
        assert_eq!(results[0].snippet, "...a cat sat...");
    }

    #[tokio::test]
    async fn test_search_code_examples_whitespace_query() {
        let retriever = retriever_over(&[("a", "```\nprint(1)\n```\n```\nlet x = 1;\n```")]);

        let results = search_code_examples(&retriever, " ").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].example_number, 2);
        assert_eq!(results[0].code, "let x = 1;");
    }

    #[tokio::test]
    async fn test_snippet_window() {
        let mut doc = "x".repeat(300);
        doc.push_str("needle");
        doc.push_str(&"y".repeat(194));
        assert_eq!(doc.chars().count(), 500);

        let retriever = retriever_over(&[("long", doc.as_str())]);
        let results = search(&retriever, "needle").await;

        let expected = format!("...{}...", &doc[200..500]);
        assert_eq!(results[0].snippet, expected);
    }

    #[test]
    fn test_snippet_clipped_at_start() {
        let content = "Start with Match then some text";
        let lowered = content.to_lowercase();
        let at = lowered.find("match").unwrap();
        assert_eq!(snippet_around(content, &lowered, at), format!("...{}...", content));
    }

    #[test]
    fn test_snippet_counts_characters() {
        let content = format!("{}target", "é".repeat(150));
        let lowered = content.to_lowercase();
        let at = lowered.find("target").unwrap();

        let snippet = snippet_around(&content, &lowered, at);
        let expected = format!("...{}target...", "é".repeat(100));
        assert_eq!(snippet, expected);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 300), "short");
        let long = "a".repeat(301);
        assert_eq!(truncate_chars(&long, 300), format!("{}...", "a".repeat(300)));
        assert_eq!(truncate_chars(&"a".repeat(300), 300), "a".repeat(300));
    }

    #[tokio::test]
    async fn test_search_code_examples() {
        let first = "Intro\n```ts\nconst part = new Instance(\"Part\");\n```\n```lua\nprint(1)\n```";
        let second = "```ts\nprint(\"instance\")\n```";
        let retriever = retriever_over(&[("one", first), ("two", second), ("three", "no code")]);

        let results = search_code_examples(&retriever, "INSTANCE").await;
        assert_eq!(
            results,
            vec![
                CodeSearchResult {
                    key: "one".to_string(),
                    example_number: 1,
                    language: "ts".to_string(),
                    code: "const part = new Instance(\"Part\");".to_string(),
                },
                CodeSearchResult {
                    key: "two".to_string(),
                    example_number: 1,
                    language: "ts".to_string(),
                    code: "print(\"instance\")".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_search_code_examples_ignores_prose_and_truncates() {
        let body = format!("match in prose\n```\n{}match\n```", "z".repeat(400));
        let retriever = retriever_over(&[("doc", body.as_str())]);

        let results = search_code_examples(&retriever, "match").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].language, "plaintext");
        assert_eq!(results[0].code, format!("{}...", "z".repeat(300)));

        assert!(search_code_examples(&retriever, "prose").await.is_empty());
    }
}
