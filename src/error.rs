use rmcp::model::{Content, IntoContents};
use thiserror::Error;

/// Failures surfaced while resolving a document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocError {
    /// The key is not part of the catalog. This is a caller mistake.
    #[error("Documentation not found: {0}")]
    UnknownKey(String),

    /// A local documentation file does not exist.
    #[error("Documentation file not found: {0}")]
    NotFound(String),

    /// Remote request failed, timed out, or returned a non-success status.
    #[error("Failed to fetch documentation: {location} - {reason}")]
    FetchFailed { location: String, reason: String },
}

impl DocError {
    pub fn fetch_failed(location: impl ToString, reason: impl ToString) -> Self {
        Self::FetchFailed {
            location: location.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Renders the error the way tool results report failures.
impl IntoContents for DocError {
    fn into_contents(self) -> Vec<Content> {
        vec![Content::text(format!("Error: {}", self))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DocError::UnknownKey("usage".to_string()).to_string(),
            "Documentation not found: usage"
        );
        assert_eq!(
            DocError::fetch_failed("https://example.com/a.md", "HTTP status 404 Not Found").to_string(),
            "Failed to fetch documentation: https://example.com/a.md - HTTP status 404 Not Found"
        );
    }

    #[test]
    fn test_into_contents_prefixes_error() {
        let contents = DocError::NotFound("guides/missing.md".to_string()).into_contents();
        assert_eq!(contents.len(), 1);
        let text = contents[0].as_text().unwrap().text.clone();
        assert_eq!(text, "Error: Documentation file not found: guides/missing.md");
    }
}
