//! Documentation catalog MCP implementation.
//!
//! This module exposes the retrieval and search core as MCP tools. Each tool
//! resolves documents through the shared [`Retriever`] and renders the result
//! as Markdown text.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use docsearch_mcp::catalog::Catalog;
//! use docsearch_mcp::mcp::DocServer;
//! use docsearch_mcp::retrieval::Retriever;
//! use docsearch_mcp::source::LocationSource;
//!
//! fn example() -> anyhow::Result<()> {
//!     let catalog = Arc::new(Catalog::builtin()?);
//!     let source = Arc::new(LocationSource::new()?);
//!     let server = DocServer::new(Arc::new(Retriever::with_ttl_cache(catalog, source)));
//!     Ok(())
//! }
//! ```

use rmcp::model::{Implementation, ProtocolVersion, ServerCapabilities};
use rmcp::{ServerHandler, model::ServerInfo, schemars, tool};
use std::fmt::Write;
use std::sync::Arc;

use crate::catalog::capitalize;
use crate::error::DocError;
use crate::markdown::{self, CodeExample};
use crate::retrieval::Retriever;
use crate::search::{self, CodeSearchResult, SearchResult};

/// MCP server handler serving one documentation catalog.
#[derive(Clone)]
pub struct DocServer {
    retriever: Arc<Retriever>,
}

#[tool(tool_box)]
impl DocServer {
    pub fn new(retriever: Arc<Retriever>) -> Self {
        Self { retriever }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Returns the full content of a document.
    #[tool(description = "Fetch specific documentation content by key")]
    pub async fn get_documentation(
        &self,
        #[tool(param)]
        #[schemars(description = "Key of the documentation")]
        doc_key: String,
    ) -> Result<String, DocError> {
        let content = self.retriever.resolve(&doc_key).await?;
        let path = &self.retriever.catalog().get(&doc_key)?.path;
        Ok(format!("# {}\n\nPath: {}\n\n{}", doc_key, path, content))
    }

    #[tool(description = "Search documentation for specific topics or keywords")]
    pub async fn search_documentation(
        &self,
        #[tool(param)]
        #[schemars(description = "Search query to find in documentation")]
        query: String,
    ) -> String {
        let results = search::search(&self.retriever, &query).await;
        render_search_results(&query, &results)
    }

    #[tool(description = "List all available documentation pages with metadata")]
    pub async fn list_documentation(&self) -> String {
        let catalog = self.retriever.catalog();
        let mut output = format!("# Available {} Documentation\n\n", catalog.name());

        for (category, entries) in catalog.grouped_by_category() {
            let _ = writeln!(output, "## {}\n", capitalize(category));
            for entry in entries {
                let _ = writeln!(output, "- **{}** (`{}`)", entry.title, entry.key);
                let _ = writeln!(output, "  Path: {}", entry.path);
                let _ = writeln!(
                    output,
                    "  {} documentation: {}\n",
                    catalog.name(),
                    entry.title
                );
            }
        }
        output
    }

    #[tool(description = "Extract code examples from a specific documentation page")]
    pub async fn extract_code_examples(
        &self,
        #[tool(param)]
        #[schemars(description = "Key of the documentation to extract code from")]
        doc_key: String,
    ) -> Result<String, DocError> {
        let content = self.retriever.resolve(&doc_key).await?;
        let examples = markdown::extract_code_examples(&content);
        Ok(render_code_examples(&doc_key, &examples))
    }

    #[tool(description = "Get the outline (headings) of a documentation file")]
    pub async fn get_documentation_outline(
        &self,
        #[tool(param)]
        #[schemars(description = "Key of the documentation")]
        doc_key: String,
    ) -> Result<String, DocError> {
        let content = self.retriever.resolve(&doc_key).await?;
        let path = &self.retriever.catalog().get(&doc_key)?.path;
        let headings = markdown::extract_headings(&content);

        let mut output = format!("# Outline of {}\n\nPath: {}\n\n", doc_key, path);
        if headings.is_empty() {
            output.push_str("No headings found.\n");
        }
        for heading in headings {
            let _ = writeln!(output, "- {}", heading);
        }
        Ok(output)
    }

    #[tool(description = "Search for code examples across all documentation")]
    pub async fn search_code_examples(
        &self,
        #[tool(param)]
        #[schemars(description = "Text to find inside code examples")]
        query: String,
    ) -> String {
        let results = search::search_code_examples(&self.retriever, &query).await;
        render_code_search_results(&query, &results)
    }
}

#[tool(tool_box)]
impl ServerHandler for DocServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "This server provides access to the {} documentation. \
                Use 'list_documentation' to see the available keys, 'get_documentation' \
                or 'get_documentation_outline' to read a page, 'search_documentation' to \
                find pages mentioning a topic, and 'extract_code_examples' or \
                'search_code_examples' to work with code samples.",
                self.retriever.catalog().name()
            )),
        }
    }
}

fn render_search_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for query: \"{}\"", query);
    }

    let mut output = format!("# Search Results for \"{}\"\n\n", query);
    let _ = writeln!(output, "Found {} result(s):\n", results.len());
    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(output, "## Result {} (Relevance: {})", i + 1, result.match_count);
        let _ = writeln!(output, "**Path:** {}", result.location);
        let _ = writeln!(output, "**Key:** {}\n", result.key);
        let _ = writeln!(output, "{}\n\n---\n", result.snippet);
    }
    output
}

fn render_code_examples(doc_key: &str, examples: &[CodeExample]) -> String {
    if examples.is_empty() {
        return format!("No code examples found in {}", doc_key);
    }

    let mut output = format!("# Code Examples from {}\n\n", doc_key);
    let _ = writeln!(output, "Found {} example(s):\n", examples.len());
    for (i, example) in examples.iter().enumerate() {
        let _ = writeln!(output, "### Example {} ({})\n", i + 1, example.language);
        let _ = writeln!(output, "```{}\n{}\n```\n", example.language, example.code);
    }
    output
}

fn render_code_search_results(query: &str, results: &[CodeSearchResult]) -> String {
    if results.is_empty() {
        return format!("No code examples found for query: \"{}\"", query);
    }

    let mut output = format!("# Code Examples Matching \"{}\"\n\n", query);
    let _ = writeln!(output, "Found {} example(s):\n", results.len());
    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(
            output,
            "## Example {} from {} (example {})",
            i + 1,
            result.key,
            result.example_number
        );
        let _ = writeln!(output, "**Language:** {}\n", result.language);
        let _ = writeln!(
            output,
            "```{}\n{}\n```\n\n---\n",
            result.language, result.code
        );
    }
    output
}
