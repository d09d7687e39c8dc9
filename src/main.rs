use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use docsearch_mcp::catalog::Catalog;
use docsearch_mcp::mcp::DocServer;
use docsearch_mcp::retrieval::Retriever;
use docsearch_mcp::server;
use docsearch_mcp::source::LocationSource;

#[derive(Parser, Debug)]
#[command(version, about = "Markdown Documentation MCP Server")]
struct Cli {
    /// Type of server to run
    #[arg(short, long, value_enum, default_value_t = ServerType::Stdio)]
    server_type: ServerType,

    /// Address for the SSE server
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    address: String,

    /// TOML catalog describing the documents to serve. Defaults to the
    /// built-in roblox-ts catalog.
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Seconds a fetched document stays cached. Overrides the catalog setting.
    #[arg(long)]
    ttl_secs: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ServerType {
    /// Start an SSE server
    Sse,
    /// Start a stdio server
    Stdio,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut catalog = match &cli.catalog {
        Some(path) => Catalog::from_file(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => Catalog::builtin().context("loading built-in catalog")?,
    };
    if let Some(secs) = cli.ttl_secs {
        catalog = catalog.with_ttl(Some(Duration::from_secs(secs)));
    }

    let source = LocationSource::new().context("building HTTP client")?;
    let retriever = Retriever::with_ttl_cache(Arc::new(catalog), Arc::new(source));
    let doc_server = DocServer::new(Arc::new(retriever));

    match cli.server_type {
        ServerType::Sse => {
            eprintln!("Starting SSE server on {}", cli.address);
            server::start_sse_server(&cli.address, doc_server).await?;
        }
        ServerType::Stdio => {
            server::start_stdio_server(doc_server).await?;
        }
    }

    Ok(())
}
