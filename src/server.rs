use rmcp::ServiceExt;
use rmcp::transport::sse_server::SseServer;
use rmcp::transport::stdio;
use tracing_subscriber::{self, layer::SubscriberExt, util::SubscriberInitExt};

use crate::mcp::DocServer;

// start sse server
pub async fn start_sse_server(addr: &str, server: DocServer) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Serving {} documentation over SSE on {}",
        server.retriever().catalog().name(),
        addr
    );

    let ct = SseServer::serve(addr.parse()?)
        .await?
        .with_service(move || server.clone());

    tokio::signal::ctrl_c().await?;
    ct.cancel();
    Ok(())
}

// start stdio server
pub async fn start_stdio_server(server: DocServer) -> anyhow::Result<()> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::DEBUG.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!(
        "Starting MCP server for {} documentation ({} documents)",
        server.retriever().catalog().name(),
        server.retriever().catalog().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("serving error: {:?}", e);
    })?;

    service.waiting().await?;
    Ok(())
}
