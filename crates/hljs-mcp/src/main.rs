//! # hljs-mcp
//!
//! Model Context Protocol server that syntax-highlights source text with
//! highlight.js running inside an embedded QuickJS interpreter.
//!
//! ## Overview
//!
//! This server provides MCP tools for:
//! - Highlighting text (automatic detection or an explicit grammar)
//! - Listing the known grammar aliases
//!
//! ## Architecture
//!
//! This is Layer 3 - the server binary that ties together:
//! - hljs-mcp-core: Core types and configuration
//! - hljs-mcp-engine: Engine loading
//! - hljs-mcp-highlighter: Line aggregation

use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::EnvFilter;

use hljs_mcp::HljsMcpServer;
use hljs_mcp_core::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let config_path = args
        .windows(2)
        .find(|pair| pair[0] == "--config")
        .map(|pair| pair[1].clone());

    let config = match &config_path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };

    // Initialize logging; stdout carries the MCP stream
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    tracing::info!(
        "hljs-mcp v{} starting (config: {})",
        env!("CARGO_PKG_VERSION"),
        config_path.as_deref().unwrap_or("defaults")
    );

    let server = HljsMcpServer::from_config(&config);

    tracing::info!("Server initialized, starting stdio transport...");

    // Serve the MCP server over stdio
    let service = server.serve(stdio()).await.map_err(|e| {
        tracing::error!("Error starting server: {}", e);
        e
    })?;

    tracing::info!("hljs-mcp running on stdio");

    // Wait for the service to complete
    service.waiting().await?;

    tracing::info!("hljs-mcp shutting down");

    Ok(())
}
