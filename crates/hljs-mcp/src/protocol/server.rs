//! hljs-mcp Server Implementation
//!
//! This module implements the MCP server using rmcp 0.9's #[tool_router] pattern.
//! It routes MCP tool calls to the highlighting library.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ErrorData as McpError,
};

use tracing::{debug, error, info, instrument, warn};

use hljs_mcp_core::{HighlightMode, HighlightResult, ServerConfig};
use hljs_mcp_engine::{DirectoryBundle, EngineLoader, QuickJsRuntime};
use hljs_mcp_highlighter::Highlighter;

use crate::tools::*;

/// hljs-mcp Server
///
/// Owns the highlighter (and through it the single engine instance) and
/// exposes it via MCP tools.
#[derive(Clone)]
pub struct HljsMcpServer {
    /// Shared highlighter
    highlighter: Arc<Highlighter>,
    /// Deadline for one highlight request
    request_timeout: Duration,
    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl HljsMcpServer {
    /// Create a server over an existing highlighter
    pub fn new(highlighter: Arc<Highlighter>, request_timeout: Duration) -> Self {
        Self {
            highlighter,
            request_timeout,
            tool_router: Self::tool_router(),
        }
    }

    /// Create a server backed by QuickJS and the payload directory from `config`
    ///
    /// The engine is not loaded until the first highlight request. A single
    /// engine call is interrupted once it exceeds the request timeout.
    pub fn from_config(config: &ServerConfig) -> Self {
        let request_timeout = Duration::from_millis(config.server.request_timeout_ms);
        let runtime = QuickJsRuntime::from_settings(&config.engine).with_call_timeout(request_timeout);
        let bundle = DirectoryBundle::new(&config.engine.resource_dir);
        let loader = EngineLoader::new(Arc::new(runtime), Arc::new(bundle), config.engine.clone());

        info!(
            "Engine payload: {} (entry point '{}', load failure policy {:?})",
            config.engine.resource_path().display(),
            config.engine.entry_point,
            config.engine.load_failure
        );

        Self::new(Arc::new(Highlighter::new(Arc::new(loader))), request_timeout)
    }

    /// Highlight `text` off the async runtime, bounded by the request timeout
    ///
    /// Never fails: a timed-out or panicked request degrades to the
    /// unhighlighted text. The blocking task shares the same deadline, so it
    /// stops calling the engine once the caller has given up on it.
    pub async fn highlight_text(&self, text: String, mode: HighlightMode) -> HighlightResult {
        let highlighter = Arc::clone(&self.highlighter);
        let task_text = text.clone();
        let deadline = Instant::now() + self.request_timeout;

        let outcome = tokio::time::timeout(
            self.request_timeout,
            tokio::task::spawn_blocking(move || {
                highlighter.highlight_until(&task_text, &mode, deadline)
            }),
        )
        .await;

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                error!("Highlight task failed: {}", e);
                HighlightResult::unhighlighted(&text)
            }
            Err(_) => {
                warn!(
                    "Highlight timed out after {:?}, returning unhighlighted text",
                    self.request_timeout
                );
                HighlightResult::unhighlighted(&text)
            }
        }
    }

    /// Highlight source text
    #[tool(
        description = "Syntax-highlight source text with highlight.js. Returns HTML-classed markup, the relevance score and whether illegal syntax was found. Omit language for automatic detection"
    )]
    #[instrument(skip_all)]
    async fn highlight(
        &self,
        Parameters(params): Parameters<HighlightParams>,
    ) -> Result<CallToolResult, McpError> {
        let mode = params.mode();
        debug!(
            "Highlighting {} bytes, {} line(s), mode={:?}",
            params.text.len(),
            params.text.split('\n').count(),
            mode
        );

        let result = self.highlight_text(params.text, mode).await;

        info!(
            "Highlight finished: relevance={}, illegal={}",
            result.relevance, result.illegal
        );

        let json = serde_json::to_string_pretty(&result).map_err(|e| {
            error!("Failed to serialize highlight result: {}", e);
            McpError::new(
                ErrorCode(-32603), // Internal error
                format!("Failed to serialize highlight result: {e}"),
                None,
            )
        })?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// List supported languages
    #[tool(description = "List the grammar aliases that can be passed as language to highlight")]
    #[instrument(skip_all)]
    async fn list_languages(
        &self,
        Parameters(_params): Parameters<ListLanguagesParams>,
    ) -> Result<CallToolResult, McpError> {
        let response = ListLanguagesResponse::all();

        debug!("Listing {} languages", response.count);

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&response)
                .unwrap_or_else(|_| format!("{} languages", response.count)),
        )]))
    }
}

// Implement the ServerHandler trait to define server capabilities
#[tool_handler]
impl rmcp::ServerHandler for HljsMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "hljs-mcp - Syntax highlighting through highlight.js. \
                 Use highlight to mark up source text (automatic language detection \
                 unless a language is given) and list_languages to see known grammar aliases."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
