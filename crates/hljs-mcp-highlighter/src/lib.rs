//! # hljs-mcp-highlighter
//!
//! Highlighting orchestration for hljs-mcp.
//!
//! This crate provides:
//! - Segment highlighting (mode to engine call dispatch, response decoding)
//! - Line-by-line aggregation with per-line fallback
//!
//! ## Architecture
//!
//! This is Layer 2 in the architecture - it depends on hljs-mcp-core for the
//! data model and on hljs-mcp-engine for the shared engine handle.
//!
//! ```
//! use std::sync::Arc;
//! use hljs_mcp_core::{EngineSettings, HighlightMode, Language};
//! use hljs_mcp_engine::{testing::ScriptedRuntime, EmbeddedBundle, EngineLoader};
//! use hljs_mcp_highlighter::Highlighter;
//!
//! let bundle = EmbeddedBundle::new().with_resource("highlight.min", "js", "var hljs = {};");
//! let loader = EngineLoader::new(
//!     Arc::new(ScriptedRuntime::echo()),
//!     Arc::new(bundle),
//!     EngineSettings::default(),
//! );
//! let highlighter = Highlighter::new(Arc::new(loader));
//!
//! let result = highlighter.highlight("let x = 1;", &HighlightMode::Language(Language::Rust));
//! assert_eq!(result.value, "<span>let x = 1;</span>\n ");
//! assert_eq!(result.language, "mixed");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod aggregator;
pub mod segment;

// Re-export commonly used types
pub use aggregator::Highlighter;
pub use segment::SegmentHighlighter;
