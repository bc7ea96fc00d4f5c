//! # hljs-mcp-core
//!
//! Core types for hljs-mcp.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other hljs-mcp crates. It provides:
//!
//! - Language identifiers and their grammar aliases
//! - Highlight modes and the engine call each one resolves to
//! - Raw engine results and the aggregate highlight result
//! - Error types
//! - YAML configuration
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other hljs-mcp crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod language;
pub mod mode;
pub mod result;

// Re-export commonly used types
pub use config::{EngineSettings, LoadFailurePolicy, ServerConfig, ServerSettings};
pub use error::{Error, Result};
pub use language::Language;
pub use mode::{EngineCall, HighlightMode};
pub use result::{EngineResult, HighlightResult, FAILURE_TERMINATOR, MIXED_LANGUAGE, SUCCESS_TERMINATOR};
