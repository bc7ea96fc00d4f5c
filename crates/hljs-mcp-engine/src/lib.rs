//! # hljs-mcp-engine
//!
//! Script engine loading for hljs-mcp.
//!
//! This crate provides:
//! - Runtime abstraction (context creation, payload evaluation, entry point)
//! - Resource bundles that hold the engine payload
//! - The engine loader that initializes the engine once and shares it
//! - A QuickJS backend (feature `quickjs`)
//! - A scripted runtime for tests and benchmarks
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on hljs-mcp-core only.
//! The grammar engine itself is an opaque payload; nothing here knows about
//! individual grammars.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bundle;
pub mod loader;
#[cfg(feature = "quickjs")]
pub mod quickjs;
pub mod runtime;
pub mod testing;

// Re-export commonly used types
pub use bundle::{DirectoryBundle, EmbeddedBundle, ResourceBundle};
pub use loader::{EngineHandle, EngineLoader};
#[cfg(feature = "quickjs")]
pub use quickjs::QuickJsRuntime;
pub use runtime::{grammar_options, HighlightEngine, ScriptContext, ScriptRuntime};
