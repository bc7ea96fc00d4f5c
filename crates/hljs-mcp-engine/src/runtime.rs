//! Script runtime abstraction.
//!
//! The highlighting engine is a script payload evaluated inside an
//! interpreter. These traits describe the three steps the loader needs
//! (create a context, evaluate the payload, look up the entry point) and the
//! two operations the resulting engine exposes.

use hljs_mcp_core::Result;
use serde_json::Value;

/// Factory for fresh script execution contexts.
pub trait ScriptRuntime: Send + Sync {
    /// Runtime name for debugging/logging.
    fn name(&self) -> &'static str;

    /// Construct a new, empty execution context.
    ///
    /// Fails with [`hljs_mcp_core::Error::ContextCreationFailed`].
    fn create_context(&self) -> Result<Box<dyn ScriptContext>>;
}

/// A single execution context that scripts are evaluated in.
pub trait ScriptContext: Send {
    /// Evaluate a script in the global scope.
    fn evaluate(&mut self, source: &str) -> Result<()>;

    /// Consume the context and bind the global object named `entry_point`.
    ///
    /// Fails with [`hljs_mcp_core::Error::EntryPointNotFound`] when the
    /// global is missing or not an object.
    fn into_engine(self: Box<Self>, entry_point: &str) -> Result<Box<dyn HighlightEngine>>;
}

/// The two operations exposed by the engine's entry point.
///
/// Both return the engine's raw result object; decoding into
/// [`hljs_mcp_core::EngineResult`] happens in the caller.
pub trait HighlightEngine: Send {
    /// `highlightAuto(text)`
    fn highlight_auto(&mut self, text: &str) -> Result<Value>;

    /// `highlight(text, { language: grammar, ignoreIllegals })`
    fn highlight(&mut self, text: &str, grammar: &str, ignore_illegals: bool) -> Result<Value>;
}

/// Options object passed as the second argument of `highlight`.
///
/// `ignoreIllegals` is only present when set.
pub fn grammar_options(grammar: &str, ignore_illegals: bool) -> Value {
    let mut options = serde_json::Map::new();
    options.insert("language".to_string(), Value::String(grammar.to_string()));
    if ignore_illegals {
        options.insert("ignoreIllegals".to_string(), Value::Bool(true));
    }
    Value::Object(options)
}
