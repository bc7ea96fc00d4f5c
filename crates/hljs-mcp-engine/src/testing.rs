//! Deterministic in-process runtime for tests and benchmarks.
//!
//! [`ScriptedRuntime`] never interprets the payload. It records what it was
//! asked to evaluate and answers engine calls through a responder closure.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{json, Value};

use hljs_mcp_core::{Error, Language, Result};

use crate::runtime::{grammar_options, HighlightEngine, ScriptContext, ScriptRuntime};

/// One engine call as seen by the scripted engine.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    /// `highlightAuto(text)`
    Auto {
        /// Input text
        text: String,
    },
    /// `highlight(text, options)`
    Grammar {
        /// Input text
        text: String,
        /// Options object as passed to the engine
        options: Value,
    },
}

impl RecordedCall {
    /// Input text of the call.
    pub fn text(&self) -> &str {
        match self {
            RecordedCall::Auto { text } | RecordedCall::Grammar { text, .. } => text,
        }
    }

    /// Requested grammar, if any.
    pub fn grammar(&self) -> Option<&str> {
        match self {
            RecordedCall::Auto { .. } => None,
            RecordedCall::Grammar { options, .. } => options["language"].as_str(),
        }
    }

    /// Whether `ignoreIllegals: true` was passed. `None` for auto calls.
    pub fn ignore_illegals(&self) -> Option<bool> {
        match self {
            RecordedCall::Auto { .. } => None,
            RecordedCall::Grammar { options, .. } => {
                Some(options["ignoreIllegals"].as_bool().unwrap_or(false))
            }
        }
    }
}

type Responder = dyn Fn(&RecordedCall) -> Result<Value> + Send + Sync;

struct Shared {
    responder: Box<Responder>,
    failing_contexts: AtomicUsize,
    contexts_created: AtomicUsize,
    record_calls: AtomicBool,
    evaluated: Mutex<Vec<String>>,
    calls: Mutex<Vec<RecordedCall>>,
}

/// Scripted stand-in for a real interpreter.
///
/// Clones share recorded state. A context exposes an entry point when any
/// evaluated source mentions its name; evaluating a source containing
/// `throw` reports an evaluation error.
#[derive(Clone)]
pub struct ScriptedRuntime {
    shared: Arc<Shared>,
}

impl ScriptedRuntime {
    /// Runtime answering every call with `responder`.
    pub fn new(
        responder: impl Fn(&RecordedCall) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                responder: Box::new(responder),
                failing_contexts: AtomicUsize::new(0),
                contexts_created: AtomicUsize::new(0),
                record_calls: AtomicBool::new(true),
                evaluated: Mutex::new(Vec::new()),
                calls: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Runtime with a small, predictable grammar set.
    ///
    /// - value is `<span>{text}</span>`
    /// - relevance is the text's character count
    /// - illegal is set when the text contains `illegal`
    /// - language is the requested grammar, or `plaintext` for auto calls
    /// - grammars that are not a known [`Language`] alias fail
    pub fn echo() -> Self {
        Self::new(|call| {
            let language = match call.grammar() {
                None => "plaintext",
                Some(grammar) => {
                    grammar.parse::<Language>().map_err(|_| {
                        Error::Engine(format!("Unknown language: \"{grammar}\""))
                    })?;
                    grammar
                }
            };
            let text = call.text();
            Ok(json!({
                "value": format!("<span>{text}</span>"),
                "illegal": text.contains("illegal"),
                "relevance": text.chars().count(),
                "language": language,
            }))
        })
    }

    /// Make the next `count` context creations fail.
    pub fn failing_contexts(self, count: usize) -> Self {
        self.shared.failing_contexts.store(count, Ordering::SeqCst);
        self
    }

    /// Stop recording engine calls (long-running benchmarks).
    pub fn without_call_log(self) -> Self {
        self.shared.record_calls.store(false, Ordering::SeqCst);
        self
    }

    /// Number of contexts successfully created.
    pub fn contexts_created(&self) -> usize {
        self.shared.contexts_created.load(Ordering::SeqCst)
    }

    /// Every source evaluated, in order.
    pub fn evaluated(&self) -> Vec<String> {
        self.shared
            .evaluated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every engine call, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.shared
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ScriptRuntime for ScriptedRuntime {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn create_context(&self) -> Result<Box<dyn ScriptContext>> {
        let should_fail = self
            .shared
            .failing_contexts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(Error::ContextCreationFailed(
                "scripted context failure".to_string(),
            ));
        }

        self.shared.contexts_created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedContext {
            shared: Arc::clone(&self.shared),
            sources: Vec::new(),
        }))
    }
}

struct ScriptedContext {
    shared: Arc<Shared>,
    sources: Vec<String>,
}

impl ScriptContext for ScriptedContext {
    fn evaluate(&mut self, source: &str) -> Result<()> {
        self.shared
            .evaluated
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(source.to_string());
        self.sources.push(source.to_string());

        if source.contains("throw") {
            return Err(Error::Engine("Uncaught exception during evaluation".to_string()));
        }
        Ok(())
    }

    fn into_engine(self: Box<Self>, entry_point: &str) -> Result<Box<dyn HighlightEngine>> {
        if !self.sources.iter().any(|s| s.contains(entry_point)) {
            return Err(Error::EntryPointNotFound(entry_point.to_string()));
        }
        Ok(Box::new(ScriptedEngine {
            shared: self.shared,
        }))
    }
}

struct ScriptedEngine {
    shared: Arc<Shared>,
}

impl ScriptedEngine {
    fn respond(&self, call: RecordedCall) -> Result<Value> {
        let response = (self.shared.responder)(&call);
        if self.shared.record_calls.load(Ordering::SeqCst) {
            self.shared
                .calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(call);
        }
        response
    }
}

impl HighlightEngine for ScriptedEngine {
    fn highlight_auto(&mut self, text: &str) -> Result<Value> {
        self.respond(RecordedCall::Auto {
            text: text.to_string(),
        })
    }

    fn highlight(&mut self, text: &str, grammar: &str, ignore_illegals: bool) -> Result<Value> {
        self.respond(RecordedCall::Grammar {
            text: text.to_string(),
            options: grammar_options(grammar, ignore_illegals),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(runtime: &ScriptedRuntime) -> Box<dyn HighlightEngine> {
        let mut context = runtime.create_context().unwrap();
        context.evaluate("var hljs = {};").unwrap();
        context.into_engine("hljs").unwrap()
    }

    #[test]
    fn test_echo_auto() {
        let runtime = ScriptedRuntime::echo();
        let raw = engine(&runtime).highlight_auto("abc").unwrap();
        assert_eq!(raw["value"], "<span>abc</span>");
        assert_eq!(raw["relevance"], 3);
        assert_eq!(raw["language"], "plaintext");
        assert_eq!(raw["illegal"], false);
    }

    #[test]
    fn test_echo_unknown_grammar_fails() {
        let runtime = ScriptedRuntime::echo();
        let err = engine(&runtime).highlight("x", "nope", false).unwrap_err();
        assert!(matches!(err, Error::Engine(_)));
        assert_eq!(runtime.calls().len(), 1);
    }

    #[test]
    fn test_failing_contexts_count_down() {
        let runtime = ScriptedRuntime::echo().failing_contexts(1);
        assert!(runtime.create_context().is_err());
        assert!(runtime.create_context().is_ok());
        assert_eq!(runtime.contexts_created(), 1);
    }

    #[test]
    fn test_recorded_call_accessors() {
        let call = RecordedCall::Grammar {
            text: "x".to_string(),
            options: grammar_options("go", false),
        };
        assert_eq!(call.text(), "x");
        assert_eq!(call.grammar(), Some("go"));
        assert_eq!(call.ignore_illegals(), Some(false));

        let auto = RecordedCall::Auto {
            text: "y".to_string(),
        };
        assert_eq!(auto.grammar(), None);
        assert_eq!(auto.ignore_illegals(), None);
    }
}
