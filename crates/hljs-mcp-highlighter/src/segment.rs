//! Single-segment highlighting.

use std::sync::Arc;

use tracing::{debug, warn};

use hljs_mcp_core::{EngineCall, EngineResult, HighlightMode, Result};
use hljs_mcp_engine::EngineLoader;

/// Runs one segment of text through the engine.
#[derive(Clone)]
pub struct SegmentHighlighter {
    loader: Arc<EngineLoader>,
}

impl SegmentHighlighter {
    /// Create a segment highlighter that draws its engine from `loader`.
    pub fn new(loader: Arc<EngineLoader>) -> Self {
        Self { loader }
    }

    /// The loader engine handles come from.
    pub fn loader(&self) -> &Arc<EngineLoader> {
        &self.loader
    }

    /// Highlight `text` with the engine call `mode` resolves to.
    ///
    /// Acquires the engine on every call, so the first segment of the first
    /// request pays for initialization.
    pub fn run(&self, text: &str, mode: &HighlightMode) -> Result<EngineResult> {
        let outcome = self.dispatch(text, mode);
        if let Err(e) = &outcome {
            if e.is_initialization() {
                warn!("Engine unavailable for segment: {}", e);
            } else {
                debug!("Segment highlight failed ({:?}): {}", mode, e);
            }
        }
        outcome
    }

    fn dispatch(&self, text: &str, mode: &HighlightMode) -> Result<EngineResult> {
        let engine = self.loader.acquire()?;

        let raw = match mode.engine_call() {
            EngineCall::Auto => engine.highlight_auto(text)?,
            EngineCall::Grammar {
                name,
                ignore_illegals,
            } => engine.highlight(text, name, ignore_illegals)?,
        };

        EngineResult::from_json(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hljs_mcp_core::{EngineSettings, Error, Language};
    use hljs_mcp_engine::testing::{RecordedCall, ScriptedRuntime};
    use hljs_mcp_engine::EmbeddedBundle;
    use serde_json::json;

    fn highlighter(runtime: &ScriptedRuntime) -> SegmentHighlighter {
        let bundle = EmbeddedBundle::new().with_resource("highlight.min", "js", "var hljs = {};");
        let loader = EngineLoader::new(
            Arc::new(runtime.clone()),
            Arc::new(bundle),
            EngineSettings::default(),
        );
        SegmentHighlighter::new(Arc::new(loader))
    }

    #[test]
    fn test_mode_dispatch_table() {
        let runtime = ScriptedRuntime::echo();
        let segments = highlighter(&runtime);

        let modes = [
            HighlightMode::Automatic,
            HighlightMode::LanguageAlias("go".to_string()),
            HighlightMode::LanguageAliasIgnoreIllegal("go".to_string()),
            HighlightMode::Language(Language::Python),
            HighlightMode::LanguageIgnoreIllegal(Language::Python),
        ];
        for mode in &modes {
            segments.run("x", mode).unwrap();
        }

        let calls = runtime.calls();
        assert_eq!(calls[0], RecordedCall::Auto { text: "x".to_string() });
        let grammar_calls: Vec<(Option<&str>, Option<bool>)> = calls[1..]
            .iter()
            .map(|c| (c.grammar(), c.ignore_illegals()))
            .collect();
        assert_eq!(
            grammar_calls,
            vec![
                (Some("go"), Some(false)),
                (Some("go"), Some(true)),
                (Some("python"), Some(false)),
                (Some("python"), Some(true)),
            ]
        );
    }

    #[test]
    fn test_strict_call_omits_ignore_illegals() {
        let runtime = ScriptedRuntime::echo();
        highlighter(&runtime)
            .run("x", &HighlightMode::Language(Language::Rust))
            .unwrap();

        match &runtime.calls()[0] {
            RecordedCall::Grammar { options, .. } => {
                assert_eq!(options, &json!({ "language": "rust" }))
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[test]
    fn test_decodes_engine_result() {
        let runtime = ScriptedRuntime::new(|_| {
            Ok(json!({
                "value": "<span>print</span>(1)",
                "illegal": false,
                "relevance": 5,
                "language": "python",
            }))
        });

        let result = highlighter(&runtime)
            .run("print(1)", &HighlightMode::Language(Language::Python))
            .unwrap();
        assert_eq!(
            result,
            EngineResult {
                value: "<span>print</span>(1)".to_string(),
                illegal: false,
                relevance: 5,
                language: "python".to_string(),
            }
        );
    }

    #[test]
    fn test_malformed_response() {
        let runtime = ScriptedRuntime::new(|_| Ok(json!({ "relevance": 1 })));
        let err = highlighter(&runtime)
            .run("x", &HighlightMode::Automatic)
            .unwrap_err();
        assert!(matches!(err, Error::MalformedEngineResponse(_)));
    }

    #[test]
    fn test_engine_failure_propagates() {
        let runtime = ScriptedRuntime::echo();
        let err = highlighter(&runtime)
            .run("x", &HighlightMode::LanguageAlias("nope".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Engine(_)));
    }

    #[test]
    fn test_initialization_failure_propagates() {
        let runtime = ScriptedRuntime::echo().failing_contexts(1);
        let segments = highlighter(&runtime);

        let err = segments.run("x", &HighlightMode::Automatic).unwrap_err();
        assert!(matches!(err, Error::ContextCreationFailed(_)));

        assert!(segments.run("x", &HighlightMode::Automatic).is_ok());
        assert_eq!(segments.loader().attempts(), 2);
    }
}
