//! Line-by-line highlighting with per-line fallback.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use tracing::{debug, info_span, warn};

use hljs_mcp_core::{
    HighlightMode, HighlightResult, FAILURE_TERMINATOR, MIXED_LANGUAGE, SUCCESS_TERMINATOR,
};
use hljs_mcp_engine::EngineLoader;

use crate::segment::SegmentHighlighter;

/// Public highlighting entry point.
///
/// Splits input on `'\n'`, highlights each line with the same mode and
/// stitches the lines back together. A line the engine cannot handle is kept
/// verbatim and contributes nothing to relevance or the illegal flag.
pub struct Highlighter {
    segments: SegmentHighlighter,
    request_gate: Mutex<()>,
}

impl Highlighter {
    /// Create a highlighter over a shared engine loader.
    pub fn new(loader: Arc<EngineLoader>) -> Self {
        Self {
            segments: SegmentHighlighter::new(loader),
            request_gate: Mutex::new(()),
        }
    }

    /// The segment highlighter used for each line.
    pub fn segments(&self) -> &SegmentHighlighter {
        &self.segments
    }

    /// Highlight `text`. Never fails.
    ///
    /// Successful lines are followed by `"\n "`, lines that fell back to
    /// their original text by `"\n"`; the last line is terminated too. The
    /// reported language is always [`MIXED_LANGUAGE`].
    pub fn highlight(&self, text: &str, mode: &HighlightMode) -> HighlightResult {
        self.highlight_lines(text, mode, None)
    }

    /// Highlight `text`, falling back for every line not started by `deadline`.
    ///
    /// Time spent waiting for an earlier request counts against the deadline,
    /// so a stalled request cannot hold up the ones queued behind it longer
    /// than their own budget plus the engine call in flight.
    pub fn highlight_until(
        &self,
        text: &str,
        mode: &HighlightMode,
        deadline: Instant,
    ) -> HighlightResult {
        self.highlight_lines(text, mode, Some(deadline))
    }

    fn highlight_lines(
        &self,
        text: &str,
        mode: &HighlightMode,
        deadline: Option<Instant>,
    ) -> HighlightResult {
        // One request at a time, so a request sees a consistent engine.
        let _request = self
            .request_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let span = info_span!("highlight", bytes = text.len(), mode = ?mode);
        let _enter = span.enter();

        let mut value = String::with_capacity(text.len() * 2);
        let mut relevance: u32 = 0;
        let mut illegal = false;
        let mut segments = 0usize;
        let mut failures = 0usize;
        let mut skipped = 0usize;

        for segment in text.split('\n') {
            segments += 1;
            if deadline.is_some_and(|at| Instant::now() >= at) {
                skipped += 1;
                failures += 1;
                value.push_str(segment);
                value.push_str(FAILURE_TERMINATOR);
                continue;
            }
            match self.segments.run(segment, mode) {
                Ok(result) => {
                    value.push_str(&result.value);
                    value.push_str(SUCCESS_TERMINATOR);
                    relevance = relevance.saturating_add(result.relevance);
                    illegal |= result.illegal;
                }
                Err(_) => {
                    failures += 1;
                    value.push_str(segment);
                    value.push_str(FAILURE_TERMINATOR);
                }
            }
        }

        if skipped > 0 {
            warn!("Deadline passed, {} segment(s) left unhighlighted", skipped);
        }
        debug!(
            "Highlighted {} segment(s), {} fell back, relevance={}, illegal={}",
            segments, failures, relevance, illegal
        );

        HighlightResult {
            value,
            illegal,
            language: MIXED_LANGUAGE.to_string(),
            relevance,
        }
    }
}
