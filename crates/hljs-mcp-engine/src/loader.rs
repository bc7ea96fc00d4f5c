//! Lazy, single-instance engine loading.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{debug, info, warn};

use hljs_mcp_core::{EngineSettings, Error, LoadFailurePolicy, Result};

use crate::bundle::ResourceBundle;
use crate::runtime::{HighlightEngine, ScriptRuntime};

/// Shared handle to the loaded engine.
///
/// Clones refer to the same engine instance. Every call takes the engine
/// lock, so calls from different threads run one at a time.
#[derive(Clone)]
pub struct EngineHandle {
    engine: Arc<Mutex<Box<dyn HighlightEngine>>>,
}

impl EngineHandle {
    fn new(engine: Box<dyn HighlightEngine>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Detect the language and highlight `text`.
    pub fn highlight_auto(&self, text: &str) -> Result<Value> {
        self.lock().highlight_auto(text)
    }

    /// Highlight `text` with the named grammar.
    pub fn highlight(&self, text: &str, grammar: &str, ignore_illegals: bool) -> Result<Value> {
        self.lock().highlight(text, grammar, ignore_illegals)
    }

    /// Whether both handles refer to the same engine instance.
    pub fn ptr_eq(&self, other: &EngineHandle) -> bool {
        Arc::ptr_eq(&self.engine, &other.engine)
    }

    // A panic mid-call leaves no Rust-side invariant broken, so a poisoned
    // lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Box<dyn HighlightEngine>> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("instance", &Arc::as_ptr(&self.engine))
            .finish()
    }
}

#[derive(Default)]
enum Slot {
    #[default]
    Empty,
    Ready(EngineHandle),
    Failed(String),
}

#[derive(Default)]
struct LoaderState {
    slot: Slot,
    attempts: usize,
}

/// Creates the engine on first use and hands out the cached handle after.
///
/// Initialization runs under the loader lock, so concurrent first callers
/// perform at most one initialization and all observe the same instance.
pub struct EngineLoader {
    runtime: Arc<dyn ScriptRuntime>,
    bundle: Arc<dyn ResourceBundle>,
    settings: EngineSettings,
    state: Mutex<LoaderState>,
}

impl EngineLoader {
    /// Create a loader. Nothing is loaded until the first [`acquire`](Self::acquire).
    pub fn new(
        runtime: Arc<dyn ScriptRuntime>,
        bundle: Arc<dyn ResourceBundle>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            runtime,
            bundle,
            settings,
            state: Mutex::new(LoaderState::default()),
        }
    }

    /// Return the engine handle, initializing the engine if needed.
    ///
    /// After a failed initialization the behaviour follows
    /// [`EngineSettings::load_failure`]: with [`LoadFailurePolicy::Retry`]
    /// the next call tries again, with [`LoadFailurePolicy::FailFast`] every
    /// later call returns [`Error::EngineUnavailable`] without retrying.
    pub fn acquire(&self) -> Result<EngineHandle> {
        let mut state = self.lock_state();

        match &state.slot {
            Slot::Ready(handle) => return Ok(handle.clone()),
            Slot::Failed(reason) => return Err(Error::EngineUnavailable(reason.clone())),
            Slot::Empty => {}
        }

        state.attempts += 1;
        let attempt = state.attempts;
        debug!(
            "Initializing {} engine (attempt {})",
            self.runtime.name(),
            attempt
        );

        match self.initialize() {
            Ok(handle) => {
                info!(
                    "Engine loaded: runtime={}, resource={}.{}, entry_point={}",
                    self.runtime.name(),
                    self.settings.resource_name,
                    self.settings.resource_extension,
                    self.settings.entry_point
                );
                state.slot = Slot::Ready(handle.clone());
                Ok(handle)
            }
            Err(e) => {
                warn!("Engine initialization failed (attempt {}): {}", attempt, e);
                if self.settings.load_failure == LoadFailurePolicy::FailFast {
                    state.slot = Slot::Failed(e.to_string());
                }
                Err(e)
            }
        }
    }

    /// Whether an engine has been loaded.
    pub fn is_loaded(&self) -> bool {
        matches!(self.lock_state().slot, Slot::Ready(_))
    }

    /// Number of initialization attempts made so far.
    pub fn attempts(&self) -> usize {
        self.lock_state().attempts
    }

    /// Engine settings in use.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn initialize(&self) -> Result<EngineHandle> {
        let mut context = self.runtime.create_context()?;

        let source = self
            .bundle
            .load(&self.settings.resource_name, &self.settings.resource_extension)?;

        // The entry-point lookup decides whether a partially failing payload
        // is still usable.
        if let Err(e) = context.evaluate(&source) {
            warn!("Engine payload raised during evaluation: {}", e);
        }

        let engine = context.into_engine(&self.settings.entry_point)?;
        Ok(EngineHandle::new(engine))
    }

    fn lock_state(&self) -> MutexGuard<'_, LoaderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
