//! QuickJS backend.
//!
//! Each created context owns its own QuickJS runtime. Only the four result
//! fields (`value`, `language`, `relevance`, `illegal`) cross the
//! interpreter boundary: they are copied into a fresh object, serialized
//! with `JSON.stringify` and parsed with serde_json on the Rust side. The
//! rest of the engine's result object holds parser state that may be cyclic.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use rquickjs::convert::Coerced;
use rquickjs::function::This;
use rquickjs::{CatchResultExt, Context, Ctx, Function, Object, Runtime};
use serde_json::Value;
use tracing::{debug, warn};

use hljs_mcp_core::{EngineSettings, Error, Result};

use crate::runtime::{grammar_options, HighlightEngine, ScriptContext, ScriptRuntime};

/// Script runtime backed by an embedded QuickJS interpreter.
#[derive(Debug, Clone, Default)]
pub struct QuickJsRuntime {
    memory_limit: Option<usize>,
    call_timeout: Option<Duration>,
}

impl QuickJsRuntime {
    /// Runtime without a heap limit or call timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runtime whose interpreters may allocate at most `bytes`.
    pub fn with_memory_limit(bytes: usize) -> Self {
        Self {
            memory_limit: Some(bytes),
            ..Self::default()
        }
    }

    /// Runtime configured from engine settings.
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            memory_limit: settings.memory_limit_bytes,
            ..Self::default()
        }
    }

    /// Interrupt any single engine call that runs longer than `timeout`.
    ///
    /// The interrupted call fails with [`Error::Engine`] and the engine stays
    /// usable. Payload evaluation is not bounded.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }
}

/// Per-runtime deadline polled by the QuickJS interrupt handler.
#[derive(Clone)]
struct CallDeadline {
    timeout: Option<Duration>,
    expires_at: Arc<Mutex<Option<Instant>>>,
}

impl CallDeadline {
    fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            expires_at: Arc::default(),
        }
    }

    fn arm(&self) {
        if let Some(timeout) = self.timeout {
            *self.slot() = Some(Instant::now() + timeout);
        }
    }

    fn disarm(&self) {
        *self.slot() = None;
    }

    fn expired(&self) -> bool {
        self.slot().is_some_and(|at| Instant::now() >= at)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Instant>> {
        self.expires_at.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ScriptRuntime for QuickJsRuntime {
    fn name(&self) -> &'static str {
        "quickjs"
    }

    fn create_context(&self) -> Result<Box<dyn ScriptContext>> {
        let runtime = Runtime::new().map_err(|e| Error::ContextCreationFailed(e.to_string()))?;
        if let Some(limit) = self.memory_limit {
            runtime.set_memory_limit(limit);
        }
        let deadline = CallDeadline::new(self.call_timeout);
        if self.call_timeout.is_some() {
            let watched = deadline.clone();
            runtime.set_interrupt_handler(Some(Box::new(move || watched.expired())));
        }
        let context =
            Context::full(&runtime).map_err(|e| Error::ContextCreationFailed(e.to_string()))?;

        debug!(
            "QuickJS context created (memory limit: {:?}, call timeout: {:?})",
            self.memory_limit, self.call_timeout
        );
        Ok(Box::new(QuickJsContext {
            context,
            runtime,
            deadline,
        }))
    }
}

struct QuickJsContext {
    context: Context,
    runtime: Runtime,
    deadline: CallDeadline,
}

impl ScriptContext for QuickJsContext {
    fn evaluate(&mut self, source: &str) -> Result<()> {
        self.context.with(|ctx| {
            ctx.eval::<rquickjs::Value, _>(source)
                .catch(&ctx)
                .map(|_| ())
                .map_err(|e| Error::Engine(e.to_string()))
        })
    }

    fn into_engine(self: Box<Self>, entry_point: &str) -> Result<Box<dyn HighlightEngine>> {
        let exposed = self.context.with(|ctx| {
            matches!(
                ctx.globals().get::<_, Option<Object>>(entry_point),
                Ok(Some(_))
            )
        });
        if !exposed {
            return Err(Error::EntryPointNotFound(entry_point.to_string()));
        }

        let QuickJsContext {
            context,
            runtime,
            deadline,
        } = *self;
        Ok(Box::new(QuickJsEngine {
            context,
            _runtime: runtime,
            entry_point: entry_point.to_string(),
            deadline,
        }))
    }
}

struct QuickJsEngine {
    context: Context,
    _runtime: Runtime,
    entry_point: String,
    deadline: CallDeadline,
}

impl QuickJsEngine {
    fn invoke(&self, method: &str, text: &str, options: Option<Value>) -> Result<Value> {
        self.deadline.arm();
        let outcome = self.context.with(|ctx| {
            call_method(&ctx, &self.entry_point, method, text, options.as_ref())
                .catch(&ctx)
                .map_err(|e| Error::Engine(e.to_string()))
        });
        let timed_out = self.deadline.expired();
        self.deadline.disarm();

        if timed_out && outcome.is_err() {
            warn!(
                "{} interrupted after {:?}",
                method,
                self.deadline.timeout.unwrap_or_default()
            );
        }
        let json = outcome?;

        let json = json.ok_or_else(|| {
            Error::MalformedEngineResponse(format!("{method} returned a non-serializable value"))
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

fn call_method<'js>(
    ctx: &Ctx<'js>,
    entry_point: &str,
    method: &str,
    text: &str,
    options: Option<&Value>,
) -> rquickjs::Result<Option<String>> {
    let target: Object<'js> = ctx.globals().get(entry_point)?;
    let function: Function<'js> = target.get(method)?;

    let result: rquickjs::Value<'js> = match options {
        None => function.call((This(target.clone()), text))?,
        Some(options) => {
            let options = ctx.json_parse(options.to_string())?;
            function.call((This(target.clone()), text, options))?
        }
    };

    // Primitives serialize as-is and are rejected by the decoder.
    let fields = result
        .as_object()
        .map(|object| contract_fields(ctx, object))
        .transpose()?;
    let result = fields.map_or(result, Object::into_value);

    match ctx.json_stringify(result)? {
        Some(json) => Ok(Some(json.to_string()?)),
        None => Ok(None),
    }
}

/// Copy of the result fields the caller decodes.
///
/// `illegal` goes through ToBoolean and `relevance` through ToInt32 here, so
/// neither can drag engine internals into the copy.
fn contract_fields<'js>(ctx: &Ctx<'js>, result: &Object<'js>) -> rquickjs::Result<Object<'js>> {
    let fields = Object::new(ctx.clone())?;
    for name in ["value", "language"] {
        let field: rquickjs::Value<'js> = result.get(name)?;
        fields.set(name, field)?;
    }
    let Coerced(illegal) = result.get::<_, Coerced<bool>>("illegal")?;
    let Coerced(relevance) = result.get::<_, Coerced<i32>>("relevance")?;
    fields.set("illegal", illegal)?;
    fields.set("relevance", relevance)?;
    Ok(fields)
}

impl HighlightEngine for QuickJsEngine {
    fn highlight_auto(&mut self, text: &str) -> Result<Value> {
        self.invoke("highlightAuto", text, None)
    }

    fn highlight(&mut self, text: &str, grammar: &str, ignore_illegals: bool) -> Result<Value> {
        self.invoke("highlight", text, Some(grammar_options(grammar, ignore_illegals)))
    }
}
