//! # Callback Pipeline
//!
//! Runs the callbacks bound to a target node, strictly in registration order.
//! Each callback sees the same read-only view of the dispatch (commands, path
//! parameters, switches) plus the context accumulated so far, and answers
//! with one of three outcomes:
//!
//! - [`CallbackOutcome::Continue`] leaves the context unchanged
//! - [`CallbackOutcome::Merge`] shallow-merges an object into the context,
//!   later keys overriding earlier ones
//! - [`CallbackOutcome::Stop`] halts the pipeline; remaining callbacks never run
//!
//! A callback that fails returns an error instead, which aborts the pipeline
//! with [`RouteError::Callback`].
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use verbrouter::pipeline::{Callback, CallbackOutcome, Context};
//!
//! let greet = Callback::named("greet", |args| {
//!     let mut out = Context::new();
//!     out.insert("greeting".into(), json!(format!("hello {}", args.commands.join(" "))));
//!     Ok(CallbackOutcome::Merge(out))
//! });
//! assert_eq!(greet.name(), Some("greet"));
//! ```

mod hooks;

pub use hooks::{DispatchHook, DispatchRequest, HookDecision, TracingHook};

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::config::Config;
use crate::error::{BoxError, RouteError};
use crate::router::PathParams;
use crate::switch::SwitchMap;
use crate::tree::{NodeId, RouteTree};
use crate::validator;

/// Context object threaded through the callbacks of one dispatch.
pub type Context = Map<String, Value>;

/// What a callback asks the pipeline to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    Continue,
    Merge(Context),
    Stop,
}

pub type CallbackResult = Result<CallbackOutcome, BoxError>;

/// View of the dispatch handed to every callback.
pub struct CallbackArgs<'a> {
    pub commands: &'a [String],
    pub path_params: &'a PathParams,
    pub short_switches: &'a SwitchMap,
    pub long_switches: &'a SwitchMap,
    /// Supplied switches under both of their names, plus defaults.
    pub merged_switches: &'a SwitchMap,
    /// Context accumulated by the callbacks that already ran.
    pub context: &'a Context,
    pub config: &'a Config,
    pub tree: &'a RouteTree,
    pub node: NodeId,
}

type CallbackFn = dyn Fn(&CallbackArgs<'_>) -> CallbackResult + Send + Sync;

/// A callback bound to a path item.
#[derive(Clone)]
pub struct Callback {
    name: Option<String>,
    func: Arc<CallbackFn>,
}

impl Callback {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&CallbackArgs<'_>) -> CallbackResult + Send + Sync + 'static,
    {
        Self {
            name: None,
            func: Arc::new(func),
        }
    }

    /// A callback with a name, used in logs and route dumps.
    pub fn named<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&CallbackArgs<'_>) -> CallbackResult + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            func: Arc::new(func),
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Invoke the callback directly.
    ///
    /// # Errors
    ///
    /// Whatever error the callback returns.
    pub fn call(&self, args: &CallbackArgs<'_>) -> CallbackResult {
        (self.func)(args)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("name", &self.name.as_deref().unwrap_or("<anonymous>"))
            .finish_non_exhaustive()
    }
}

/// Pre-tokenized runtime input of one dispatch.
///
/// An empty value list for a switch means boolean presence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchInput {
    pub commands: Vec<String>,
    pub short_switches: SwitchMap,
    pub long_switches: SwitchMap,
}

impl DispatchInput {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Add a short switch; calling it again appends the values.
    #[must_use]
    pub fn short<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.short_switches
            .entry(name.to_string())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn long<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.long_switches
            .entry(name.to_string())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }
}

/// Result of running a pipeline to its end.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Completed(Context),
    Stopped,
}

/// Shallow merge: every key of `update` overwrites the same key in `context`.
pub fn merge_context(context: &mut Context, update: Context) {
    for (key, value) in update {
        context.insert(key, value);
    }
}

/// Run `callbacks` in order against the dispatch of `node`.
///
/// The initial context is `context`; the returned context holds every merge
/// applied on top of it.
///
/// # Errors
///
/// [`RouteError::Callback`] if a callback fails. The remaining callbacks are
/// skipped.
pub fn process_callbacks(
    tree: &RouteTree,
    node: NodeId,
    context: Context,
    input: &DispatchInput,
    path_params: &PathParams,
    config: &Config,
    callbacks: &[Callback],
) -> Result<PipelineOutcome, RouteError> {
    let merged_switches =
        validator::merged_switches(tree, node, &input.short_switches, &input.long_switches);
    let mut context = context;

    for (index, callback) in callbacks.iter().enumerate() {
        let args = CallbackArgs {
            commands: &input.commands,
            path_params,
            short_switches: &input.short_switches,
            long_switches: &input.long_switches,
            merged_switches: &merged_switches,
            context: &context,
            config,
            tree,
            node,
        };
        let outcome = callback.call(&args).map_err(|source| RouteError::Callback {
            node: tree.full_path(node),
            index,
            source,
        })?;
        match outcome {
            CallbackOutcome::Continue => {}
            CallbackOutcome::Merge(update) => merge_context(&mut context, update),
            CallbackOutcome::Stop => {
                debug!(
                    node = %tree.full_path(node),
                    callback = callback.name().unwrap_or("<anonymous>"),
                    index,
                    skipped = callbacks.len() - index - 1,
                    "Pipeline stopped by callback"
                );
                return Ok(PipelineOutcome::Stopped);
            }
        }
    }
    Ok(PipelineOutcome::Completed(context))
}
