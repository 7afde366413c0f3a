use std::time::Duration;

use tracing::{debug, info};

use super::{Context, DispatchInput, PipelineOutcome};
use crate::router::PathParams;
use crate::tree::{NodeId, RouteTree};

/// What a hook sees of a dispatch that is about to run its callbacks.
pub struct DispatchRequest<'a> {
    pub tree: &'a RouteTree,
    pub node: NodeId,
    pub input: &'a DispatchInput,
    pub path_params: &'a PathParams,
}

impl DispatchRequest<'_> {
    /// Route text of the target, e.g. `/deploy/:env`.
    #[must_use]
    pub fn route(&self) -> String {
        self.tree.full_path(self.node)
    }
}

/// Early answer from [`DispatchHook::before`]; the callbacks are skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum HookDecision {
    Stop,
    Complete(Context),
}

/// Cross-cutting behavior wrapped around every callback pipeline.
///
/// Hooks run in registration order. The first `before` that returns a
/// decision ends the dispatch; `after` is called on every hook either way.
pub trait DispatchHook: Send + Sync {
    fn before(&self, _req: &DispatchRequest<'_>) -> Option<HookDecision> {
        None
    }
    fn after(&self, _req: &DispatchRequest<'_>, _outcome: &PipelineOutcome, _elapsed: Duration) {}
}

/// Logs every dispatch through `tracing`.
pub struct TracingHook;

impl DispatchHook for TracingHook {
    fn before(&self, req: &DispatchRequest<'_>) -> Option<HookDecision> {
        debug!(
            route = %req.route(),
            commands = ?req.input.commands,
            params = req.path_params.len(),
            "Dispatch started"
        );
        None
    }

    fn after(&self, req: &DispatchRequest<'_>, outcome: &PipelineOutcome, elapsed: Duration) {
        let stopped = matches!(outcome, PipelineOutcome::Stopped);
        info!(
            route = %req.route(),
            stopped,
            duration_us = elapsed.as_micros() as u64,
            "Dispatch finished"
        );
    }
}
