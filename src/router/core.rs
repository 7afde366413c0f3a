//! Dispatch façade: matcher, validator and pipeline in one call.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::matcher;
use super::params::PathParams;
use crate::config::Config;
use crate::error::RouteError;
use crate::pipeline::{
    self, Callback, Context, DispatchHook, DispatchInput, DispatchRequest, HookDecision,
    PipelineOutcome,
};
use crate::tree::{NodeId, RouteTree, Visibility};
use crate::validator;

/// Result of resolving runtime input to a path item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Node reached by the positional tokens.
    pub node: NodeId,
    /// Switch path item selected under `node`, if any predicate group matched.
    pub switch_item: Option<NodeId>,
    /// Bindings of every dynamic and spread item on the way to `node`.
    pub path_params: PathParams,
}

impl RouteMatch {
    /// The node whose switches are validated and whose callbacks run.
    #[must_use]
    pub fn target(&self) -> NodeId {
        self.switch_item.unwrap_or(self.node)
    }
}

/// Why a dispatch ended in help instead of running callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpReason {
    NoTarget,
    AskedForHelp,
    VerifySwitchFailure,
    NoCallback,
}

impl fmt::Display for HelpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HelpReason::NoTarget => "no matching command",
            HelpReason::AskedForHelp => "help requested",
            HelpReason::VerifySwitchFailure => "invalid switches",
            HelpReason::NoCallback => "command has no action",
        })
    }
}

/// How a dispatch ended.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Every callback ran; `context` is the merged result.
    Completed {
        node: NodeId,
        context: Context,
        path_params: PathParams,
    },
    /// A callback or a hook stopped the pipeline.
    Stopped {
        node: NodeId,
        path_params: PathParams,
    },
    /// The caller should render help for `node` (the root when nothing matched).
    Help {
        node: NodeId,
        reason: HelpReason,
        error: Option<RouteError>,
    },
}

impl DispatchOutcome {
    #[must_use]
    pub fn node(&self) -> NodeId {
        match self {
            DispatchOutcome::Completed { node, .. }
            | DispatchOutcome::Stopped { node, .. }
            | DispatchOutcome::Help { node, .. } => *node,
        }
    }

    /// Parameters bound on the way to the target, unless dispatch ended in help.
    #[must_use]
    pub fn path_params(&self) -> Option<&PathParams> {
        match self {
            DispatchOutcome::Completed { path_params, .. }
            | DispatchOutcome::Stopped { path_params, .. } => Some(path_params),
            DispatchOutcome::Help { .. } => None,
        }
    }
}

/// A route tree plus the configuration and hooks used to dispatch against it.
///
/// Registration needs `&mut self`; dispatch only borrows. Callers sharing a
/// router across threads must finish registering before dispatching.
pub struct Router {
    tree: RouteTree,
    config: Config,
    hooks: Vec<Arc<dyn DispatchHook>>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("tree", &self.tree)
            .field("config", &self.config)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Router {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_tree(RouteTree::new(), config)
    }

    #[must_use]
    pub fn with_tree(tree: RouteTree, config: Config) -> Self {
        Self {
            tree,
            config,
            hooks: Vec::new(),
        }
    }

    #[must_use]
    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut RouteTree {
        &mut self.tree
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register a hook; hooks run in registration order.
    pub fn add_hook(&mut self, hook: Arc<dyn DispatchHook>) {
        self.hooks.push(hook);
    }

    /// Register a route; see [`RouteTree::route`].
    pub fn route(&mut self, path: &str) -> Result<NodeId, RouteError> {
        self.tree.route(path)
    }

    /// Register a route and append a callback to its final node.
    pub fn on(&mut self, path: &str, callback: Callback) -> Result<NodeId, RouteError> {
        let node = self.tree.route(path)?;
        self.tree.add_callback(node, callback);
        Ok(node)
    }

    /// Full paths of every public node that has at least one callback.
    #[must_use]
    pub fn get_all_paths(&self) -> Vec<String> {
        self.tree
            .walk()
            .into_iter()
            .map(|(_, id)| id)
            .filter(|id| {
                let node = self.tree.node(*id);
                node.visibility() == Visibility::Public && !node.callbacks().is_empty()
            })
            .map(|id| self.tree.full_path(id))
            .collect()
    }

    /// Match positional tokens and switch predicates without validating.
    #[must_use]
    pub fn resolve(&self, input: &DispatchInput) -> Option<RouteMatch> {
        let (node, path_params) = matcher::match_with_parameters(&self.tree, input.commands.as_slice())?;
        let switch_item = matcher::match_switches(
            &self.tree,
            node,
            &input.short_switches,
            &input.long_switches,
        );
        Some(RouteMatch {
            node,
            switch_item,
            path_params,
        })
    }

    /// Dispatch with an empty initial context.
    ///
    /// # Errors
    ///
    /// See [`Router::dispatch_with_context`].
    pub fn dispatch(&self, input: &DispatchInput) -> Result<DispatchOutcome, RouteError> {
        self.dispatch_with_context(input, Context::new())
    }

    /// Match, validate and run the callbacks of the target.
    ///
    /// # Errors
    ///
    /// * [`RouteError::NoMatch`] if nothing matches and `helpOnNoTarget` is off
    /// * a validation error if the switches are rejected and
    ///   `helpOnVerifySwitchFailure` is off
    /// * [`RouteError::Callback`] if a callback fails
    pub fn dispatch_with_context(
        &self,
        input: &DispatchInput,
        context: Context,
    ) -> Result<DispatchOutcome, RouteError> {
        let start = Instant::now();

        let Some(matched) = self.resolve(input) else {
            warn!(
                commands = ?input.commands,
                duration_us = start.elapsed().as_micros() as u64,
                "No route matched"
            );
            if self.config.help_on_no_target {
                return Ok(DispatchOutcome::Help {
                    node: RouteTree::ROOT,
                    reason: HelpReason::NoTarget,
                    error: None,
                });
            }
            return Err(RouteError::NoMatch {
                commands: input.commands.clone(),
            });
        };

        if self.config.help_on_asked_for_help
            && self
                .config
                .help_requested(&input.short_switches, &input.long_switches)
        {
            debug!(route = %self.tree.full_path(matched.node), "Help requested");
            return Ok(DispatchOutcome::Help {
                node: matched.node,
                reason: HelpReason::AskedForHelp,
                error: None,
            });
        }

        let target = matched.target();
        if let Err(error) = validator::verify_switches(
            &self.tree,
            target,
            &input.short_switches,
            &input.long_switches,
            &self.config,
        ) {
            debug!(route = %self.tree.full_path(target), error = %error, "Switch validation failed");
            if self.config.help_on_verify_switch_failure {
                return Ok(DispatchOutcome::Help {
                    node: target,
                    reason: HelpReason::VerifySwitchFailure,
                    error: Some(error),
                });
            }
            return Err(error);
        }

        let callbacks = self.tree.node(target).callbacks();
        if callbacks.is_empty() {
            if self.config.help_on_no_callback {
                return Ok(DispatchOutcome::Help {
                    node: target,
                    reason: HelpReason::NoCallback,
                    error: None,
                });
            }
            return Ok(DispatchOutcome::Completed {
                node: target,
                context,
                path_params: matched.path_params,
            });
        }

        let request = DispatchRequest {
            tree: &self.tree,
            node: target,
            input,
            path_params: &matched.path_params,
        };
        let outcome = match self.hooks.iter().find_map(|hook| hook.before(&request)) {
            Some(HookDecision::Stop) => PipelineOutcome::Stopped,
            Some(HookDecision::Complete(context)) => PipelineOutcome::Completed(context),
            None => pipeline::process_callbacks(
                &self.tree,
                target,
                context,
                input,
                &matched.path_params,
                &self.config,
                callbacks,
            )?,
        };
        let elapsed = start.elapsed();
        for hook in &self.hooks {
            hook.after(&request, &outcome, elapsed);
        }

        info!(
            route = %self.tree.full_path(target),
            switch_item = matched.switch_item.is_some(),
            callbacks = callbacks.len(),
            duration_us = elapsed.as_micros() as u64,
            "Dispatch complete"
        );

        Ok(match outcome {
            PipelineOutcome::Completed(context) => DispatchOutcome::Completed {
                node: target,
                context,
                path_params: matched.path_params,
            },
            PipelineOutcome::Stopped => DispatchOutcome::Stopped {
                node: target,
                path_params: matched.path_params,
            },
        })
    }
}
