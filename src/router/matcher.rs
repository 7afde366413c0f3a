//! Positional and switch matching against a [`RouteTree`].
//!
//! Matching walks the runtime tokens from the root. At each step a static
//! child (by name or alias) wins over the dynamic child, and the dynamic child
//! wins over the spread child. A spread child swallows every remaining token
//! and ends the walk. There is no backtracking: a token that matches a static
//! child never falls back to the dynamic child later on.

use std::collections::HashMap;

use super::params::{ParamValue, PathParams};
use crate::error::RouteError;
use crate::switch::SwitchMap;
use crate::tree::{NodeId, RouteTree};

/// Walk `commands` and optionally record bindings.
fn descend<S: AsRef<str>>(
    tree: &RouteTree,
    commands: &[S],
    mut params: Option<&mut PathParams>,
) -> Option<NodeId> {
    let mut current = RouteTree::ROOT;
    for (i, token) in commands.iter().enumerate() {
        let token = token.as_ref();
        let block = tree.node(current).block()?;

        if let Some(next) = block.static_child(token) {
            current = next;
            continue;
        }
        if let Some(next) = block.dynamic_child() {
            if let Some(params) = params.as_deref_mut() {
                params.push(tree.node(next).name(), ParamValue::One(token.to_string()));
            }
            current = next;
            continue;
        }
        if let Some(next) = block.spread_child() {
            if let Some(params) = params.as_deref_mut() {
                let rest = commands[i..].iter().map(|t| t.as_ref().to_string()).collect();
                params.push(tree.node(next).name(), ParamValue::Many(rest));
            }
            return Some(next);
        }
        return None;
    }
    Some(current)
}

/// Resolve positional tokens to a target node.
///
/// An empty token list resolves to the root.
#[must_use]
pub fn match_commands<S: AsRef<str>>(tree: &RouteTree, commands: &[S]) -> Option<NodeId> {
    descend(tree, commands, None)
}

/// Resolve positional tokens and bind every dynamic and spread parameter on
/// the way.
///
/// # Errors
///
/// [`RouteError::NoMatch`] if the tokens do not resolve to a node.
pub fn match_commands_get_path_parameters<S: AsRef<str>>(
    tree: &RouteTree,
    commands: &[S],
) -> Result<PathParams, RouteError> {
    let mut params = PathParams::new();
    match descend(tree, commands, Some(&mut params)) {
        Some(_) => Ok(params),
        None => Err(RouteError::NoMatch {
            commands: commands.iter().map(|c| c.as_ref().to_string()).collect(),
        }),
    }
}

/// Single walk returning both the target and its bindings.
#[must_use]
pub fn match_with_parameters<S: AsRef<str>>(
    tree: &RouteTree,
    commands: &[S],
) -> Option<(NodeId, PathParams)> {
    let mut params = PathParams::new();
    descend(tree, commands, Some(&mut params)).map(|node| (node, params))
}

/// Union of short and long runtime switches keyed by name.
#[must_use]
pub fn merge_runtime_switches(short_switches: &SwitchMap, long_switches: &SwitchMap) -> SwitchMap {
    let mut merged: SwitchMap = HashMap::with_capacity(short_switches.len() + long_switches.len());
    for (name, values) in short_switches.iter().chain(long_switches) {
        merged
            .entry(name.clone())
            .or_default()
            .extend(values.iter().cloned());
    }
    merged
}

/// Pick the first switch path item under `node` whose predicates all hold.
///
/// Items are tried in declaration order. Returns `None` when no runtime
/// switch is supplied, when `node` is not a block, or when nothing matches.
#[must_use]
pub fn match_switches(
    tree: &RouteTree,
    node: NodeId,
    short_switches: &SwitchMap,
    long_switches: &SwitchMap,
) -> Option<NodeId> {
    if short_switches.is_empty() && long_switches.is_empty() {
        return None;
    }
    let block = tree.node(node).block()?;
    let merged = merge_runtime_switches(short_switches, long_switches);

    block.switch_items().iter().copied().find(|&item| {
        tree.node(item).expressions().is_some_and(|expressions| {
            expressions.iter().all(|expression| {
                merged
                    .get(expression.id())
                    .is_some_and(|values| expression.accepts(values))
            })
        })
    })
}
