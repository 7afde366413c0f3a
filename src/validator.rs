//! # Switch Validator
//!
//! Checks the runtime switches of a dispatch against the switches reachable
//! from the target node:
//!
//! - the node's own required/optional switches
//! - for a switch path item, its parent's node-local switches as well
//! - the common required/optional switches of the node and every ancestor
//! - the ids referenced by the block's switch path items (as optional)
//!
//! When a name is declared at several levels the nearest declaration decides
//! how a runtime switch is checked. Supplying a name still satisfies every
//! required switch declaring that name, shadowed or not.
//!
//! ## Rules
//!
//! 1. If help-by-switch is configured and the help switch is present, the
//!    switches are accepted as they are.
//! 2. Every runtime switch must be recognized (unless `strictSwitches` is off).
//! 3. A switch may not be supplied by both its short and its long name.
//! 4. A switch declaring parameters needs at least that many values.
//! 5. Every required switch must be supplied under one of its names; the first
//!    missing one is reported.

use std::collections::HashMap;

use tracing::debug;

use crate::config::Config;
use crate::error::RouteError;
use crate::switch::{Switch, SwitchMap, SwitchSet};
use crate::tree::{NodeId, NodeKind, RouteTree};

/// Lookup tables of every switch reachable from one node.
pub struct SwitchTables {
    /// Every reachable required switch, nearest first, including shadowed ones.
    required: Vec<Switch>,
    required_short: HashMap<String, usize>,
    required_long: HashMap<String, usize>,
    optional_short: HashMap<String, Switch>,
    optional_long: HashMap<String, Switch>,
}

impl SwitchTables {
    /// Collect the switches reachable from `node`.
    #[must_use]
    pub fn collect(tree: &RouteTree, node: NodeId) -> Self {
        let mut tables = Self {
            required: Vec::new(),
            required_short: HashMap::new(),
            required_long: HashMap::new(),
            optional_short: HashMap::new(),
            optional_long: HashMap::new(),
        };

        let target = tree.node(node);
        tables.add_required(target.required());
        tables.add_optional(target.optional());

        // A switch item refines its parent verb: the parent's own switches apply,
        // and predicates are resolved against the parent block.
        let predicate_block = match (target.kind(), target.parent()) {
            (NodeKind::Switch { .. }, Some(parent)) => {
                tables.add_required(tree.node(parent).required());
                tables.add_optional(tree.node(parent).optional());
                parent
            }
            _ => node,
        };

        for id in tree.lineage(node) {
            if let Some(block) = tree.node(id).block() {
                tables.add_required(block.common_required());
                tables.add_optional(block.common_optional());
            }
        }

        if let Some(block) = tree.node(predicate_block).block() {
            for item in block.switch_items() {
                for expression in tree.node(*item).expressions().into_iter().flatten() {
                    let id = expression.id();
                    let implied = if id.chars().count() == 1 {
                        Switch::short(id)
                    } else {
                        Switch::long(id)
                    };
                    if let Ok(switch) = implied {
                        tables.add_optional_switch(&switch);
                    }
                }
            }
        }
        tables
    }

    fn add_required(&mut self, set: &SwitchSet) {
        for switch in set {
            let index = self.required.len();
            if let Some(s) = switch.short_name() {
                if !self.knows_short(s) {
                    self.required_short.insert(s.to_string(), index);
                }
            }
            if let Some(l) = switch.long_name() {
                if !self.knows_long(l) {
                    self.required_long.insert(l.to_string(), index);
                }
            }
            self.required.push(switch.clone());
        }
    }

    fn add_optional(&mut self, set: &SwitchSet) {
        for switch in set {
            self.add_optional_switch(switch);
        }
    }

    fn add_optional_switch(&mut self, switch: &Switch) {
        if let Some(s) = switch.short_name() {
            if !self.knows_short(s) {
                self.optional_short.insert(s.to_string(), switch.clone());
            }
        }
        if let Some(l) = switch.long_name() {
            if !self.knows_long(l) {
                self.optional_long.insert(l.to_string(), switch.clone());
            }
        }
    }

    fn knows_short(&self, name: &str) -> bool {
        self.required_short.contains_key(name) || self.optional_short.contains_key(name)
    }

    fn knows_long(&self, name: &str) -> bool {
        self.required_long.contains_key(name) || self.optional_long.contains_key(name)
    }

    /// Nearest definition behind a short name.
    fn short(&self, name: &str) -> Option<&Switch> {
        match self.required_short.get(name) {
            Some(&i) => Some(&self.required[i]),
            None => self.optional_short.get(name),
        }
    }

    fn long(&self, name: &str) -> Option<&Switch> {
        match self.required_long.get(name) {
            Some(&i) => Some(&self.required[i]),
            None => self.optional_long.get(name),
        }
    }

    /// Mark every required switch declaring the runtime name as supplied.
    fn satisfy(&self, pending: &mut [bool], short: Option<&str>, long: Option<&str>) {
        for (i, required) in self.required.iter().enumerate() {
            if (short.is_some() && required.short_name() == short)
                || (long.is_some() && required.long_name() == long)
            {
                pending[i] = false;
            }
        }
    }

    /// Optional switches with a default value.
    fn defaults(&self) -> impl Iterator<Item = &Switch> {
        self.optional_short
            .values()
            .chain(self.optional_long.values())
            .filter(|s| s.default_value().is_some())
    }
}

fn sorted_keys(map: &SwitchMap) -> Vec<&String> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort_unstable();
    keys
}

fn check_values(switch: &Switch, values: &[String]) -> Result<(), RouteError> {
    match switch.parameters().get(values.len()) {
        Some(parameter) => Err(RouteError::MissingValue {
            switch: switch.to_string(),
            parameter: parameter.clone(),
        }),
        None => Ok(()),
    }
}

/// Validate runtime switches for a dispatch to `node`.
///
/// # Errors
///
/// A validation-category [`RouteError`]: unrecognized switch, short and long
/// form both supplied, missing value, or missing required switch.
pub fn verify_switches(
    tree: &RouteTree,
    node: NodeId,
    short_switches: &SwitchMap,
    long_switches: &SwitchMap,
    config: &Config,
) -> Result<(), RouteError> {
    if config.help_requested(short_switches, long_switches) {
        debug!(node = %tree.full_path(node), "Help switch present, skipping switch validation");
        return Ok(());
    }

    let tables = SwitchTables::collect(tree, node);
    let mut pending = vec![true; tables.required.len()];

    for name in sorted_keys(short_switches) {
        let Some(switch) = tables.short(name) else {
            if config.strict_switches {
                return Err(RouteError::UnrecognizedSwitch {
                    switch: format!("-{name}"),
                });
            }
            continue;
        };
        if let Some(long) = switch.long_name() {
            if long_switches.contains_key(long) {
                return Err(RouteError::ShortAndLongSupplied {
                    short: name.clone(),
                    long: long.to_string(),
                });
            }
        }
        check_values(switch, &short_switches[name])?;
        tables.satisfy(&mut pending, Some(name.as_str()), None);
    }

    for name in sorted_keys(long_switches) {
        let Some(switch) = tables.long(name) else {
            if config.strict_switches {
                return Err(RouteError::UnrecognizedSwitch {
                    switch: format!("--{name}"),
                });
            }
            continue;
        };
        if let Some(short) = switch.short_name() {
            if short_switches.contains_key(short) {
                return Err(RouteError::ShortAndLongSupplied {
                    short: short.to_string(),
                    long: name.clone(),
                });
            }
        }
        check_values(switch, &long_switches[name])?;
        tables.satisfy(&mut pending, None, Some(name.as_str()));
    }

    if let Some(i) = pending.iter().position(|p| *p) {
        return Err(RouteError::MissingRequiredSwitch {
            switch: tables.required[i].to_string(),
        });
    }
    Ok(())
}

/// Runtime switches as callbacks see them.
///
/// Every recognized switch is listed under both of its names; unrecognized
/// switches keep the name they were given. Optional switches with a default
/// that were not supplied appear with their default.
#[must_use]
pub fn merged_switches(
    tree: &RouteTree,
    node: NodeId,
    short_switches: &SwitchMap,
    long_switches: &SwitchMap,
) -> SwitchMap {
    let tables = SwitchTables::collect(tree, node);
    let mut merged = SwitchMap::new();

    let supplied = short_switches
        .iter()
        .map(|(name, values)| (name, values, tables.short(name)))
        .chain(
            long_switches
                .iter()
                .map(|(name, values)| (name, values, tables.long(name))),
        );
    for (name, values, definition) in supplied {
        match definition {
            Some(switch) => {
                for n in switch.names() {
                    merged.insert(n.to_string(), values.clone());
                }
            }
            None => {
                merged.insert(name.clone(), values.clone());
            }
        }
    }

    for switch in tables.defaults() {
        if switch.names().any(|n| merged.contains_key(n)) {
            continue;
        }
        if let Some(default) = switch.default_value() {
            for n in switch.names() {
                merged.insert(n.to_string(), default.to_vec());
            }
        }
    }
    merged
}
