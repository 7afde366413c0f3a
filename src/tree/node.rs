use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::pipeline::Callback;
use crate::switch::{expr, Predicates, SwitchSet};

/// Index of a node in a [`RouteTree`](super::RouteTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a path item is listed by route dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Child and common-switch storage of a node that can own children.
///
/// Root, static and dynamic path items are blocks; spread and switch path items
/// are always leaves.
#[derive(Debug, Default)]
pub struct Block {
    pub(crate) statics: HashMap<String, NodeId>,
    pub(crate) aliases: HashMap<String, NodeId>,
    pub(crate) dynamic: Option<NodeId>,
    pub(crate) spread: Option<NodeId>,
    pub(crate) switch_items: Vec<NodeId>,
    pub(crate) common_required: SwitchSet,
    pub(crate) common_optional: SwitchSet,
    /// Names of every common switch declared on this node or below it.
    ///
    /// Derived from the common sets of the subtree. Switches are never removed,
    /// so the set is only ever extended and never invalidated.
    pub(crate) subtree_names: HashSet<String>,
}

impl Block {
    /// Static child matching `token` by name first, then by alias.
    #[must_use]
    pub fn static_child(&self, token: &str) -> Option<NodeId> {
        self.statics
            .get(token)
            .or_else(|| self.aliases.get(token))
            .copied()
    }

    #[must_use]
    pub fn dynamic_child(&self) -> Option<NodeId> {
        self.dynamic
    }

    #[must_use]
    pub fn spread_child(&self) -> Option<NodeId> {
        self.spread
    }

    /// Switch path items in declaration order.
    #[must_use]
    pub fn switch_items(&self) -> &[NodeId] {
        &self.switch_items
    }

    #[must_use]
    pub fn common_required(&self) -> &SwitchSet {
        &self.common_required
    }

    #[must_use]
    pub fn common_optional(&self) -> &SwitchSet {
        &self.common_optional
    }

    /// Static children sorted by name.
    #[must_use]
    pub fn static_children(&self) -> Vec<(&str, NodeId)> {
        let mut children: Vec<_> = self
            .statics
            .iter()
            .map(|(name, id)| (name.as_str(), *id))
            .collect();
        children.sort_unstable_by(|a, b| a.0.cmp(b.0));
        children
    }

    pub(crate) fn common_names(&self) -> impl Iterator<Item = &str> {
        self.common_required.names().chain(self.common_optional.names())
    }
}

/// The closed set of path item variants.
#[derive(Debug)]
pub enum NodeKind {
    /// The unique entry point of the tree.
    Root(Block),
    /// Matches one literal token (or one of its aliases).
    Static { aliases: Vec<String>, block: Block },
    /// Matches any single token and binds it to the node's name.
    Dynamic(Block),
    /// Matches every remaining token as one list.
    Spread,
    /// Matches the runtime switch set against ANDed predicates.
    Switch { expressions: Predicates },
}

impl NodeKind {
    #[must_use]
    pub fn block(&self) -> Option<&Block> {
        match self {
            NodeKind::Root(block) | NodeKind::Dynamic(block) => Some(block),
            NodeKind::Static { block, .. } => Some(block),
            NodeKind::Spread | NodeKind::Switch { .. } => None,
        }
    }

    pub(crate) fn block_mut(&mut self) -> Option<&mut Block> {
        match self {
            NodeKind::Root(block) | NodeKind::Dynamic(block) => Some(block),
            NodeKind::Static { block, .. } => Some(block),
            NodeKind::Spread | NodeKind::Switch { .. } => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Root(_) => "root",
            NodeKind::Static { .. } => "static",
            NodeKind::Dynamic(_) => "dynamic",
            NodeKind::Spread => "spread",
            NodeKind::Switch { .. } => "switch",
        }
    }
}

/// A node of the route tree.
#[derive(Debug)]
pub struct PathNode {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) description: String,
    pub(crate) visibility: Visibility,
    pub(crate) callbacks: Vec<Callback>,
    pub(crate) required: SwitchSet,
    pub(crate) optional: SwitchSet,
    pub(crate) kind: NodeKind,
}

impl PathNode {
    pub(crate) fn new(name: String, parent: Option<NodeId>, kind: NodeKind) -> Self {
        Self {
            name,
            parent,
            description: String::new(),
            visibility: Visibility::default(),
            callbacks: Vec::new(),
            required: SwitchSet::new(),
            optional: SwitchSet::new(),
            kind,
        }
    }

    /// The bare name: literal for static items, parameter name for dynamic and
    /// spread items, serialized predicates for switch items, empty for the root.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name as written in a route: `/`, `deploy`, `:env`, `...rest`, `[a='b']`.
    #[must_use]
    pub fn unique_name(&self) -> String {
        match &self.kind {
            NodeKind::Root(_) => "/".to_string(),
            NodeKind::Static { .. } => self.name.clone(),
            NodeKind::Dynamic(_) => format!(":{}", self.name),
            NodeKind::Spread => format!("...{}", self.name),
            NodeKind::Switch { expressions } => expr::to_route_text(expressions),
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[must_use]
    pub fn callbacks(&self) -> &[Callback] {
        &self.callbacks
    }

    /// Node-local required switches.
    #[must_use]
    pub fn required(&self) -> &SwitchSet {
        &self.required
    }

    /// Node-local optional switches.
    #[must_use]
    pub fn optional(&self) -> &SwitchSet {
        &self.optional
    }

    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[must_use]
    pub fn block(&self) -> Option<&Block> {
        self.kind.block()
    }

    /// Aliases of a static path item; empty for every other variant.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        match &self.kind {
            NodeKind::Static { aliases, .. } => aliases.as_slice(),
            _ => &[],
        }
    }

    /// Predicates of a switch path item.
    #[must_use]
    pub fn expressions(&self) -> Option<&Predicates> {
        match &self.kind {
            NodeKind::Switch { expressions } => Some(expressions),
            _ => None,
        }
    }
}
