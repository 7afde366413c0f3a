//! Arena storage for the route tree.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. Children are
//! owned by their parent's [`Block`] maps; the upward `parent` link is a plain
//! index used only to rebuild paths and to look up inherited switches.

use std::collections::HashSet;
use std::iter;

use tracing::debug;

use super::builder::{self, PathSegment};
use super::node::{Block, NodeId, NodeKind, PathNode, Visibility};
use crate::error::RouteError;
use crate::pipeline::Callback;
use crate::switch::{expr, Predicates, Switch};

/// The route tree: a root path item and everything registered below it.
#[derive(Debug)]
pub struct RouteTree {
    nodes: Vec<PathNode>,
}

impl Default for RouteTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTree {
    /// Id of the root path item, unique name `/`.
    pub const ROOT: NodeId = NodeId(0);

    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![PathNode::new(
                String::new(),
                None,
                NodeKind::Root(Block::default()),
            )],
        }
    }

    #[must_use]
    pub fn root(&self) -> &PathNode {
        &self.nodes[0]
    }

    /// Borrow a node.
    ///
    /// Ids are only minted by this tree; passing an id from another tree is a
    /// caller bug and panics on out-of-range indices.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &PathNode {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&PathNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is created with the tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn lineage(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(Some(id), move |n| self.nodes[n.0].parent)
    }

    /// Ids from the root down to `id`, both included.
    #[must_use]
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = self.lineage(id).collect();
        path.reverse();
        path
    }

    /// Rebuild the route text of a node, e.g. `/deploy/:env/[force]`.
    #[must_use]
    pub fn full_path(&self, id: NodeId) -> String {
        let segments: Vec<String> = self
            .path_to(id)
            .into_iter()
            .skip(1)
            .map(|n| self.node(n).unique_name())
            .collect();
        format!("/{}", segments.join("/"))
    }

    /// The block of `id`, or [`RouteError::NotABlock`] for spread and switch items.
    pub fn block_of(&self, id: NodeId) -> Result<&Block, RouteError> {
        self.node(id).block().ok_or_else(|| RouteError::NotABlock {
            node: self.full_path(id),
        })
    }

    fn block_mut(&mut self, id: NodeId) -> Result<&mut Block, RouteError> {
        if self.node(id).block().is_none() {
            return Err(RouteError::NotABlock {
                node: self.full_path(id),
            });
        }
        self.nodes[id.0]
            .kind
            .block_mut()
            .ok_or_else(|| RouteError::NotABlock {
                node: String::new(),
            })
    }

    fn push(&mut self, node: PathNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    // ---- growing the tree -------------------------------------------------

    /// Register a route and return its final node.
    ///
    /// Existing nodes are reused; `/` (or the empty route) returns the root.
    pub fn route(&mut self, route: &str) -> Result<NodeId, RouteError> {
        let items = builder::match_route_to_tree_path_items(self, route)?;
        Ok(items.last().copied().unwrap_or(Self::ROOT))
    }

    /// Attach one parsed segment under `parent`, reusing an equal child.
    pub fn add_node(&mut self, parent: NodeId, segment: PathSegment) -> Result<NodeId, RouteError> {
        match segment {
            PathSegment::Static(name) => self.add_static(parent, &name),
            PathSegment::Dynamic(name) => self.add_dynamic(parent, &name),
            PathSegment::Spread(name) => self.add_spread(parent, &name),
            PathSegment::Switch(expressions) => self.add_switch_item(parent, expressions),
        }
    }

    /// Static child named `name`; created on first use.
    pub fn add_static(&mut self, parent: NodeId, name: &str) -> Result<NodeId, RouteError> {
        check_name(name)?;
        let block = self.block_of(parent)?;
        if let Some(existing) = block.statics.get(name) {
            return Ok(*existing);
        }
        if block.aliases.contains_key(name) {
            return Err(RouteError::AliasConflict {
                parent: self.full_path(parent),
                alias: name.to_string(),
            });
        }
        let id = self.push(PathNode::new(
            name.to_string(),
            Some(parent),
            NodeKind::Static {
                aliases: Vec::new(),
                block: Block::default(),
            },
        ));
        self.block_mut(parent)?.statics.insert(name.to_string(), id);
        debug!(parent = %self.full_path(parent), segment = name, "Static path item added");
        Ok(id)
    }

    /// The single dynamic child of `parent`.
    ///
    /// # Errors
    ///
    /// [`RouteError::DynamicConflict`] if a dynamic child with another name exists.
    pub fn add_dynamic(&mut self, parent: NodeId, name: &str) -> Result<NodeId, RouteError> {
        check_name(name)?;
        if let Some(existing) = self.block_of(parent)?.dynamic {
            let existing_name = self.node(existing).name();
            if existing_name == name {
                return Ok(existing);
            }
            return Err(RouteError::DynamicConflict {
                parent: self.full_path(parent),
                existing: existing_name.to_string(),
                requested: name.to_string(),
            });
        }
        let id = self.push(PathNode::new(
            name.to_string(),
            Some(parent),
            NodeKind::Dynamic(Block::default()),
        ));
        self.block_mut(parent)?.dynamic = Some(id);
        debug!(parent = %self.full_path(parent), segment = name, "Dynamic path item added");
        Ok(id)
    }

    /// The single spread child of `parent`.
    pub fn add_spread(&mut self, parent: NodeId, name: &str) -> Result<NodeId, RouteError> {
        check_name(name)?;
        if let Some(existing) = self.block_of(parent)?.spread {
            let existing_name = self.node(existing).name();
            if existing_name == name {
                return Ok(existing);
            }
            return Err(RouteError::SpreadConflict {
                parent: self.full_path(parent),
                existing: existing_name.to_string(),
                requested: name.to_string(),
            });
        }
        let id = self.push(PathNode::new(name.to_string(), Some(parent), NodeKind::Spread));
        self.block_mut(parent)?.spread = Some(id);
        debug!(parent = %self.full_path(parent), segment = name, "Spread path item added");
        Ok(id)
    }

    /// A switch path item; an item with identical predicates is reused.
    pub fn add_switch_item(
        &mut self,
        parent: NodeId,
        expressions: Predicates,
    ) -> Result<NodeId, RouteError> {
        let text = expr::to_route_text(&expressions);
        let block = self.block_of(parent)?;
        if let Some(existing) = block
            .switch_items
            .iter()
            .find(|id| self.node(**id).name() == text)
        {
            return Ok(*existing);
        }
        let id = self.push(PathNode::new(
            text.clone(),
            Some(parent),
            NodeKind::Switch { expressions },
        ));
        self.block_mut(parent)?.switch_items.push(id);
        debug!(parent = %self.full_path(parent), predicates = %text, "Switch path item added");
        Ok(id)
    }

    /// Let a static path item also match `alias`.
    pub fn add_alias(&mut self, node: NodeId, alias: &str) -> Result<(), RouteError> {
        check_name(alias)?;
        if !matches!(self.node(node).kind, NodeKind::Static { .. }) {
            return Err(RouteError::NotStatic {
                node: self.full_path(node),
            });
        }
        let Some(parent) = self.node(node).parent else {
            return Err(RouteError::NotStatic {
                node: self.full_path(node),
            });
        };
        let siblings = self.block_of(parent)?;
        match siblings.static_child(alias) {
            Some(existing) if existing == node => return Ok(()),
            Some(_) => {
                return Err(RouteError::AliasConflict {
                    parent: self.full_path(parent),
                    alias: alias.to_string(),
                })
            }
            None => {}
        }
        self.block_mut(parent)?
            .aliases
            .insert(alias.to_string(), node);
        if let NodeKind::Static { aliases, .. } = &mut self.nodes[node.0].kind {
            aliases.push(alias.to_string());
        }
        Ok(())
    }

    // ---- node metadata ------------------------------------------------------

    /// Append a callback; callbacks run in the order they were added.
    pub fn add_callback(&mut self, node: NodeId, callback: Callback) {
        self.nodes[node.0].callbacks.push(callback);
    }

    pub fn set_description(&mut self, node: NodeId, description: impl Into<String>) {
        self.nodes[node.0].description = description.into();
    }

    pub fn set_visibility(&mut self, node: NodeId, visibility: Visibility) {
        self.nodes[node.0].visibility = visibility;
    }

    // ---- switches ----------------------------------------------------------------

    /// Node-local required switch. No cross-subtree name check.
    pub fn add_required_switch(&mut self, node: NodeId, switch: Switch) {
        self.nodes[node.0].required.insert(switch);
    }

    /// Node-local optional switch. No cross-subtree name check.
    pub fn add_optional_switch(&mut self, node: NodeId, switch: Switch) {
        self.nodes[node.0].optional.insert(switch);
    }

    /// Required switch inherited by the whole subtree of `node`.
    ///
    /// # Errors
    ///
    /// [`RouteError::CommonSwitchConflict`] if a name is already used by a
    /// common switch of an ancestor or anywhere below `node`;
    /// [`RouteError::NotABlock`] for spread and switch items.
    pub fn add_common_required_switch(
        &mut self,
        node: NodeId,
        switch: Switch,
    ) -> Result<(), RouteError> {
        self.add_common_switch(node, switch, true)
    }

    /// Optional switch inherited by the whole subtree of `node`.
    pub fn add_common_optional_switch(
        &mut self,
        node: NodeId,
        switch: Switch,
    ) -> Result<(), RouteError> {
        self.add_common_switch(node, switch, false)
    }

    fn add_common_switch(
        &mut self,
        node: NodeId,
        switch: Switch,
        required: bool,
    ) -> Result<(), RouteError> {
        let taken = self.reserved_common_names(node)?;
        if let Some(name) = switch.names().find(|n| taken.contains(*n)) {
            return Err(RouteError::CommonSwitchConflict {
                node: self.full_path(node),
                name: name.to_string(),
            });
        }

        let names: Vec<String> = switch.names().map(str::to_string).collect();
        debug!(
            node = %self.full_path(node),
            switch = %switch,
            required,
            "Common switch added"
        );
        let block = self.block_mut(node)?;
        if required {
            block.common_required.insert(switch);
        } else {
            block.common_optional.insert(switch);
        }

        let lineage: Vec<NodeId> = self.lineage(node).collect();
        for id in lineage {
            if let Some(block) = self.nodes[id.0].kind.block_mut() {
                block.subtree_names.extend(names.iter().cloned());
            }
        }
        Ok(())
    }

    /// Names a new common switch on `node` may not use: every common name of
    /// `node` and its ancestors plus every common name declared below `node`.
    fn reserved_common_names(&self, node: NodeId) -> Result<HashSet<&str>, RouteError> {
        let mut taken: HashSet<&str> = self
            .block_of(node)?
            .subtree_names
            .iter()
            .map(String::as_str)
            .collect();
        for id in self.lineage(node) {
            if let Some(block) = self.node(id).block() {
                taken.extend(block.common_names());
            }
        }
        Ok(taken)
    }

    // ---- traversal --------------------------------------------------------------

    /// Depth-first `(depth, id)` listing: static children by name, then the
    /// dynamic child, the spread child and switch items in declaration order.
    #[must_use]
    pub fn walk(&self) -> Vec<(usize, NodeId)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(0usize, Self::ROOT)];
        while let Some((depth, id)) = stack.pop() {
            out.push((depth, id));
            if let Some(block) = self.node(id).block() {
                let mut children: Vec<NodeId> =
                    block.static_children().into_iter().map(|(_, c)| c).collect();
                children.extend(block.dynamic);
                children.extend(block.spread);
                children.extend(block.switch_items.iter().copied());
                for child in children.into_iter().rev() {
                    stack.push((depth + 1, child));
                }
            }
        }
        out
    }
}

fn check_name(name: &str) -> Result<(), RouteError> {
    if name.is_empty() {
        return Err(RouteError::EmptySegment {
            route: name.to_string(),
        });
    }
    if name.chars().any(char::is_whitespace) {
        return Err(RouteError::WhitespaceInSegment {
            route: name.to_string(),
            segment: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_add_static_is_idempotent() {
        let mut tree = RouteTree::new();
        let a = tree.add_static(RouteTree::ROOT, "deploy").unwrap();
        let b = tree.add_static(RouteTree::ROOT, "deploy").unwrap();
        assert_eq!(a, b);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_dynamic_name_conflict() {
        let mut tree = RouteTree::new();
        let env = tree.add_dynamic(RouteTree::ROOT, "env").unwrap();
        assert_eq!(tree.add_dynamic(RouteTree::ROOT, "env").unwrap(), env);
        let err = tree.add_dynamic(RouteTree::ROOT, "stage").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralConflict);
    }

    #[test]
    fn test_spread_cannot_own_children() {
        let mut tree = RouteTree::new();
        let rest = tree.add_spread(RouteTree::ROOT, "rest").unwrap();
        assert!(matches!(
            tree.add_static(rest, "x"),
            Err(RouteError::NotABlock { .. })
        ));
    }

    #[test]
    fn test_full_path_and_lineage() {
        let mut tree = RouteTree::new();
        let node = tree.route("x/:p/y[a=12]").unwrap();
        assert_eq!(tree.full_path(node), "/x/:p/y/[a=12]");
        assert_eq!(tree.lineage(node).count(), 5);
        assert_eq!(tree.full_path(RouteTree::ROOT), "/");
    }

    #[test]
    fn test_alias_matching_and_conflicts() {
        let mut tree = RouteTree::new();
        let remove = tree.add_static(RouteTree::ROOT, "remove").unwrap();
        tree.add_static(RouteTree::ROOT, "list").unwrap();
        tree.add_alias(remove, "rm").unwrap();
        tree.add_alias(remove, "rm").unwrap();

        assert_eq!(tree.root().block().unwrap().static_child("rm"), Some(remove));
        assert_eq!(tree.node(remove).aliases(), ["rm".to_string()]);
        assert!(matches!(
            tree.add_alias(remove, "list"),
            Err(RouteError::AliasConflict { .. })
        ));
        assert!(matches!(
            tree.add_static(RouteTree::ROOT, "rm"),
            Err(RouteError::AliasConflict { .. })
        ));
    }

    #[test]
    fn test_common_switch_collisions() {
        let mut tree = RouteTree::new();
        let a = tree.route("a").unwrap();
        let ab = tree.route("a/b").unwrap();
        let c = tree.route("c").unwrap();

        tree.add_common_optional_switch(ab, Switch::new(Some("v"), Some("verbose")).unwrap())
            .unwrap();
        // Below an ancestor of `ab`: collides through the subtree names.
        let err = tree
            .add_common_required_switch(a, Switch::long("verbose").unwrap())
            .unwrap_err();
        assert!(matches!(err, RouteError::CommonSwitchConflict { .. }));
        let err = tree
            .add_common_required_switch(RouteTree::ROOT, Switch::short("v").unwrap())
            .unwrap_err();
        assert!(matches!(err, RouteError::CommonSwitchConflict { .. }));
        // A sibling subtree is unaffected.
        tree.add_common_optional_switch(c, Switch::long("verbose").unwrap())
            .unwrap();
    }

    #[test]
    fn test_common_switch_on_leaf_is_rejected() {
        let mut tree = RouteTree::new();
        let item = tree.route("a[x]").unwrap();
        assert!(matches!(
            tree.add_common_optional_switch(item, Switch::long("flag").unwrap()),
            Err(RouteError::NotABlock { .. })
        ));
    }

    #[test]
    fn test_walk_order() {
        let mut tree = RouteTree::new();
        tree.route("b").unwrap();
        tree.route("a/:x").unwrap();
        tree.route("...rest").unwrap();
        let names: Vec<String> = tree
            .walk()
            .into_iter()
            .map(|(_, id)| tree.full_path(id))
            .collect();
        assert_eq!(names, vec!["/", "/a", "/a/:x", "/b", "/...rest"]);
    }
}
