//! # Route Tree Module
//!
//! The route tree holds every registered CLI route as a tree of path items:
//!
//! - **root** (`/`) - the entry point
//! - **static** (`deploy`) - matches one literal token or one of its aliases
//! - **dynamic** (`:env`) - matches any single token, at most one per parent
//! - **spread** (`...args`) - matches every remaining token, always last
//! - **switch** (`[force][env=prod]`) - matches the runtime switches, always last
//!
//! Root, static and dynamic items are *blocks*: they own children and the
//! common switches inherited by their whole subtree.
//!
//! ## Storage
//!
//! Nodes are stored in an arena ([`RouteTree`]) and addressed by [`NodeId`].
//! Parent links are indices, so there are no ownership cycles between parents
//! and children.
//!
//! ## Registration
//!
//! ```rust
//! use verbrouter::tree::RouteTree;
//!
//! let mut tree = RouteTree::new();
//! let env = tree.route("deploy/:env").unwrap();
//! assert_eq!(tree.route("/deploy/:env").unwrap(), env);
//! assert_eq!(tree.full_path(env), "/deploy/:env");
//! ```

mod arena;
pub mod builder;
mod node;

pub use arena::RouteTree;
pub use builder::{match_route_to_tree_path_items, parse_path, PathSegment};
pub use node::{Block, NodeId, NodeKind, PathNode, Visibility};
