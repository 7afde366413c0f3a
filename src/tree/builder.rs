//! Route-path parsing and tree registration.
//!
//! ```text
//! route      := segment ('/' segment)*
//! segment    := staticName | ':' paramName | '...' spreadName
//! lastSeg    := switchExpr+            (only legal as final segment)
//! ```
//!
//! A bracket group written directly after a name (`status[json]`) is split
//! off into its own switch segment. `/` inside a bracket group does not split
//! segments, so `[path='a/b']` stays one predicate.

use std::fmt;

use tracing::debug;

use super::arena::RouteTree;
use super::node::NodeId;
use crate::error::RouteError;
use crate::switch::{self, expr, Predicates};

/// One parsed, not yet attached, route segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Static(String),
    Dynamic(String),
    Spread(String),
    Switch(Predicates),
}

impl PathSegment {
    /// Spread and switch segments must end the route.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, PathSegment::Spread(_) | PathSegment::Switch(_))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Static(name) => f.write_str(name),
            PathSegment::Dynamic(name) => write!(f, ":{name}"),
            PathSegment::Spread(name) => write!(f, "...{name}"),
            PathSegment::Switch(expressions) => f.write_str(&expr::to_route_text(expressions)),
        }
    }
}

/// Parse a route into unattached segments.
///
/// A leading `/` is optional; `""` and `"/"` parse to no segments (the root).
///
/// # Errors
///
/// Parse-category [`RouteError`]s for empty or whitespace-containing
/// segments, malformed bracket groups, and spread or switch segments that are
/// not last.
pub fn parse_path(route: &str) -> Result<Vec<PathSegment>, RouteError> {
    let body = route.strip_prefix('/').unwrap_or(route);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let mut segments = Vec::new();
    for raw in split_segments(body) {
        parse_segment(route, raw, &mut segments)?;
    }

    if let Some(pos) = segments.iter().position(PathSegment::is_terminal) {
        if pos + 1 != segments.len() {
            return Err(RouteError::MisplacedTerminal {
                route: route.to_string(),
                segment: segments[pos].to_string(),
            });
        }
    }
    Ok(segments)
}

/// Split on `/` outside bracket groups and quotes.
fn split_segments(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_brackets = false;
    let mut quote: Option<char> = None;
    for (i, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') if in_brackets => quote = Some(c),
            (None, '[') => in_brackets = true,
            (None, ']') => in_brackets = false,
            (None, '/') if !in_brackets => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

fn parse_segment(route: &str, raw: &str, out: &mut Vec<PathSegment>) -> Result<(), RouteError> {
    if raw.is_empty() {
        return Err(RouteError::EmptySegment {
            route: route.to_string(),
        });
    }

    let (head, group) = match raw.find('[') {
        Some(i) => (&raw[..i], Some(&raw[i..])),
        None => (raw, None),
    };

    if let Some(position) = head.find(']') {
        return Err(RouteError::UnmatchedCloseBracket {
            input: raw.to_string(),
            position,
        });
    }
    if head.chars().any(char::is_whitespace) {
        return Err(RouteError::WhitespaceInSegment {
            route: route.to_string(),
            segment: raw.to_string(),
        });
    }

    if !head.is_empty() {
        let segment = if let Some(name) = head.strip_prefix("...") {
            PathSegment::Spread(name.to_string())
        } else if let Some(name) = head.strip_prefix(':') {
            PathSegment::Dynamic(name.to_string())
        } else {
            PathSegment::Static(head.to_string())
        };
        let name_empty = match &segment {
            PathSegment::Spread(n) | PathSegment::Dynamic(n) => n.is_empty(),
            _ => false,
        };
        if name_empty {
            return Err(RouteError::EmptySegment {
                route: route.to_string(),
            });
        }
        out.push(segment);
    }

    if let Some(group) = group {
        out.push(PathSegment::Switch(switch::parse(group)?));
    }
    Ok(())
}

/// Walk `route` down from the root, reusing existing nodes and attaching new
/// ones. Returns the ids of every segment in order (empty for the root route).
///
/// A failed call may leave the nodes it already attached in place; earlier
/// registrations are unaffected.
pub fn match_route_to_tree_path_items(
    tree: &mut RouteTree,
    route: &str,
) -> Result<Vec<NodeId>, RouteError> {
    let segments = parse_path(route)?;
    let mut parent = RouteTree::ROOT;
    let mut items = Vec::with_capacity(segments.len());
    for segment in segments {
        let id = tree.add_node(parent, segment)?;
        items.push(id);
        parent = id;
    }
    debug!(route, nodes = items.len(), tree_size = tree.len(), "Route registered");
    Ok(items)
}
