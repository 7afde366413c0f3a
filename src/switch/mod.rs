//! # Switch Module
//!
//! Switch definitions, per-node switch storage and the bracket predicate
//! language used by switch path items.
//!
//! - [`Switch`] - a short (`-r`) and/or long (`--required`) switch definition
//! - [`SwitchSet`] - ordered switch storage with O(1) lookup by either name
//! - [`SwitchExpression`] / [`parse`] - `[id]` and `[id=value]` predicates

mod definition;
pub mod expr;
mod registry;

pub use definition::Switch;
pub use expr::{parse, ExprValue, Predicates, SwitchExpression};
pub use registry::SwitchSet;

use std::collections::HashMap;

/// Runtime switches keyed by name. An empty value list means boolean presence.
pub type SwitchMap = HashMap<String, Vec<String>>;
