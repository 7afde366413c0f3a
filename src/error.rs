//! # Error Types
//!
//! Every failure raised by the route tree, the matcher, the validator and the
//! callback pipeline is a [`RouteError`]. Errors are raised synchronously at the
//! point of detection: structural errors during registration, validation errors
//! during dispatch. Nothing is retried and nothing is rendered here; turning an
//! error into user-facing help text is the caller's job.
//!
//! Each variant belongs to exactly one [`ErrorKind`] so callers can branch on
//! the category without matching every variant:
//!
//! | Kind | Raised by |
//! |------|-----------|
//! | `Parse` | malformed route paths and bracket predicates |
//! | `StructuralConflict` | tree-shape and common-switch name collisions |
//! | `SwitchDefinition` | invalid short/long switch names |
//! | `Validation` | runtime switches rejected by the validator |
//! | `ContractViolation` | a callback failed inside the pipeline |
//! | `NoMatch` | path-parameter extraction on tokens with no target |

use thiserror::Error;

/// A boxed error type returned by callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Category of a [`RouteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed route path or switch expression.
    Parse,
    /// Duplicate dynamic/spread names, alias clashes, common-switch collisions.
    StructuralConflict,
    /// A switch with an invalid short or long name.
    SwitchDefinition,
    /// Runtime switches rejected during dispatch.
    Validation,
    /// A callback broke the pipeline contract.
    ContractViolation,
    /// No route matched the supplied tokens.
    NoMatch,
}

/// Errors raised while building or resolving a route tree.
#[derive(Error, Debug)]
pub enum RouteError {
    // ---- parse ----------------------------------------------------------
    /// A `]` without a matching `[`.
    #[error("unmatched ']' at position {position} in {input:?}")]
    UnmatchedCloseBracket { input: String, position: usize },

    /// A `[` that is never closed, or a `[` nested inside an open group.
    #[error("unclosed '[' at position {position} in {input:?}")]
    UnclosedBracket { input: String, position: usize },

    /// A quote that is never closed, or a quoted value followed by extra text.
    #[error("bad quoting in switch expression {expression:?}")]
    BadQuoting { expression: String },

    /// A bracket group with no switch id, e.g. `[]` or `[=1]`.
    #[error("empty switch id in {input:?}")]
    EmptySwitchId { input: String },

    /// A character other than whitespace between bracket groups.
    #[error("unexpected character {found:?} outside brackets in {input:?}")]
    UnexpectedCharacter { input: String, found: char },

    /// An empty route segment (`a//b`, trailing `/`, empty `:` or `...` name).
    #[error("empty segment in route {route:?}")]
    EmptySegment { route: String },

    /// A route segment containing whitespace.
    #[error("segment {segment:?} in route {route:?} contains whitespace")]
    WhitespaceInSegment { route: String, segment: String },

    /// A spread or switch segment followed by further segments.
    #[error("{segment:?} must be the last segment of route {route:?}")]
    MisplacedTerminal { route: String, segment: String },

    // ---- structural conflicts ---------------------------------------------
    /// A second dynamic child with a different parameter name.
    #[error("{parent} already has dynamic child ':{existing}', cannot add ':{requested}'")]
    DynamicConflict {
        parent: String,
        existing: String,
        requested: String,
    },

    /// A second spread child with a different name.
    #[error("{parent} already has spread child '...{existing}', cannot add '...{requested}'")]
    SpreadConflict {
        parent: String,
        existing: String,
        requested: String,
    },

    /// An alias that collides with a sibling name or alias.
    #[error("alias {alias:?} collides with an existing child of {parent}")]
    AliasConflict { parent: String, alias: String },

    /// Aliases are only supported on static path items.
    #[error("{node} is not a static path item and cannot carry aliases")]
    NotStatic { node: String },

    /// Children and common switches require a block node (root, static, dynamic).
    #[error("{node} cannot own children or common switches")]
    NotABlock { node: String },

    /// A common switch whose name is already used by an ancestor or descendant.
    #[error("switch name {name:?} is already declared on the path of or below {node}")]
    CommonSwitchConflict { node: String, name: String },

    // ---- switch definitions --------------------------------------------------
    /// Neither short nor long name was supplied.
    #[error("a switch needs a shortname or a longname")]
    SwitchWithoutName,

    /// Short names are exactly one character.
    #[error("invalid shortname {name:?}: must be exactly one character")]
    InvalidShortName { name: String },

    /// Long names are at least two characters.
    #[error("invalid longname {name:?}: must be at least two characters")]
    InvalidLongName { name: String },

    // ---- validation ------------------------------------------------------------
    /// A runtime switch that no reachable definition declares.
    #[error("unrecognized switch {switch}")]
    UnrecognizedSwitch { switch: String },

    /// A required switch was not supplied.
    #[error("switch {switch} is required")]
    MissingRequiredSwitch { switch: String },

    /// Both forms of one switch were supplied.
    #[error("only one of -{short} or --{long} may be supplied")]
    ShortAndLongSupplied { short: String, long: String },

    /// A switch declaring parameters received too few values.
    #[error("switch {switch} expects a value for {parameter}")]
    MissingValue { switch: String, parameter: String },

    // ---- pipeline ----------------------------------------------------------------
    /// A callback returned an error instead of a pipeline outcome.
    #[error("callback #{index} on {node} failed: {source}")]
    Callback {
        node: String,
        index: usize,
        #[source]
        source: BoxError,
    },

    // ---- matching ------------------------------------------------------------------
    /// The supplied tokens do not resolve to any node.
    #[error("no route matches {commands:?}")]
    NoMatch { commands: Vec<String> },
}

impl RouteError {
    /// The taxonomy category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouteError::UnmatchedCloseBracket { .. }
            | RouteError::UnclosedBracket { .. }
            | RouteError::BadQuoting { .. }
            | RouteError::EmptySwitchId { .. }
            | RouteError::UnexpectedCharacter { .. }
            | RouteError::EmptySegment { .. }
            | RouteError::WhitespaceInSegment { .. }
            | RouteError::MisplacedTerminal { .. } => ErrorKind::Parse,
            RouteError::DynamicConflict { .. }
            | RouteError::SpreadConflict { .. }
            | RouteError::AliasConflict { .. }
            | RouteError::NotStatic { .. }
            | RouteError::NotABlock { .. }
            | RouteError::CommonSwitchConflict { .. } => ErrorKind::StructuralConflict,
            RouteError::SwitchWithoutName
            | RouteError::InvalidShortName { .. }
            | RouteError::InvalidLongName { .. } => ErrorKind::SwitchDefinition,
            RouteError::UnrecognizedSwitch { .. }
            | RouteError::MissingRequiredSwitch { .. }
            | RouteError::ShortAndLongSupplied { .. }
            | RouteError::MissingValue { .. } => ErrorKind::Validation,
            RouteError::Callback { .. } => ErrorKind::ContractViolation,
            RouteError::NoMatch { .. } => ErrorKind::NoMatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = RouteError::EmptySegment {
            route: "a//b".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Parse);

        let err = RouteError::MissingRequiredSwitch {
            switch: "-r/--required".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn test_short_and_long_message() {
        let err = RouteError::ShortAndLongSupplied {
            short: "r".into(),
            long: "required".into(),
        };
        assert_eq!(
            err.to_string(),
            "only one of -r or --required may be supplied"
        );
    }
}
