//! # Router Module
//!
//! Resolves pre-tokenized runtime input against a [`RouteTree`](crate::tree::RouteTree)
//! and drives the dispatch of the matched path item.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Walking positional tokens down the tree (static, then dynamic, then spread)
//! - Binding path parameters for dynamic and spread items
//! - Selecting a switch path item from the runtime switches
//! - Validating switches and running the target's callbacks
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use verbrouter::pipeline::{Callback, CallbackOutcome, Context, DispatchInput};
//! use verbrouter::router::{DispatchOutcome, Router};
//!
//! # fn main() -> Result<(), verbrouter::RouteError> {
//! let mut router = Router::default();
//! router.on(
//!     "deploy/:env",
//!     Callback::new(|args| {
//!         let env = args.path_params.get_str("env").unwrap_or_default();
//!         let mut out = Context::new();
//!         out.insert("env".into(), json!(env));
//!         Ok(CallbackOutcome::Merge(out))
//!     }),
//! )?;
//!
//! match router.dispatch(&DispatchInput::new(["deploy", "prod"]))? {
//!     DispatchOutcome::Completed { context, .. } => assert_eq!(context["env"], "prod"),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! # Ok(())
//! # }
//! ```

mod core;
mod matcher;
mod params;

pub use core::{DispatchOutcome, HelpReason, RouteMatch, Router};
pub use matcher::{
    match_commands, match_commands_get_path_parameters, match_switches, match_with_parameters,
    merge_runtime_switches,
};
pub use params::{ParamValue, PathParams, MAX_INLINE_PARAMS};
