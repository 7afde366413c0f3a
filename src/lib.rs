//! # verbrouter
//!
//! **verbrouter** is a route-resolution engine for command-line verbs. Routes
//! are written as paths (`deploy/:env`, `run/...args`, `status[json]`) and
//! assembled into a tree; runtime input (positional tokens plus short and long
//! switches) is matched against that tree, validated, and handed to the
//! callbacks bound to the matched path item.
//!
//! ## Overview
//!
//! The library handles:
//! - Parsing route paths and bracket switch predicates (`[force]`, `[env='prod']`)
//! - Growing a route tree that reuses nodes across registrations
//! - Matching tokens (static, then dynamic, then spread) and binding path parameters
//! - Selecting switch path items from the runtime switches
//! - Validating required, optional and inherited ("common") switches
//! - Running ordered callbacks with context merging and a cooperative stop
//!
//! Tokenizing raw process arguments and rendering help text are left to the
//! caller; the engine consumes pre-split input and reports why help is due.
//!
//! ## Architecture
//!
//! - **[`switch`]** - switch definitions, switch sets and the predicate parser
//! - **[`tree`]** - the arena route tree and the route builder
//! - **[`router`]** - matcher and the [`Router`] dispatch façade
//! - **[`validator`]** - runtime switch validation
//! - **[`pipeline`]** - callbacks, the callback pipeline and dispatch hooks
//! - **[`config`]** - runtime options
//! - **[`table`]** - YAML/TOML/JSON route table files
//! - **[`cli`]** - the `verbrouter` binary
//!
//! ### Dispatch Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Router as router::Router
//!     participant Matcher as router::matcher
//!     participant Validator as validator
//!     participant Pipeline as pipeline
//!
//!     Caller->>Router: dispatch(DispatchInput)
//!     Router->>Matcher: match_with_parameters(commands)
//!     Matcher-->>Router: node + PathParams
//!     Router->>Matcher: match_switches(node, switches)
//!     Matcher-->>Router: switch item (optional)
//!     Router->>Validator: verify_switches(target)
//!     Validator-->>Router: Ok / RouteError
//!     Router->>Pipeline: process_callbacks(target, context)
//!     Pipeline-->>Router: Completed(context) / Stopped
//!     Router-->>Caller: DispatchOutcome
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use verbrouter::pipeline::{Callback, CallbackOutcome, DispatchInput};
//! use verbrouter::{DispatchOutcome, Router, Switch};
//!
//! # fn main() -> Result<(), verbrouter::RouteError> {
//! let mut router = Router::default();
//! let build = router.on("build/:target", Callback::new(|_| Ok(CallbackOutcome::Continue)))?;
//! router
//!     .tree_mut()
//!     .add_required_switch(build, Switch::new(Some("r"), Some("release"))?);
//!
//! let input = DispatchInput::new(["build", "app"]).long("release", Vec::<String>::new());
//! assert!(matches!(router.dispatch(&input)?, DispatchOutcome::Completed { .. }));
//!
//! let missing = DispatchInput::new(["build", "app"]);
//! assert!(router.dispatch(&missing).is_err());
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The library emits `tracing` events (registration at `debug`, dispatch at
//! `info`, misses at `warn`) and never installs a subscriber itself.

pub mod cli;
pub mod config;
mod echo;
pub mod error;
pub mod pipeline;
pub mod router;
pub mod switch;
pub mod table;
pub mod tree;
pub mod validator;

pub use config::{Config, HelpType};
pub use echo::echo_callback;
pub use error::{BoxError, ErrorKind, RouteError};
pub use router::{DispatchOutcome, HelpReason, PathParams, RouteMatch, Router};
pub use switch::{Switch, SwitchMap};
pub use table::{load_table, RouteTable};
pub use tree::{NodeId, RouteTree};
