//! # CLI Module
//!
//! The `verbrouter` binary: load a route table file and work with it.
//!
//! ## Commands
//!
//! ### `inspect`
//!
//! Print the route tree with descriptions, aliases, switches and handlers:
//!
//! ```bash
//! verbrouter inspect --routes routes.yaml
//! ```
//!
//! Options:
//! - `--routes <FILE>` - Route table (also read from `VERBROUTER_ROUTES`)
//! - `--all` - Include private path items
//!
//! ### `resolve`
//!
//! Dispatch arguments against the table and print what ran:
//!
//! ```bash
//! verbrouter resolve --routes routes.yaml -- deploy prod -r=eu --dry-run
//! verbrouter resolve --routes routes.yaml --json -- deploy prod -r=eu
//! ```
//!
//! ### `check`
//!
//! Build the route tree and fail on the first invalid route or switch:
//!
//! ```bash
//! verbrouter check --routes routes.yaml
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use verbrouter::cli::run_cli;
//!
//! run_cli()?;
//! ```

mod args;
mod commands;


pub use args::tokenize;
pub use commands::{execute, load_router, render_tree, resolve_report, run_cli, Cli, Commands};
