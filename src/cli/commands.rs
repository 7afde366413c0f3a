use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::args::tokenize;
use crate::pipeline::DispatchInput;
use crate::router::{DispatchOutcome, Router};
use crate::switch::SwitchSet;
use crate::table::load_table;
use crate::tree::{RouteTree, Visibility};

/// Command-line interface for verbrouter
///
/// Loads a route table and lets you list, exercise and check its routes.
#[derive(Parser)]
#[command(name = "verbrouter", version)]
#[command(about = "Inspect and exercise command route tables", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands for verbrouter
#[derive(Subcommand)]
pub enum Commands {
    /// Print every route of a table with its switches
    Inspect {
        /// Route table file (YAML, TOML or JSON)
        #[arg(short, long, env = "VERBROUTER_ROUTES")]
        routes: PathBuf,

        /// Include private path items
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Dispatch pre-split arguments against a table and print the outcome
    ///
    /// Arguments after `--` are tokenized: `--name[=value]` and `-abc[=value]`
    /// are switches, everything else is a command token.
    Resolve {
        /// Route table file (YAML, TOML or JSON)
        #[arg(short, long, env = "VERBROUTER_ROUTES")]
        routes: PathBuf,

        /// Print the outcome as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Runtime arguments to resolve
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Build the route tree of a table and report the first error
    Check {
        /// Route table file (YAML, TOML or JSON)
        #[arg(short, long, env = "VERBROUTER_ROUTES")]
        routes: PathBuf,
    },
}

/// Load a table and build its router; the table config gets `VERBROUTER_*`
/// environment overrides applied.
pub fn load_router(path: &Path) -> anyhow::Result<Router> {
    let table = load_table(path)?;
    let config = table.config.clone().with_env_overrides();
    table.build_router_with(config)
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if:
/// - The route table cannot be read or parsed
/// - A route or switch in the table is rejected
/// - `resolve` fails with no help fallback configured
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = io::stdout();
    execute(&cli.command, &mut stdout.lock())
}

/// Run one command, writing its report to `out`.
pub fn execute(command: &Commands, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Commands::Inspect { routes, all } => {
            let router = load_router(routes)?;
            out.write_all(render_tree(router.tree(), *all).as_bytes())?;
        }
        Commands::Resolve { routes, json, args } => {
            let router = load_router(routes)?;
            let input = tokenize(args);
            let report = resolve_report(&router, &input)?;
            if *json {
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                out.write_all(render_report(&report).as_bytes())?;
            }
        }
        Commands::Check { routes } => {
            let router = load_router(routes)?;
            writeln!(
                out,
                "ok: {} routes with callbacks, {} path items",
                router.get_all_paths().len(),
                router.tree().len()
            )?;
        }
    }
    Ok(())
}

fn switch_list(set: &SwitchSet) -> String {
    set.iter()
        .map(|s| {
            let mut text = s.to_string();
            for p in s.parameters() {
                text.push_str(&format!(" <{p}>"));
            }
            text
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Indented listing of the tree, one path item per line.
#[must_use]
pub fn render_tree(tree: &RouteTree, include_private: bool) -> String {
    let mut text = String::new();
    for (depth, id) in tree.walk() {
        let node = tree.node(id);
        if !include_private && node.visibility() == Visibility::Private {
            continue;
        }
        text.push_str(&format!("{}{}", "  ".repeat(depth), node.unique_name()));
        if !node.aliases().is_empty() {
            text.push_str(&format!(" ({})", node.aliases().join(", ")));
        }
        if !node.description().is_empty() {
            text.push_str(&format!(" - {}", node.description()));
        }
        if node.visibility() == Visibility::Private {
            text.push_str(" [private]");
        }
        let callbacks: Vec<&str> = node
            .callbacks()
            .iter()
            .map(|c| c.name().unwrap_or("<anonymous>"))
            .collect();
        if !callbacks.is_empty() {
            text.push_str(&format!(" -> {}", callbacks.join(", ")));
        }
        text.push('\n');

        let indent = "  ".repeat(depth + 1);
        let mut sections = vec![
            ("required", node.required()),
            ("optional", node.optional()),
        ];
        if let Some(block) = node.block() {
            sections.push(("common required", block.common_required()));
            sections.push(("common optional", block.common_optional()));
        }
        for (label, set) in sections {
            if !set.is_empty() {
                text.push_str(&format!("{indent}{label}: {}\n", switch_list(set)));
            }
        }
    }
    text
}

/// Structured outcome of `resolve`.
pub fn resolve_report(router: &Router, input: &DispatchInput) -> anyhow::Result<Value> {
    let tree = router.tree();
    let report = match router.dispatch(input)? {
        DispatchOutcome::Completed {
            node,
            context,
            path_params,
        } => json!({
            "outcome": "completed",
            "route": tree.full_path(node),
            "params": path_params.to_json(),
            "context": context,
        }),
        DispatchOutcome::Stopped { node, path_params } => json!({
            "outcome": "stopped",
            "route": tree.full_path(node),
            "params": path_params.to_json(),
        }),
        DispatchOutcome::Help {
            node,
            reason,
            error,
        } => json!({
            "outcome": "help",
            "route": tree.full_path(node),
            "reason": reason.to_string(),
            "error": error.map(|e| e.to_string()),
        }),
    };
    Ok(report)
}

fn render_report(report: &Value) -> String {
    let mut text = String::new();
    let field = |key: &str| report.get(key).and_then(Value::as_str).unwrap_or_default();
    text.push_str(&format!("{}: {}\n", field("outcome"), field("route")));
    if let Some(reason) = report.get("reason").and_then(Value::as_str) {
        text.push_str(&format!("reason: {reason}\n"));
    }
    if let Some(error) = report.get("error").and_then(Value::as_str) {
        text.push_str(&format!("error: {error}\n"));
    }
    if let Some(Value::Object(params)) = report.get("params") {
        for (name, value) in params {
            text.push_str(&format!("param {name} = {value}\n"));
        }
    }
    if let Some(context) = report.get("context") {
        text.push_str(&format!("context: {context}\n"));
    }
    text
}
