//! # Route Tables
//!
//! A route table is a YAML, TOML or JSON file holding a [`Config`] and a list
//! of routes. Every route names its path, optional metadata, its switches and
//! the handler its echo callback reports:
//!
//! ```yaml
//! config: { applicationName: demo, helpType: switch }
//! routes:
//!   - path: "deploy/:env"
//!     description: Deploy an environment
//!     handler: deploy
//!     switches:
//!       required: [ { short: r, long: region, parameters: [name] } ]
//!       optional: [ { long: dry-run } ]
//!       commonOptional: [ { short: v, long: verbose } ]
//!     aliases: [ship]
//! ```
//!
//! Aliases attach to the last static segment of the route (`deploy` above).

use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::Config;
use crate::echo::echo_callback;
use crate::error::RouteError;
use crate::router::Router;
use crate::switch::Switch;
use crate::tree::{self, NodeKind, Visibility};

/// One switch as written in a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwitchSpec {
    pub short: Option<String>,
    pub long: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<String>,
    pub default: Option<Vec<String>>,
}

impl SwitchSpec {
    /// Build the switch definition.
    ///
    /// # Errors
    ///
    /// A switch-definition [`RouteError`] for missing or malformed names.
    pub fn to_switch(&self) -> Result<Switch, RouteError> {
        let mut switch = Switch::new(self.short.as_deref(), self.long.as_deref())?
            .with_parameters(self.parameters.iter().cloned());
        if let Some(description) = &self.description {
            switch = switch.with_description(description.clone());
        }
        if let Some(default) = &self.default {
            switch = switch.with_default(default.iter().cloned());
        }
        Ok(switch)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwitchesSpec {
    pub required: Vec<SwitchSpec>,
    pub optional: Vec<SwitchSpec>,
    pub common_required: Vec<SwitchSpec>,
    pub common_optional: Vec<SwitchSpec>,
}

/// One route of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Name reported by the echo callback; routes without one get no callback.
    #[serde(default)]
    pub handler: Option<String>,
    #[serde(default)]
    pub switches: SwitchesSpec,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub private: bool,
}

/// A parsed route table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTable {
    #[serde(default)]
    pub config: Config,
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
}

/// Load a table; `.yaml`/`.yml` is read as YAML, `.toml` as TOML, anything
/// else as JSON.
pub fn load_table(path: impl AsRef<Path>) -> anyhow::Result<RouteTable> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading route table {}", path.display()))?;
    let table = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => RouteTable::from_yaml_str(&content)?,
        Some("toml") => RouteTable::from_toml_str(&content)?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("parsing route table {}", path.display()))?,
    };
    Ok(table)
}

impl RouteTable {
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(content).context("parsing YAML route table")
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("parsing TOML route table")
    }

    /// Register every route on a new [`Router`] using the table's config.
    ///
    /// Routes are registered in file order; the first failure is reported
    /// with the offending route path.
    pub fn build_router(&self) -> anyhow::Result<Router> {
        self.build_router_with(self.config.clone())
    }

    /// Like [`RouteTable::build_router`] but with a caller-supplied config.
    pub fn build_router_with(&self, config: Config) -> anyhow::Result<Router> {
        let mut router = Router::new(config);
        for spec in &self.routes {
            register(&mut router, spec).with_context(|| format!("route {:?}", spec.path))?;
        }
        info!(
            routes_count = self.routes.len(),
            nodes = router.tree().len(),
            "Route table loaded"
        );
        Ok(router)
    }
}

fn register(router: &mut Router, spec: &RouteSpec) -> Result<(), RouteError> {
    let tree = router.tree_mut();
    let items = tree::match_route_to_tree_path_items(tree, &spec.path)?;
    let node = items.last().copied().unwrap_or(tree::RouteTree::ROOT);

    if !spec.aliases.is_empty() {
        let anchor = items
            .iter()
            .rev()
            .copied()
            .find(|id| matches!(tree.node(*id).kind(), NodeKind::Static { .. }))
            .ok_or_else(|| RouteError::NotStatic {
                node: tree.full_path(node),
            })?;
        for alias in &spec.aliases {
            tree.add_alias(anchor, alias)?;
        }
    }

    if let Some(description) = &spec.description {
        tree.set_description(node, description.clone());
    }
    if spec.private {
        tree.set_visibility(node, Visibility::Private);
    }

    let switches = &spec.switches;
    for s in &switches.required {
        tree.add_required_switch(node, s.to_switch()?);
    }
    for s in &switches.optional {
        tree.add_optional_switch(node, s.to_switch()?);
    }
    for s in &switches.common_required {
        tree.add_common_required_switch(node, s.to_switch()?)?;
    }
    for s in &switches.common_optional {
        tree.add_common_optional_switch(node, s.to_switch()?)?;
    }

    if let Some(handler) = &spec.handler {
        tree.add_callback(node, echo_callback(handler));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HelpType;
    use crate::pipeline::DispatchInput;
    use crate::router::DispatchOutcome;

    const TABLE: &str = r#"
config:
  applicationName: demo
  helpType: switch
routes:
  - path: "deploy/:env"
    description: Deploy an environment
    handler: deploy
    switches:
      required:
        - { short: r, long: region, parameters: [name] }
      optional:
        - { long: dry-run }
    aliases: [ship]
  - path: "/"
    switches:
      commonOptional:
        - { short: v, long: verbose }
"#;

    #[test]
    fn test_parse_yaml_table() {
        let table = RouteTable::from_yaml_str(TABLE).unwrap();
        assert_eq!(table.config.application_name, "demo");
        assert_eq!(table.config.help_type, Some(HelpType::Switch));
        assert_eq!(table.routes.len(), 2);
        assert_eq!(table.routes[0].switches.required[0].parameters, vec!["name"]);
    }

    #[test]
    fn test_build_router_registers_everything() {
        let router = RouteTable::from_yaml_str(TABLE).unwrap().build_router().unwrap();
        let input = DispatchInput::new(["ship", "prod"])
            .short("r", ["eu"])
            .long("verbose", Vec::<String>::new());
        match router.dispatch(&input).unwrap() {
            DispatchOutcome::Completed { context, .. } => {
                assert_eq!(context["handler"], "deploy");
                assert_eq!(context["params"]["env"], "prod");
                assert_eq!(context["switches"]["region"][0], "eu");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_bad_route_reports_path() {
        let table = RouteTable::from_yaml_str("routes:\n  - path: \"a//b\"\n").unwrap();
        let err = table.build_router().unwrap_err();
        assert!(format!("{err:#}").contains("a//b"));
    }

    #[test]
    fn test_alias_needs_static_segment() {
        let table = RouteTable::from_yaml_str("routes:\n  - path: \":id\"\n    aliases: [x]\n")
            .unwrap();
        assert!(table.build_router().is_err());
    }

    #[test]
    fn test_toml_table() {
        let table = RouteTable::from_toml_str(
            r#"
[config]
strictSwitches = false

[[routes]]
path = "status"
handler = "status"
"#,
        )
        .unwrap();
        assert!(!table.config.strict_switches);
        let router = table.build_router().unwrap();
        assert_eq!(router.get_all_paths(), vec!["/status".to_string()]);
    }
}
