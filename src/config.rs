//! # Configuration Module
//!
//! [`Config`] carries the options the dispatcher and the switch validator
//! consult at runtime. It is usually embedded in a route table file, loaded on
//! its own with [`Config::from_file`], or built in code.
//!
//! ## File Format
//!
//! Keys are camelCase and every key is optional:
//!
//! ```yaml
//! applicationName: deployctl
//! helpType: switch
//! helpShortSwitch: h
//! helpLongSwitch: help
//! helpOnNoTarget: true
//! helpOnNoCallback: false
//! helpOnVerifySwitchFailure: true
//! helpOnAskedForHelp: true
//! strictSwitches: true
//! ```
//!
//! ## Environment Variables
//!
//! [`Config::with_env_overrides`] applies these on top of the loaded values:
//!
//! - `VERBROUTER_APP_NAME` - overrides `applicationName`
//! - `VERBROUTER_HELP_TYPE` - `switch` or `none`
//! - `VERBROUTER_STRICT_SWITCHES` - `true`/`false`/`1`/`0`
//!
//! Values that do not parse leave the previous setting untouched.

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::switch::SwitchMap;

/// How help is requested at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelpType {
    /// Help is requested with the help switch (`-h` / `--help` by default).
    Switch,
}

/// Runtime options for dispatch and switch validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub application_name: String,
    pub help_type: Option<HelpType>,
    pub help_short_switch: String,
    pub help_long_switch: String,
    pub help_on_no_target: bool,
    pub help_on_no_callback: bool,
    pub help_on_verify_switch_failure: bool,
    pub help_on_asked_for_help: bool,
    /// Reject runtime switches that no reachable definition declares.
    pub strict_switches: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            application_name: String::new(),
            help_type: None,
            help_short_switch: "h".to_string(),
            help_long_switch: "help".to_string(),
            help_on_no_target: false,
            help_on_no_callback: false,
            help_on_verify_switch_failure: false,
            help_on_asked_for_help: false,
            strict_switches: true,
        }
    }
}

impl Config {
    /// Load a config file; `.yaml`/`.yml` is read as YAML, `.toml` as TOML,
    /// anything else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        Ok(config)
    }

    /// Apply `VERBROUTER_*` environment variables.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    #[must_use]
    pub fn apply_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("VERBROUTER_APP_NAME") {
            self.application_name = name;
        }
        if let Some(kind) = lookup("VERBROUTER_HELP_TYPE") {
            match kind.to_ascii_lowercase().as_str() {
                "switch" => self.help_type = Some(HelpType::Switch),
                "none" | "" => self.help_type = None,
                _ => {}
            }
        }
        if let Some(strict) = lookup("VERBROUTER_STRICT_SWITCHES").and_then(|v| parse_bool(&v)) {
            self.strict_switches = strict;
        }
        self
    }

    /// Whether the runtime switches ask for help through the help switch.
    #[must_use]
    pub fn help_requested(&self, short_switches: &SwitchMap, long_switches: &SwitchMap) -> bool {
        self.help_type == Some(HelpType::Switch)
            && (short_switches.contains_key(&self.help_short_switch)
                || long_switches.contains_key(&self.help_long_switch))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
