#![allow(dead_code)]

use serde_json::{json, Value};
use verbrouter::pipeline::{Callback, CallbackOutcome, Context};
use verbrouter::SwitchMap;

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Write `content` to a temporary file with the given extension.
    ///
    /// The file is removed when the returned handle is dropped.
    pub fn create_temp_table(content: &str, ext: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("verbrouter_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    pub fn create_temp_yaml(content: &str) -> NamedTempFile {
        create_temp_table(content, "yaml")
    }

    pub fn create_temp_toml(content: &str) -> NamedTempFile {
        create_temp_table(content, "toml")
    }
}

/// Build a switch map from `(name, values)` pairs.
pub fn switches(pairs: &[(&str, &[&str])]) -> SwitchMap {
    pairs
        .iter()
        .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
        .collect()
}

/// Unwrap a JSON object literal into a context.
pub fn object(value: Value) -> Context {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

/// Callback merging `{ "ran": name }`.
pub fn tag(name: &'static str) -> Callback {
    Callback::named(name, move |_| Ok(CallbackOutcome::Merge(object(json!({ "ran": name })))))
}

/// Route table shared by the file-based tests.
pub const DEPLOY_TABLE: &str = r#"
config:
  applicationName: deployctl
  helpType: switch
  helpOnAskedForHelp: true
routes:
  - path: "/"
    switches:
      commonOptional:
        - { short: v, long: verbose, description: Chatty output }
  - path: "deploy/:env"
    description: Deploy an environment
    handler: deploy
    aliases: [ship]
    switches:
      required:
        - { short: r, long: region, parameters: [name] }
      optional:
        - { long: dry-run }
        - { long: strategy, default: [rolling] }
  - path: "deploy/:env[force]"
    handler: force_deploy
  - path: "run/...args"
    handler: run
  - path: "internal/gc"
    handler: gc
    private: true
"#;
