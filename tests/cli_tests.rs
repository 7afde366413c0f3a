mod common;

use serde_json::Value;
use verbrouter::cli::{execute, tokenize, Commands};

use common::temp_files::create_temp_yaml;
use common::DEPLOY_TABLE;

fn run(command: &Commands) -> anyhow::Result<String> {
    let mut out = Vec::new();
    execute(command, &mut out)?;
    Ok(String::from_utf8(out)?)
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_inspect_lists_routes() {
    let file = create_temp_yaml(DEPLOY_TABLE);
    let text = run(&Commands::Inspect {
        routes: file.path().to_path_buf(),
        all: false,
    })
    .unwrap();

    assert!(text.contains("deploy (ship)"), "{text}");
    assert!(text.contains(":env - Deploy an environment -> deploy"), "{text}");
    assert!(text.contains("required: -r/--region <name>"), "{text}");
    assert!(text.contains("common optional: -v/--verbose"), "{text}");
    assert!(text.contains("[force] -> force_deploy"), "{text}");
    assert!(!text.contains("gc"), "{text}");

    let all = run(&Commands::Inspect {
        routes: file.path().to_path_buf(),
        all: true,
    })
    .unwrap();
    assert!(all.contains("gc [private] -> gc"), "{all}");
}

#[test]
fn test_resolve_json() {
    let file = create_temp_yaml(DEPLOY_TABLE);
    let text = run(&Commands::Resolve {
        routes: file.path().to_path_buf(),
        json: true,
        args: args(&["ship", "prod", "-r=eu", "--dry-run"]),
    })
    .unwrap();
    let report: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(report["outcome"], "completed");
    assert_eq!(report["route"], "/deploy/:env");
    assert_eq!(report["params"]["env"], "prod");
    assert_eq!(report["context"]["switches"]["region"][0], "eu");
}

#[test]
fn test_resolve_text_and_help() {
    let file = create_temp_yaml(DEPLOY_TABLE);
    let text = run(&Commands::Resolve {
        routes: file.path().to_path_buf(),
        json: false,
        args: args(&["run", "make", "--", "-j4"]),
    })
    .unwrap();
    assert!(text.starts_with("completed: /run/...args"), "{text}");

    let help = run(&Commands::Resolve {
        routes: file.path().to_path_buf(),
        json: false,
        args: args(&["deploy", "prod", "-h"]),
    })
    .unwrap();
    assert!(help.starts_with("help: /deploy/:env"), "{help}");
    assert!(help.contains("reason: help requested"), "{help}");
}

#[test]
fn test_resolve_errors_propagate() {
    let file = create_temp_yaml(DEPLOY_TABLE);
    let err = run(&Commands::Resolve {
        routes: file.path().to_path_buf(),
        json: false,
        args: args(&["deploy", "prod"]),
    })
    .unwrap_err();
    assert!(err.to_string().contains("required"), "{err}");
}

#[test]
fn test_check() {
    let good = create_temp_yaml(DEPLOY_TABLE);
    let text = run(&Commands::Check {
        routes: good.path().to_path_buf(),
    })
    .unwrap();
    assert!(text.starts_with("ok:"), "{text}");

    let bad = create_temp_yaml("routes:\n  - path: \"a/...rest/b\"\n");
    assert!(run(&Commands::Check {
        routes: bad.path().to_path_buf(),
    })
    .is_err());
}

#[test]
fn test_tokenizer_feeds_dispatch_input() {
    let input = tokenize(["deploy", "prod", "-vr=eu", "--", "--literal"]);
    assert_eq!(input.commands, vec!["deploy", "prod", "--literal"]);
    assert!(input.short_switches["v"].is_empty());
    assert_eq!(input.short_switches["r"], vec!["eu"]);
}
