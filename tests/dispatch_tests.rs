mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use verbrouter::config::{Config, HelpType};
use verbrouter::pipeline::{
    Callback, CallbackOutcome, DispatchHook, DispatchInput, DispatchRequest, HookDecision,
    TracingHook,
};
use verbrouter::switch::Switch;
use verbrouter::{DispatchOutcome, HelpReason, RouteError, Router};

use common::{object, tag};

fn ran(outcome: &DispatchOutcome) -> Option<String> {
    match outcome {
        DispatchOutcome::Completed { context, .. } => {
            context.get("ran").and_then(|v| v.as_str()).map(str::to_string)
        }
        _ => None,
    }
}

#[test]
fn test_switch_branch_end_to_end() {
    let mut router = Router::default();
    router.on("x/:p/y", tag("plain")).unwrap();
    router.on("x/:p/y[a=12]", tag("a12")).unwrap();

    let out = router
        .dispatch(&DispatchInput::new(["x", "K12", "y"]).short("a", ["12"]))
        .unwrap();
    assert_eq!(ran(&out).as_deref(), Some("a12"));
    assert_eq!(router.tree().full_path(out.node()), "/x/:p/y/[a=12]");

    let out = router.dispatch(&DispatchInput::new(["x", "K1", "y"])).unwrap();
    assert_eq!(ran(&out).as_deref(), Some("plain"));
}

#[test]
fn test_sibling_switch_items_select_exactly_one_branch() {
    let mut router = Router::default();
    router.on("x/:p/y[a=12]", tag("K12")).unwrap();
    router.on("x/:p/y[a=1]", tag("K1")).unwrap();

    let dispatch = |input: DispatchInput| ran(&router.dispatch(&input).unwrap());
    assert_eq!(dispatch(DispatchInput::new(["x", "v", "y"]).short("a", ["12"])).as_deref(), Some("K12"));
    assert_eq!(dispatch(DispatchInput::new(["x", "v", "y"]).short("a", ["1"])).as_deref(), Some("K1"));
    assert_eq!(dispatch(DispatchInput::new(["x", "v", "y"]).short("a", ["5"])), None);
    assert_eq!(dispatch(DispatchInput::new(["x", "v", "y"])), None);
}

#[test]
fn test_required_switch_through_dispatch() {
    let mut router = Router::default();
    let node = router.on("build", tag("build")).unwrap();
    router
        .tree_mut()
        .add_required_switch(node, Switch::new(Some("r"), Some("required")).unwrap());

    let err = router.dispatch(&DispatchInput::new(["build"])).unwrap_err();
    assert!(err.to_string().contains("required"));

    for input in [
        DispatchInput::new(["build"]).short("r", Vec::<String>::new()),
        DispatchInput::new(["build"]).long("required", Vec::<String>::new()),
    ] {
        assert_eq!(ran(&router.dispatch(&input).unwrap()).as_deref(), Some("build"));
    }

    let both = DispatchInput::new(["build"])
        .short("r", Vec::<String>::new())
        .long("required", Vec::<String>::new());
    let err = router.dispatch(&both).unwrap_err();
    assert!(err.to_string().contains("only one of"));
}

#[test]
fn test_callbacks_chain_context() {
    let mut router = Router::default();
    let node = router
        .on(
            "greet/:name",
            Callback::named("lookup", |args| {
                let name = args.path_params.get_str("name").unwrap_or("nobody");
                Ok(CallbackOutcome::Merge(object(json!({ "name": name }))))
            }),
        )
        .unwrap();
    router.tree_mut().add_callback(
        node,
        Callback::named("format", |args| {
            let name = args.context["name"].as_str().unwrap_or_default();
            Ok(CallbackOutcome::Merge(object(json!({ "greeting": format!("hello {name}") }))))
        }),
    );

    let out = router
        .dispatch_with_context(&DispatchInput::new(["greet", "ada"]), object(json!({"lang": "en"})))
        .unwrap();
    match out {
        DispatchOutcome::Completed { context, .. } => {
            assert_eq!(
                serde_json::Value::Object(context),
                json!({"lang": "en", "name": "ada", "greeting": "hello ada"})
            );
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[test]
fn test_stop_from_callback() {
    let mut router = Router::default();
    let node = router
        .on("halt", Callback::new(|_| Ok(CallbackOutcome::Stop)))
        .unwrap();
    router.tree_mut().add_callback(node, tag("never"));
    let out = router.dispatch(&DispatchInput::new(["halt"])).unwrap();
    assert!(matches!(out, DispatchOutcome::Stopped { node: n, .. } if n == node));
}

#[test]
fn test_outcome_carries_path_params() {
    let mut router = Router::default();
    router.on("copy/:src/...dst", tag("copy")).unwrap();
    router.on("halt/:why", Callback::new(|_| Ok(CallbackOutcome::Stop))).unwrap();

    let out = router.dispatch(&DispatchInput::new(["copy", "a.txt", "b", "c"])).unwrap();
    let params = out.path_params().unwrap();
    assert_eq!(params.get_str("src"), Some("a.txt"));
    assert_eq!(params.to_json(), json!({"src": "a.txt", "dst": ["b", "c"]}));

    let out = router.dispatch(&DispatchInput::new(["halt", "now"])).unwrap();
    assert_eq!(out.path_params().and_then(|p| p.get_str("why")), Some("now"));

    let help = Router::new(Config {
        help_on_no_target: true,
        ..Config::default()
    });
    let out = help.dispatch(&DispatchInput::new(["nothing"])).unwrap();
    assert!(out.path_params().is_none());
}

#[test]
fn test_help_outcomes() {
    let config = Config {
        help_type: Some(HelpType::Switch),
        help_on_no_target: true,
        help_on_asked_for_help: true,
        help_on_verify_switch_failure: true,
        help_on_no_callback: true,
        ..Config::default()
    };
    let mut router = Router::new(config);
    let node = router.on("deploy/:env", tag("deploy")).unwrap();
    router
        .tree_mut()
        .add_required_switch(node, Switch::long("region").unwrap());
    router.route("idle").unwrap();

    let reason = |input: DispatchInput| match router.dispatch(&input).unwrap() {
        DispatchOutcome::Help { reason, .. } => Some(reason),
        _ => None,
    };
    assert_eq!(reason(DispatchInput::new(["nope"])), Some(HelpReason::NoTarget));
    assert_eq!(
        reason(DispatchInput::new(["deploy", "prod"]).short("h", Vec::<String>::new())),
        Some(HelpReason::AskedForHelp)
    );
    assert_eq!(
        reason(DispatchInput::new(["deploy", "prod"])),
        Some(HelpReason::VerifySwitchFailure)
    );
    assert_eq!(reason(DispatchInput::new(["idle"])), Some(HelpReason::NoCallback));
    assert_eq!(
        reason(DispatchInput::new(["deploy", "prod"]).long("region", ["eu"])),
        None
    );
}

#[test]
fn test_no_match_error_without_help() {
    let router = Router::default();
    let err = router.dispatch(&DispatchInput::new(["anything"])).unwrap_err();
    assert!(matches!(err, RouteError::NoMatch { ref commands } if commands == &["anything"]));
}

struct ShortCircuit(AtomicUsize);

impl DispatchHook for ShortCircuit {
    fn before(&self, req: &DispatchRequest<'_>) -> Option<HookDecision> {
        self.0.fetch_add(1, Ordering::SeqCst);
        (req.route() == "/cached").then(|| HookDecision::Complete(object(json!({"cached": true}))))
    }
}

#[test]
fn test_hooks_run_in_order_and_can_answer() {
    let hook = Arc::new(ShortCircuit(AtomicUsize::new(0)));
    let mut router = Router::default();
    router.add_hook(Arc::new(TracingHook));
    router.add_hook(hook.clone());
    router.on("cached", tag("slow")).unwrap();
    router.on("fresh", tag("fresh")).unwrap();

    let out = router.dispatch(&DispatchInput::new(["cached"])).unwrap();
    match out {
        DispatchOutcome::Completed { context, .. } => {
            assert_eq!(context.get("cached"), Some(&json!(true)));
            assert!(context.get("ran").is_none());
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    let out = router.dispatch(&DispatchInput::new(["fresh"])).unwrap();
    assert_eq!(ran(&out).as_deref(), Some("fresh"));
    assert_eq!(hook.0.load(Ordering::SeqCst), 2);
}

#[test]
fn test_callback_failure_surfaces() {
    let mut router = Router::default();
    router
        .on("fail", Callback::named("boom", |_| Err("exploded".into())))
        .unwrap();
    let err = router.dispatch(&DispatchInput::new(["fail"])).unwrap_err();
    assert!(matches!(err, RouteError::Callback { index: 0, .. }));
    assert!(err.to_string().contains("/fail"));
}
