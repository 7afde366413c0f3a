use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use verbrouter::pipeline::{Callback, CallbackOutcome, DispatchInput};
use verbrouter::router::{match_commands, match_switches, match_with_parameters};
use verbrouter::{RouteTree, Router, SwitchMap};

fn example_tree() -> RouteTree {
    let mut tree = RouteTree::new();
    for route in [
        "cloud/vm/list",
        "cloud/vm/:name",
        "cloud/vm/:name/start",
        "cloud/vm/:name/stop",
        "cloud/disk/:id/attach/:vm",
        "cloud/net/:id[format=json]",
        "cloud/net/:id[verbose]",
        "run/...args",
        "status",
        "status[json]",
    ] {
        if let Err(e) = tree.route(route) {
            panic!("bad route {route}: {e}");
        }
    }
    tree
}

fn bench_matching(c: &mut Criterion) {
    let tree = example_tree();

    c.bench_function("match_static", |b| {
        b.iter(|| match_commands(&tree, black_box(&["cloud", "vm", "list"])))
    });
    c.bench_function("match_dynamic_with_params", |b| {
        b.iter(|| match_with_parameters(&tree, black_box(&["cloud", "disk", "d1", "attach", "vm7"])))
    });
    c.bench_function("match_spread", |b| {
        b.iter(|| match_with_parameters(&tree, black_box(&["run", "make", "-j", "8", "all"])))
    });

    let net = match match_commands(&tree, &["cloud", "net", "n1"]) {
        Some(node) => node,
        None => panic!("net route missing"),
    };
    let mut long = SwitchMap::new();
    long.insert("verbose".into(), Vec::new());
    let short = SwitchMap::new();
    c.bench_function("match_switch_item", |b| {
        b.iter(|| match_switches(&tree, net, black_box(&short), black_box(&long)))
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let mut router = Router::default();
    if let Err(e) = router.on(
        "cloud/vm/:name/start",
        Callback::new(|_| Ok(CallbackOutcome::Continue)),
    ) {
        panic!("bad route: {e}");
    }
    let input = DispatchInput::new(["cloud", "vm", "web-1", "start"]);
    c.bench_function("dispatch_full", |b| b.iter(|| router.dispatch(black_box(&input))));
}

criterion_group!(benches, bench_matching, bench_dispatch);
criterion_main!(benches);
