use serde_json::json;

use crate::pipeline::{Callback, CallbackOutcome, Context};

/// Callback that echoes the dispatch back as context, named after `handler`.
///
/// Merges `handler`, `route`, `commands`, `params` and `switches` (the merged
/// switch view, so both names and defaults show up).
pub fn echo_callback(handler: &str) -> Callback {
    let name = handler.to_string();
    Callback::named(handler, move |args| {
        let mut out = Context::new();
        out.insert("handler".into(), json!(name));
        out.insert("route".into(), json!(args.tree.full_path(args.node)));
        out.insert("commands".into(), json!(args.commands));
        out.insert("params".into(), args.path_params.to_json());
        out.insert("switches".into(), json!(args.merged_switches));
        Ok(CallbackOutcome::Merge(out))
    })
}
