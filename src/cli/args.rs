//! Minimal argument tokenizer for the `resolve` command.
//!
//! - `--name` is a long switch without a value, `--name=value` carries one
//! - `-abc` is three short switches, `-a=value` is one short switch with a value
//! - a bare `-` and everything after `--` are positional
//! - repeating a switch appends its values

use crate::pipeline::DispatchInput;

pub fn tokenize<I, S>(args: I) -> DispatchInput
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut input = DispatchInput::default();
    let mut positional_only = false;

    for arg in args {
        let arg = arg.as_ref();
        if positional_only || arg == "-" || !arg.starts_with('-') {
            input.commands.push(arg.to_string());
            continue;
        }
        if arg == "--" {
            positional_only = true;
            continue;
        }

        if let Some(long) = arg.strip_prefix("--") {
            let (name, value) = split_value(long);
            let values = input.long_switches.entry(name.to_string()).or_default();
            values.extend(value.map(str::to_string));
        } else if let Some(cluster) = arg.strip_prefix('-') {
            let (names, value) = split_value(cluster);
            let mut chars = names.chars().peekable();
            while let Some(c) = chars.next() {
                let values = input.short_switches.entry(c.to_string()).or_default();
                // A value binds to the last switch of a cluster.
                if chars.peek().is_none() {
                    values.extend(value.map(str::to_string));
                }
            }
        }
    }
    input
}

fn split_value(text: &str) -> (&str, Option<&str>) {
    match text.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (text, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_and_switches() {
        let input = tokenize(["deploy", "prod", "--dry-run", "-r=eu", "--tag=a", "--tag=b"]);
        assert_eq!(input.commands, vec!["deploy", "prod"]);
        assert!(input.long_switches["dry-run"].is_empty());
        assert_eq!(input.short_switches["r"], vec!["eu"]);
        assert_eq!(input.long_switches["tag"], vec!["a", "b"]);
    }

    #[test]
    fn test_short_cluster() {
        let input = tokenize(["-vx=1"]);
        assert!(input.short_switches["v"].is_empty());
        assert_eq!(input.short_switches["x"], vec!["1"]);
    }

    #[test]
    fn test_double_dash_ends_switches() {
        let input = tokenize(["run", "--", "-v", "--all", "-"]);
        assert_eq!(input.commands, vec!["run", "-v", "--all", "-"]);
        assert!(input.short_switches.is_empty());
        assert!(input.long_switches.is_empty());
    }
}
