use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum number of path parameters before heap allocation.
/// Command routes rarely bind more than a handful of parameters.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Value bound by a dynamic (`:name`) or spread (`...name`) path item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// The single token consumed by a dynamic path item.
    One(String),
    /// Every remaining token consumed by a spread path item.
    Many(Vec<String>),
}

impl ParamValue {
    /// The single value, or `None` for a spread list.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::One(v) => Some(v.as_str()),
            ParamValue::Many(_) => None,
        }
    }

    /// The values as a slice; a single value is a one-element slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            ParamValue::One(v) => std::slice::from_ref(v),
            ParamValue::Many(vs) => vs.as_slice(),
        }
    }
}

/// Path parameters bound while matching, in binding order.
///
/// Param names use `Arc<str>` because they come from the route tree and are
/// cloned on every match; values are per-dispatch data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(SmallVec<[(Arc<str>, ParamValue); MAX_INLINE_PARAMS]>);

impl PathParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: &str, value: ParamValue) {
        self.0.push((Arc::from(name), value));
    }

    /// Get a parameter by name.
    ///
    /// Uses "last write wins" semantics if a name is bound twice along a path
    /// (e.g. `/org/:id/user/:id`).
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    /// Shorthand for a single-token parameter.
    #[inline]
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to a name → value map.
    /// Note: This allocates - use `get()` in hot paths instead
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, ParamValue> {
        self.0
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// JSON object view, used when parameters are handed to callbacks as context.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .0
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    ParamValue::One(s) => serde_json::Value::from(s.as_str()),
                    ParamValue::Many(vs) => serde_json::Value::from(vs.clone()),
                };
                (k.to_string(), value)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins() {
        let mut params = PathParams::new();
        params.push("id", ParamValue::One("org".into()));
        params.push("id", ParamValue::One("user".into()));
        assert_eq!(params.get_str("id"), Some("user"));
        assert_eq!(params.len(), 2);
        assert_eq!(params.to_map().len(), 1);
    }

    #[test]
    fn test_spread_values() {
        let mut params = PathParams::new();
        params.push("rest", ParamValue::Many(vec!["a".into(), "b".into()]));
        let rest = params.get("rest").unwrap();
        assert_eq!(rest.as_slice(), ["a".to_string(), "b".to_string()]);
        assert!(rest.as_str().is_none());
        assert_eq!(params.to_json(), serde_json::json!({ "rest": ["a", "b"] }));
    }
}
