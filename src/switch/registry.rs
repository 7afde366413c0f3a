use std::collections::HashMap;

use super::Switch;

/// Ordered switch storage with constant-time lookup by short or long name.
///
/// Declaration order is preserved so that "first missing required switch"
/// reporting is deterministic.
#[derive(Debug, Clone, Default)]
pub struct SwitchSet {
    switches: Vec<Switch>,
    by_short: HashMap<String, usize>,
    by_long: HashMap<String, usize>,
}

impl SwitchSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a switch. A later switch reusing a name shadows the earlier one
    /// for lookups.
    pub fn insert(&mut self, switch: Switch) {
        let index = self.switches.len();
        if let Some(s) = switch.short_name() {
            self.by_short.insert(s.to_string(), index);
        }
        if let Some(l) = switch.long_name() {
            self.by_long.insert(l.to_string(), index);
        }
        self.switches.push(switch);
    }

    #[must_use]
    pub fn by_short(&self, name: &str) -> Option<&Switch> {
        self.by_short.get(name).map(|&i| &self.switches[i])
    }

    #[must_use]
    pub fn by_long(&self, name: &str) -> Option<&Switch> {
        self.by_long.get(name).map(|&i| &self.switches[i])
    }

    /// Whether either a short or a long switch uses `name`.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.by_short.contains_key(name) || self.by_long.contains_key(name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Switch> {
        self.switches.iter()
    }

    /// Every short and long name in the set.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_short.keys().chain(self.by_long.keys()).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.switches.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.switches.is_empty()
    }
}

impl<'a> IntoIterator for &'a SwitchSet {
    type Item = &'a Switch;
    type IntoIter = std::slice::Iter<'a, Switch>;

    fn into_iter(self) -> Self::IntoIter {
        self.switches.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_either_name() {
        let mut set = SwitchSet::new();
        set.insert(Switch::new(Some("r"), Some("required")).unwrap());
        set.insert(Switch::long("verbose").unwrap());

        assert_eq!(set.len(), 2);
        assert_eq!(set.by_short("r").unwrap().long_name(), Some("required"));
        assert_eq!(set.by_long("required").unwrap().short_name(), Some("r"));
        assert!(set.by_short("v").is_none());
        assert!(set.contains_name("verbose"));
        assert!(!set.contains_name("quiet"));
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let mut set = SwitchSet::new();
        set.insert(Switch::long("beta").unwrap());
        set.insert(Switch::long("alpha").unwrap());
        let order: Vec<_> = set.iter().filter_map(Switch::long_name).collect();
        assert_eq!(order, vec!["beta", "alpha"]);
    }
}
