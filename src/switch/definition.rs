use std::fmt;

use crate::error::RouteError;

/// A switch definition attached to a path item.
///
/// A switch has a shortname (exactly one character, used as `-r`), a longname
/// (two or more characters, used as `--required`), or both. The default value
/// only has an effect for optional switches: it is surfaced to callbacks when
/// the switch is absent at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    short: Option<String>,
    long: Option<String>,
    description: String,
    parameters: Vec<String>,
    default: Option<Vec<String>>,
}

impl Switch {
    /// Create a switch, validating the name shapes.
    ///
    /// # Errors
    ///
    /// * [`RouteError::SwitchWithoutName`] if both names are `None`
    /// * [`RouteError::InvalidShortName`] if the shortname is not one ASCII
    ///   letter or digit
    /// * [`RouteError::InvalidLongName`] if the longname is shorter than two
    ///   characters or is not `[A-Za-z0-9][A-Za-z0-9_-]*`
    pub fn new(short: Option<&str>, long: Option<&str>) -> Result<Self, RouteError> {
        if short.is_none() && long.is_none() {
            return Err(RouteError::SwitchWithoutName);
        }
        if let Some(s) = short {
            if !is_short_name(s) {
                return Err(RouteError::InvalidShortName { name: s.to_string() });
            }
        }
        if let Some(l) = long {
            if !is_long_name(l) {
                return Err(RouteError::InvalidLongName { name: l.to_string() });
            }
        }
        Ok(Self {
            short: short.map(str::to_string),
            long: long.map(str::to_string),
            description: String::new(),
            parameters: Vec::new(),
            default: None,
        })
    }

    /// Shorthand for a switch with only a shortname.
    pub fn short(name: &str) -> Result<Self, RouteError> {
        Self::new(Some(name), None)
    }

    /// Shorthand for a switch with only a longname.
    pub fn long(name: &str) -> Result<Self, RouteError> {
        Self::new(None, Some(name))
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Names of the values this switch expects, e.g. `["file"]` for `--output <file>`.
    #[must_use]
    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_default<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn short_name(&self) -> Option<&str> {
        self.short.as_deref()
    }

    #[must_use]
    pub fn long_name(&self) -> Option<&str> {
        self.long.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&[String]> {
        self.default.as_deref()
    }

    /// Both names of the switch, short first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.short.as_deref().into_iter().chain(self.long.as_deref())
    }
}

fn is_short_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_alphanumeric())
}

fn is_long_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
        && name.len() >= 2
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl fmt::Display for Switch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.short, &self.long) {
            (Some(s), Some(l)) => write!(f, "-{s}/--{l}"),
            (Some(s), None) => write!(f, "-{s}"),
            (None, Some(l)) => write!(f, "--{l}"),
            (None, None) => f.write_str("<unnamed>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_switch_requires_a_name() {
        let err = Switch::new(None, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SwitchDefinition);
    }

    #[test]
    fn test_name_shapes() {
        assert!(Switch::new(Some("r"), Some("required")).is_ok());
        assert!(matches!(
            Switch::short("rr"),
            Err(RouteError::InvalidShortName { .. })
        ));
        assert!(matches!(
            Switch::long("r"),
            Err(RouteError::InvalidLongName { .. })
        ));
        assert!(Switch::long("dry run").is_err());
        assert!(Switch::long("dry-run_2").is_ok());
        assert!(matches!(
            Switch::long("a=b"),
            Err(RouteError::InvalidLongName { .. })
        ));
        assert!(Switch::long("-verbose").is_err());
        assert!(matches!(
            Switch::short("["),
            Err(RouteError::InvalidShortName { .. })
        ));
        assert!(Switch::short("-").is_err());
    }

    #[test]
    fn test_display_and_names() {
        let sw = Switch::new(Some("r"), Some("required")).unwrap();
        assert_eq!(sw.to_string(), "-r/--required");
        assert_eq!(sw.names().collect::<Vec<_>>(), vec!["r", "required"]);
        assert_eq!(Switch::long("verbose").unwrap().to_string(), "--verbose");
    }

    #[test]
    fn test_builder_fields() {
        let sw = Switch::long("output")
            .unwrap()
            .with_description("Where to write")
            .with_parameters(["file"])
            .with_default(["out.txt"]);
        assert_eq!(sw.description(), "Where to write");
        assert_eq!(sw.parameters(), ["file".to_string()]);
        assert_eq!(sw.default_value(), Some(&["out.txt".to_string()][..]));
    }
}
