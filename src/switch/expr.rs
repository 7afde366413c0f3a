//! Bracket switch predicates.
//!
//! A switch path item is written as one or more bracket groups at the end of a
//! route, e.g. `deploy[env=prod][force]`. Each group is a [`SwitchExpression`]:
//!
//! ```text
//! switchExpr := '[' switchId ('=' value)? ']'
//! value      := bareToken | "'" text "'" | '"' text '"'
//! ```
//!
//! Quoted values may contain `]`, `=`, `/` and the other quote character.
//! Whatever the original quoting, a quoted value is written back wrapped in
//! single quotes.

use smallvec::SmallVec;
use std::fmt;

use crate::error::RouteError;

/// Ordered predicates of one switch path item; they are ANDed together.
pub type Predicates = SmallVec<[SwitchExpression; 4]>;

/// The literal side of a valued predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExprValue {
    text: String,
    quoted: bool,
}

impl ExprValue {
    #[must_use]
    pub fn bare(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: false,
        }
    }

    #[must_use]
    pub fn quoted(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quoted: true,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }
}

/// One bracket predicate: `[id]` tests presence, `[id=value]` tests a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SwitchExpression {
    id: String,
    value: Option<ExprValue>,
}

impl SwitchExpression {
    #[must_use]
    pub fn presence(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: None,
        }
    }

    #[must_use]
    pub fn valued(id: impl Into<String>, value: ExprValue) -> Self {
        Self {
            id: id.into(),
            value: Some(value),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn value(&self) -> Option<&ExprValue> {
        self.value.as_ref()
    }

    /// Test the predicate against the values supplied for its switch.
    ///
    /// Presence-only predicates accept any value list; valued predicates need
    /// one runtime value equal to the literal.
    #[must_use]
    pub fn accepts(&self, runtime_values: &[String]) -> bool {
        match &self.value {
            None => true,
            Some(expected) => runtime_values.iter().any(|v| v == expected.as_str()),
        }
    }
}

impl fmt::Display for SwitchExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            None => write!(f, "[{}]", self.id),
            Some(v) if v.quoted => write!(f, "[{}='{}']", self.id, v.text),
            Some(v) => write!(f, "[{}={}]", self.id, v.text),
        }
    }
}

/// Serialize predicates back to bracket form.
#[must_use]
pub fn to_route_text(expressions: &[SwitchExpression]) -> String {
    expressions.iter().map(ToString::to_string).collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InBrackets,
    InSingleQuote,
    InDoubleQuote,
}

/// Parse a run of bracket predicates.
///
/// Only whitespace may appear between groups. The scan is a single pass over
/// the input.
///
/// # Errors
///
/// Returns a parse-category [`RouteError`] for a stray or unmatched bracket,
/// an empty switch id, a non-whitespace character outside brackets, or bad
/// quoting.
pub fn parse(text: &str) -> Result<Predicates, RouteError> {
    let mut expressions = Predicates::new();
    let mut state = ScanState::Normal;
    let mut raw = String::new();
    let mut opened_at = 0;

    for (position, c) in text.char_indices() {
        match state {
            ScanState::Normal => match c {
                '[' => {
                    raw.clear();
                    opened_at = position;
                    state = ScanState::InBrackets;
                }
                ']' => {
                    return Err(RouteError::UnmatchedCloseBracket {
                        input: text.to_string(),
                        position,
                    })
                }
                c if c.is_whitespace() => {}
                found => {
                    return Err(RouteError::UnexpectedCharacter {
                        input: text.to_string(),
                        found,
                    })
                }
            },
            ScanState::InBrackets => match c {
                ']' => {
                    expressions.push(split_expression(&raw, text)?);
                    state = ScanState::Normal;
                }
                '[' => {
                    return Err(RouteError::UnclosedBracket {
                        input: text.to_string(),
                        position: opened_at,
                    })
                }
                '\'' => {
                    raw.push(c);
                    state = ScanState::InSingleQuote;
                }
                '"' => {
                    raw.push(c);
                    state = ScanState::InDoubleQuote;
                }
                _ => raw.push(c),
            },
            ScanState::InSingleQuote => {
                raw.push(c);
                if c == '\'' {
                    state = ScanState::InBrackets;
                }
            }
            ScanState::InDoubleQuote => {
                raw.push(c);
                if c == '"' {
                    state = ScanState::InBrackets;
                }
            }
        }
    }

    match state {
        ScanState::Normal => Ok(expressions),
        ScanState::InBrackets => Err(RouteError::UnclosedBracket {
            input: text.to_string(),
            position: opened_at,
        }),
        ScanState::InSingleQuote | ScanState::InDoubleQuote => {
            Err(RouteError::BadQuoting { expression: raw })
        }
    }
}

/// Split the raw text of one bracket group on its first unquoted `=`.
fn split_expression(raw: &str, input: &str) -> Result<SwitchExpression, RouteError> {
    let mut quote: Option<char> = None;
    let mut split_at = None;
    for (i, c) in raw.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '=') => {
                split_at = Some(i);
                break;
            }
            _ => {}
        }
    }

    let (id, value) = match split_at {
        Some(i) => (raw[..i].trim(), Some(raw[i + 1..].trim())),
        None => (raw.trim(), None),
    };

    if id.is_empty() {
        return Err(RouteError::EmptySwitchId {
            input: input.to_string(),
        });
    }
    if id.contains(['\'', '"']) {
        return Err(RouteError::BadQuoting {
            expression: raw.to_string(),
        });
    }
    if let Some(found) = id.chars().find(|c| c.is_whitespace()) {
        return Err(RouteError::UnexpectedCharacter {
            input: input.to_string(),
            found,
        });
    }

    let value = match value {
        None => None,
        Some(v) => Some(parse_value(v, raw)?),
    };
    Ok(SwitchExpression {
        id: id.to_string(),
        value,
    })
}

fn parse_value(value: &str, raw: &str) -> Result<ExprValue, RouteError> {
    let bad = || RouteError::BadQuoting {
        expression: raw.to_string(),
    };
    match value.chars().next() {
        Some(q @ ('\'' | '"')) => {
            if value.len() < 2 || !value.ends_with(q) {
                return Err(bad());
            }
            let inner = &value[1..value.len() - 1];
            if inner.contains(q) {
                return Err(bad());
            }
            Ok(ExprValue::quoted(inner))
        }
        _ if value.contains(['\'', '"']) => Err(bad()),
        _ => Ok(ExprValue::bare(value)),
    }
}
