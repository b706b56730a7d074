// ============================================================================
// argot-core/src/schema.rs
// ============================================================================
//
// COMMAND SCHEMA: Static description of commands and their options
//
// KEY COMPONENTS:
// - CommandDescriptor: name, description and ordered options of one command
// - ParameterDescriptor: one bindable option (long/short name, shape, default)
// - TargetShape / ScalarKind: what a raw string must be converted into
// - Value: a converted option value
//
// Descriptors are built once when commands are registered and are read-only
// afterwards. They are usually produced by `CommandDefinition::descriptor`.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDateTime;

use crate::input::OptionKey;

// ============================================================================
// TARGET TYPES
// ============================================================================

/// Primitive type a single raw value is converted into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarKind {
    Text,
    Integer,
    Float,
    Boolean,
    Char,
    DateTime,
    Duration,
    /// One of a fixed set of symbols, matched case-insensitively.
    Enum(Vec<String>),
}

impl ScalarKind {
    /// Builds an enumerated kind from its symbols.
    pub fn symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScalarKind::Enum(symbols.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Text => write!(f, "text"),
            ScalarKind::Integer => write!(f, "integer"),
            ScalarKind::Float => write!(f, "floating point number"),
            ScalarKind::Boolean => write!(f, "boolean"),
            ScalarKind::Char => write!(f, "character"),
            ScalarKind::DateTime => write!(f, "date/time"),
            ScalarKind::Duration => write!(f, "duration"),
            ScalarKind::Enum(symbols) => write!(f, "one of [{}]", symbols.join(", ")),
        }
    }
}

/// Shape of the value an option binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetShape {
    /// Present means `true`; takes no value (or a boolean literal).
    Flag,
    /// A single value; the last supplied one wins.
    Scalar(ScalarKind),
    /// Any number of values, converted one by one, in input order.
    Sequence(ScalarKind),
}

impl fmt::Display for TargetShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetShape::Flag => write!(f, "flag"),
            TargetShape::Scalar(kind) => write!(f, "{kind}"),
            TargetShape::Sequence(kind) => write!(f, "list of {kind}"),
        }
    }
}

// ============================================================================
// VALUES
// ============================================================================

/// A converted option value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Char(char),
    DateTime(NaiveDateTime),
    Duration(Duration),
    /// Symbol in its declared spelling.
    Enum(String),
    List(Vec<Value>),
}

impl Value {
    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Char(_) => "character",
            Value::DateTime(_) => "date/time",
            Value::Duration(_) => "duration",
            Value::Enum(_) => "enum",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
            Value::Duration(v) => write!(f, "{}s", v.as_secs_f64()),
            Value::Enum(v) => write!(f, "{v}"),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// Describes one bindable option of a command.
///
/// # Examples
///
/// ```rust
/// use argot_core::schema::{ParameterDescriptor, ScalarKind};
///
/// let separator = ParameterDescriptor::scalar(ScalarKind::Text)
///     .short('s')
///     .long("separator")
///     .default_value("")
///     .description("String separator.");
/// assert_eq!(separator.display_name(), "-s|--separator");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub long_name: Option<String>,
    pub short_name: Option<char>,
    pub required: bool,
    pub shape: TargetShape,
    pub description: Option<String>,
    pub default: Option<Value>,
}

impl ParameterDescriptor {
    /// Creates an unnamed, optional parameter of the given shape.
    pub fn new(shape: TargetShape) -> Self {
        Self {
            long_name: None,
            short_name: None,
            required: false,
            shape,
            description: None,
            default: None,
        }
    }

    pub fn flag() -> Self {
        Self::new(TargetShape::Flag)
    }

    pub fn scalar(kind: ScalarKind) -> Self {
        Self::new(TargetShape::Scalar(kind))
    }

    pub fn sequence(kind: ScalarKind) -> Self {
        Self::new(TargetShape::Sequence(kind))
    }

    pub fn long(mut self, name: impl Into<String>) -> Self {
        self.long_name = Some(name.into());
        self
    }

    pub fn short(mut self, name: char) -> Self {
        self.short_name = Some(name);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// True when `key` addresses this parameter.
    pub fn matches(&self, key: &OptionKey) -> bool {
        match key {
            OptionKey::Short(c) => self.short_name == Some(*c),
            OptionKey::Long(name) => self.long_name.as_deref() == Some(name.as_str()),
        }
    }

    /// True when `alias` is this parameter's long name or its short character.
    pub fn answers_to(&self, alias: &str) -> bool {
        if self.long_name.as_deref() == Some(alias) {
            return true;
        }
        let mut chars = alias.chars();
        matches!((chars.next(), chars.next(), self.short_name), (Some(c), None, Some(s)) if c == s)
    }

    /// Keys this parameter can be supplied under, short first.
    pub fn keys(&self) -> Vec<OptionKey> {
        let mut keys = Vec::with_capacity(2);
        if let Some(c) = self.short_name {
            keys.push(OptionKey::Short(c));
        }
        if let Some(name) = &self.long_name {
            keys.push(OptionKey::Long(name.clone()));
        }
        keys
    }

    /// `-s|--separator`, `-s` or `--separator`.
    pub fn display_name(&self) -> String {
        self.keys()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Value a parameter holds when it was not supplied.
    pub fn implicit_default(&self) -> Option<Value> {
        match (&self.default, &self.shape) {
            (Some(value), _) => Some(value.clone()),
            (None, TargetShape::Flag) => Some(Value::Bool(false)),
            (None, TargetShape::Sequence(_)) => Some(Value::List(Vec::new())),
            (None, TargetShape::Scalar(_)) => None,
        }
    }
}

impl fmt::Display for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Static shape of one command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDescriptor {
    /// `None` for the default command. `"a b"` is a child of `"a"`.
    pub name: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<ParameterDescriptor>,
}

impl CommandDescriptor {
    /// Creates a named command with no options.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
            parameters: Vec::new(),
        }
    }

    /// Creates the default (nameless) command.
    pub fn default_command() -> Self {
        Self {
            name: None,
            description: None,
            parameters: Vec::new(),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn is_default(&self) -> bool {
        self.name.is_none()
    }

    /// Human readable name, `(default)` for the nameless command.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("(default)")
    }

    pub fn find_parameter(&self, key: &OptionKey) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|p| p.matches(key))
    }
}

impl fmt::Display for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(name) = &self.name {
            parts.push(name.clone());
        }
        parts.extend(self.parameters.iter().map(|p| format!("[{p}]")));
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_defaults_follow_shape() {
        assert_eq!(
            ParameterDescriptor::flag().short('v').implicit_default(),
            Some(Value::Bool(false))
        );
        assert_eq!(
            ParameterDescriptor::sequence(ScalarKind::Text).short('i').implicit_default(),
            Some(Value::List(Vec::new()))
        );
        assert_eq!(
            ParameterDescriptor::scalar(ScalarKind::Integer).short('n').implicit_default(),
            None
        );
        assert_eq!(
            ParameterDescriptor::scalar(ScalarKind::Text)
                .short('s')
                .default_value("")
                .implicit_default(),
            Some(Value::Text(String::new()))
        );
    }

    #[test]
    fn parameter_answers_to_both_aliases() {
        let parameter = ParameterDescriptor::scalar(ScalarKind::Text).short('m').long("msg");
        assert!(parameter.answers_to("m"));
        assert!(parameter.answers_to("msg"));
        assert!(!parameter.answers_to("x"));
        assert!(parameter.matches(&OptionKey::Short('m')));
        assert!(parameter.matches(&OptionKey::Long("msg".to_string())));
        assert!(!parameter.matches(&OptionKey::Long("m".to_string())));
    }

    #[test]
    fn command_display_lists_options() {
        let command = CommandDescriptor::named("div")
            .parameter(ParameterDescriptor::scalar(ScalarKind::Integer).short('D'))
            .parameter(ParameterDescriptor::scalar(ScalarKind::Integer).short('d').long("divisor"));
        assert_eq!(command.to_string(), "div [-D] [-d|--divisor]");
        assert_eq!(CommandDescriptor::default_command().label(), "(default)");
    }
}
