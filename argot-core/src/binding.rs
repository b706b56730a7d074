//! Binding parsed options onto a resolved command.
//!
//! [`bind`] walks the command's parameters, collects the raw values supplied
//! under either alias, converts them and produces a [`BoundCommand`]. Every
//! problem is accumulated; binding either succeeds completely or returns the
//! full list of [`ValidationError`]s.

use std::time::Duration;

use chrono::NaiveDateTime;
use log::debug;

use crate::conversion::ValueConverter;
use crate::error::{BindError, ValidationError};
use crate::input::{OptionKey, ParsedInput};
use crate::schema::{CommandDescriptor, ParameterDescriptor, TargetShape, Value};

/// A command's options after conversion and validation.
///
/// Holds one optional value per parameter of the descriptor, in declaration
/// order. Command factories read them back with [`BoundCommand::get`].
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCommand<'a> {
    descriptor: &'a CommandDescriptor,
    values: Vec<Option<Value>>,
}

impl<'a> BoundCommand<'a> {
    pub fn descriptor(&self) -> &'a CommandDescriptor {
        self.descriptor
    }

    /// Raw access by long name or short character.
    pub fn value(&self, alias: &str) -> Result<Option<&Value>, BindError> {
        self.descriptor
            .parameters
            .iter()
            .position(|p| p.answers_to(alias))
            .map(|index| self.values[index].as_ref())
            .ok_or_else(|| BindError::UnknownOption(alias.to_string()))
    }

    /// Typed access by long name or short character.
    ///
    /// ```rust
    /// # use argot_core::schema::{CommandDescriptor, ParameterDescriptor, ScalarKind};
    /// # use argot_core::{bind, tokenize, DefaultValueConverter};
    /// let descriptor = CommandDescriptor::named("concat")
    ///     .parameter(ParameterDescriptor::sequence(ScalarKind::Text).short('i'));
    /// let input = tokenize(["concat", "-i", "a", "b"]);
    /// let bound = bind(&descriptor, &input, &DefaultValueConverter).unwrap();
    /// let inputs: Vec<String> = bound.get("i").unwrap();
    /// assert_eq!(inputs, ["a", "b"]);
    /// ```
    pub fn get<T: FromValue>(&self, alias: &str) -> Result<T, BindError> {
        let value = self.value(alias)?;
        T::from_value(alias, value)
    }

    /// Iterates parameters together with their bound values.
    pub fn iter(&self) -> impl Iterator<Item = (&'a ParameterDescriptor, Option<&Value>)> + '_ {
        self.descriptor.parameters.iter().zip(self.values.iter().map(Option::as_ref))
    }
}

// ============================================================================
// TYPED ACCESS
// ============================================================================

/// Types a bound option value can be read back as.
pub trait FromValue: Sized {
    fn from_value(option: &str, value: Option<&Value>) -> Result<Self, BindError>;
}

fn mismatch(option: &str, expected: &'static str, actual: &Value) -> BindError {
    BindError::TypeMismatch {
        option: option.to_string(),
        expected,
        actual: actual.type_name().to_string(),
    }
}

fn require<'v>(option: &str, value: Option<&'v Value>) -> Result<&'v Value, BindError> {
    value.ok_or_else(|| BindError::MissingValue(option.to_string()))
}

impl FromValue for String {
    fn from_value(option: &str, value: Option<&Value>) -> Result<Self, BindError> {
        match require(option, value)? {
            Value::Text(text) | Value::Enum(text) => Ok(text.clone()),
            Value::Char(c) => Ok(c.to_string()),
            other => Err(mismatch(option, "text", other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(option: &str, value: Option<&Value>) -> Result<Self, BindError> {
        match require(option, value)? {
            Value::Bool(flag) => Ok(*flag),
            other => Err(mismatch(option, "boolean", other)),
        }
    }
}

impl FromValue for char {
    fn from_value(option: &str, value: Option<&Value>) -> Result<Self, BindError> {
        match require(option, value)? {
            Value::Char(c) => Ok(*c),
            other => Err(mismatch(option, "character", other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(option: &str, value: Option<&Value>) -> Result<Self, BindError> {
        match require(option, value)? {
            Value::Integer(number) => Ok(*number),
            other => Err(mismatch(option, "integer", other)),
        }
    }
}

macro_rules! narrowing_from_value {
    ($($target:ty),*) => {
        $(
            impl FromValue for $target {
                fn from_value(option: &str, value: Option<&Value>) -> Result<Self, BindError> {
                    let wide = i64::from_value(option, value)?;
                    <$target>::try_from(wide).map_err(|_| BindError::TypeMismatch {
                        option: option.to_string(),
                        expected: stringify!($target),
                        actual: format!("out-of-range integer {wide}"),
                    })
                }
            }
        )*
    };
}

narrowing_from_value!(i32, u32, u64, usize);

impl FromValue for f64 {
    fn from_value(option: &str, value: Option<&Value>) -> Result<Self, BindError> {
        match require(option, value)? {
            Value::Float(number) => Ok(*number),
            Value::Integer(number) => Ok(*number as f64),
            other => Err(mismatch(option, "float", other)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(option: &str, value: Option<&Value>) -> Result<Self, BindError> {
        match require(option, value)? {
            Value::DateTime(moment) => Ok(*moment),
            other => Err(mismatch(option, "date/time", other)),
        }
    }
}

impl FromValue for Duration {
    fn from_value(option: &str, value: Option<&Value>) -> Result<Self, BindError> {
        match require(option, value)? {
            Value::Duration(span) => Ok(*span),
            other => Err(mismatch(option, "duration", other)),
        }
    }
}

impl FromValue for Value {
    fn from_value(option: &str, value: Option<&Value>) -> Result<Self, BindError> {
        require(option, value).cloned()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(option: &str, value: Option<&Value>) -> Result<Self, BindError> {
        match value {
            None => Ok(None),
            Some(inner) => T::from_value(option, Some(inner)).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(option: &str, value: Option<&Value>) -> Result<Self, BindError> {
        match value {
            None => Ok(Vec::new()),
            Some(Value::List(items)) => items
                .iter()
                .map(|item| T::from_value(option, Some(item)))
                .collect(),
            Some(other) => Err(mismatch(option, "list", other)),
        }
    }
}

// ============================================================================
// BINDING
// ============================================================================

/// Converts and validates `input`'s options against `descriptor`.
///
/// Occurrences under the short and the long alias of one parameter are
/// read in the order they were typed: sequences concatenate their values,
/// scalars and flags take the last occurrence.
pub fn bind<'a>(
    descriptor: &'a CommandDescriptor,
    input: &ParsedInput,
    converter: &dyn ValueConverter,
) -> Result<BoundCommand<'a>, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut values = Vec::with_capacity(descriptor.parameters.len());

    for parameter in &descriptor.parameters {
        let keys = parameter.keys();
        let supplied: Vec<_> = input.options.iter().filter(|o| keys.contains(&o.key)).collect();

        if supplied.is_empty() {
            if parameter.required {
                errors.push(ValidationError::MissingRequired {
                    option: parameter.display_name(),
                });
            }
            values.push(parameter.implicit_default());
            continue;
        }

        let raw: Vec<String> = match parameter.shape {
            TargetShape::Sequence(_) => supplied
                .iter()
                .flat_map(|o| o.values.iter().cloned())
                .collect(),
            _ => supplied.last().map(|o| o.values.clone()).unwrap_or_default(),
        };

        match converter.convert(&raw, &parameter.shape) {
            Ok(value) => values.push(Some(value)),
            Err(source) => {
                errors.push(ValidationError::Conversion {
                    option: parameter.display_name(),
                    source,
                });
                values.push(None);
            }
        }
    }

    // Reported once per key, however often it was repeated.
    let mut unrecognized: Vec<&OptionKey> = Vec::new();
    for option in &input.options {
        let key = &option.key;
        if descriptor.find_parameter(key).is_none() && !unrecognized.contains(&key) {
            unrecognized.push(key);
            errors.push(ValidationError::Unrecognized {
                option: key.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(BoundCommand { descriptor, values })
    } else {
        debug!(
            "Binding command '{}' failed with {} error(s)",
            descriptor.label(),
            errors.len()
        );
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::DefaultValueConverter;
    use crate::input::tokenize;
    use crate::schema::ScalarKind;
    use proptest::prelude::*;

    fn concat() -> CommandDescriptor {
        CommandDescriptor::default_command()
            .parameter(
                ParameterDescriptor::sequence(ScalarKind::Text)
                    .short('i')
                    .long("inputs")
                    .required(),
            )
            .parameter(
                ParameterDescriptor::scalar(ScalarKind::Text)
                    .short('s')
                    .long("separator")
                    .default_value(""),
            )
    }

    fn bind_args<'a>(
        descriptor: &'a CommandDescriptor,
        args: &[&str],
    ) -> Result<BoundCommand<'a>, Vec<ValidationError>> {
        bind(descriptor, &tokenize(args), &DefaultValueConverter)
    }

    #[test]
    fn binds_sequence_and_scalar() {
        let descriptor = concat();
        let bound = bind_args(&descriptor, &["-i", "foo", "-i", "bar", "-s", " "]).unwrap();
        assert_eq!(bound.get::<Vec<String>>("i").unwrap(), vec!["foo", "bar"]);
        assert_eq!(bound.get::<String>("separator").unwrap(), " ");
    }

    #[test]
    fn unsupplied_optional_keeps_default() {
        let descriptor = concat();
        let bound = bind_args(&descriptor, &["-i", "x"]).unwrap();
        assert_eq!(bound.get::<String>("s").unwrap(), "");
    }

    #[test]
    fn unsupplied_sequence_is_empty() {
        let descriptor = CommandDescriptor::named("list")
            .parameter(ParameterDescriptor::sequence(ScalarKind::Integer).long("numbers"));
        let bound = bind_args(&descriptor, &["list"]).unwrap();
        assert_eq!(bound.get::<Vec<i64>>("numbers").unwrap(), Vec::<i64>::new());
    }

    #[test]
    fn missing_required_yields_exactly_one_error() {
        let descriptor = concat();
        let errors = bind_args(&descriptor, &["-s", ","]).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::MissingRequired {
                option: "-i|--inputs".to_string()
            }]
        );
    }

    #[test]
    fn all_errors_are_reported_together() {
        let descriptor = CommandDescriptor::named("div")
            .parameter(ParameterDescriptor::scalar(ScalarKind::Integer).short('D').required())
            .parameter(ParameterDescriptor::scalar(ScalarKind::Integer).short('d').required());
        let errors = bind_args(&descriptor, &["div", "-d", "eight", "-x"]).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::MissingRequired { .. }));
        assert!(matches!(errors[1], ValidationError::Conversion { .. }));
        assert_eq!(
            errors[2],
            ValidationError::Unrecognized {
                option: "-x".to_string()
            }
        );
    }

    #[test]
    fn interleaved_aliases_concatenate_in_typed_order() {
        let descriptor = concat();
        let args = ["c", "--inputs", "a", "-i", "b", "--inputs", "c"];
        let bound = bind_args(&descriptor, &args).unwrap();
        assert_eq!(bound.get::<Vec<String>>("inputs").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn interleaved_aliases_keep_last_scalar() {
        let descriptor = concat();
        let args = ["c", "-i", "x", "-s", "first", "--separator", "second", "-s", "third"];
        let bound = bind_args(&descriptor, &args).unwrap();
        assert_eq!(bound.get::<String>("s").unwrap(), "third");
    }

    #[test]
    fn interleaved_aliases_keep_last_flag() {
        let descriptor = CommandDescriptor::named("run")
            .parameter(ParameterDescriptor::flag().short('q').long("quiet"));
        let bound = bind_args(&descriptor, &["run", "--quiet", "-q", "false"]).unwrap();
        assert!(!bound.get::<bool>("q").unwrap());

        let bound = bind_args(&descriptor, &["run", "-q", "false", "--quiet"]).unwrap();
        assert!(bound.get::<bool>("q").unwrap());
    }

    #[test]
    fn repeated_unknown_key_is_reported_once() {
        let descriptor = concat();
        let errors = bind_args(&descriptor, &["-i", "a", "-x", "-x"]).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::Unrecognized {
                option: "-x".to_string()
            }]
        );
    }

    #[test]
    fn flag_with_literal_value_and_with_garbage() {
        let descriptor =
            CommandDescriptor::named("run").parameter(ParameterDescriptor::flag().long("dry-run"));
        let bound = bind_args(&descriptor, &["run", "--dry-run", "false"]).unwrap();
        assert!(!bound.get::<bool>("dry-run").unwrap());

        let bound = bind_args(&descriptor, &["run", "--dry-run"]).unwrap();
        assert!(bound.get::<bool>("dry-run").unwrap());

        let errors = bind_args(&descriptor, &["run", "--dry-run", "maybe"]).unwrap_err();
        assert!(matches!(errors[0], ValidationError::Conversion { .. }));
    }

    #[test]
    fn typed_access_reports_mismatches() {
        let descriptor = concat();
        let bound = bind_args(&descriptor, &["-i", "x"]).unwrap();
        assert!(matches!(bound.get::<i64>("s"), Err(BindError::TypeMismatch { .. })));
        assert!(matches!(bound.get::<String>("nope"), Err(BindError::UnknownOption(_))));
    }

    #[test]
    fn optional_scalar_without_default_reads_as_none() {
        let descriptor = CommandDescriptor::named("exc")
            .parameter(ParameterDescriptor::scalar(ScalarKind::Integer).short('c'));
        let bound = bind_args(&descriptor, &["exc"]).unwrap();
        assert_eq!(bound.get::<Option<i32>>("c").unwrap(), None);
        assert!(matches!(bound.get::<i32>("c"), Err(BindError::MissingValue(_))));
    }

    proptest! {
        #[test]
        fn short_and_long_alias_bind_identically(value in "[a-zA-Z0-9 ]{0,10}") {
            let descriptor = CommandDescriptor::named("echo")
                .parameter(
                    ParameterDescriptor::scalar(ScalarKind::Text)
                        .short('m')
                        .long("message"),
                );
            let via_short = bind_args(&descriptor, &["echo", "-m", value.as_str()]).unwrap();
            let via_long = bind_args(&descriptor, &["echo", "--message", value.as_str()]).unwrap();
            prop_assert_eq!(via_short, via_long);
        }

        #[test]
        fn interleaved_aliases_follow_typed_order(
            occurrences in prop::collection::vec((any::<bool>(), "[a-z0-9]{1,5}"), 1..8),
        ) {
            let descriptor = concat();
            let mut args: Vec<&str> = Vec::new();
            for (use_short, value) in &occurrences {
                args.push(if *use_short { "-i" } else { "--inputs" });
                args.push(value.as_str());
                args.push(if *use_short { "--separator" } else { "-s" });
                args.push(value.as_str());
            }
            let bound = bind_args(&descriptor, &args).unwrap();

            let typed: Vec<String> = occurrences.iter().map(|(_, value)| value.clone()).collect();
            prop_assert_eq!(bound.get::<Vec<String>>("i").unwrap(), typed.clone());
            prop_assert_eq!(bound.get::<String>("s").unwrap(), typed[typed.len() - 1].clone());
        }

        #[test]
        fn flag_value_must_be_a_boolean_literal(value in "[a-zA-Z]{1,6}") {
            let descriptor = CommandDescriptor::named("run")
                .parameter(ParameterDescriptor::flag().short('q').long("quiet"));
            let result = bind_args(&descriptor, &["run", "-q", value.as_str()]);
            match value.to_ascii_lowercase().as_str() {
                "true" => prop_assert!(result.unwrap().get::<bool>("q").unwrap()),
                "false" => prop_assert!(!result.unwrap().get::<bool>("quiet").unwrap()),
                _ => {
                    let errors = result.unwrap_err();
                    prop_assert_eq!(errors.len(), 1);
                    prop_assert!(
                        matches!(errors[0], ValidationError::Conversion { .. }),
                        "unexpected error"
                    );
                }
            }
        }

        #[test]
        fn missing_required_is_reported_once_whatever_else_is_supplied(
            separator in prop::option::of("[a-z,]{1,3}"),
        ) {
            let descriptor = concat();
            let mut args = Vec::new();
            if let Some(separator) = &separator {
                args.push("-s".to_string());
                args.push(separator.clone());
            }
            let errors = bind(&descriptor, &tokenize(&args), &DefaultValueConverter).unwrap_err();
            let mentions = errors
                .iter()
                .filter(|e| {
                    matches!(
                        e,
                        ValidationError::MissingRequired { option } if option.contains("inputs")
                    )
                })
                .count();
            prop_assert_eq!(mentions, 1);
        }
    }
}
