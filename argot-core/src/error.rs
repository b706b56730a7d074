// ============================================================================
// argot-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error types for the argot framework
//
// KEY COMPONENTS:
// - ConfigurationError: malformed registrations, fatal at startup
// - ConversionError: a raw string could not become the declared type
// - ValidationError: one problem found while binding (all are collected)
// - BindError: a command factory read a bound value with the wrong type
// - CommandError: execution failure carrying an exit code
//
// Only ConfigurationError is allowed to escape to the host; everything else
// is turned into a report and an exit code by the orchestrator.

use thiserror::Error;

/// Exit code used for every failure that does not carry its own code.
pub const GENERIC_FAILURE_EXIT_CODE: i32 = 1;

/// Errors raised while registering commands.
///
/// These indicate a programming mistake in the host application, so
/// `CliApplicationBuilder::build` fails fast instead of reporting them per
/// invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Command name '{0}' is registered more than once")]
    DuplicateCommand(String),

    #[error("More than one default (nameless) command is registered")]
    DuplicateDefaultCommand,

    #[error("Command name must not be empty or whitespace")]
    BlankCommandName,

    #[error("Command name '{0}' cannot be typed on a command line")]
    InvalidCommandName(String),

    #[error("Option of command '{command}' has neither a long nor a short name")]
    UnnamedOption { command: String },

    #[error("Option '{option}' of command '{command}' is declared more than once")]
    DuplicateOption { command: String, option: String },

    #[error("Option name '{option}' of command '{command}' is invalid")]
    InvalidOptionName { command: String, option: String },

    #[error("Option '{option}' of command '{command}' conflicts with a built-in option")]
    ReservedOption { command: String, option: String },
}

/// Errors raised while converting raw option values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Can't convert value '{value}' to {target}")]
    InvalidValue { value: String, target: String },

    #[error("Value '{value}' is not one of the allowed values: {}", .allowed.join(", "))]
    UnknownSymbol { value: String, allowed: Vec<String> },

    #[error("Expected a value of type {target} but none was supplied")]
    MissingValue { target: String },
}

/// A single problem found while binding options onto a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required option: {option}")]
    MissingRequired { option: String },

    #[error("Unrecognized option: {option}")]
    Unrecognized { option: String },

    #[error("Invalid value for option {option}: {source}")]
    Conversion {
        option: String,
        #[source]
        source: ConversionError,
    },
}

/// Raised when a command factory reads a bound value it cannot use.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("Command has no option named '{0}'")]
    UnknownOption(String),

    #[error("Option '{0}' has no value")]
    MissingValue(String),

    #[error("Option '{option}' holds {actual}, expected {expected}")]
    TypeMismatch {
        option: String,
        expected: &'static str,
        actual: String,
    },
}

/// Failure reported by a command's own logic.
///
/// Returning this (inside `anyhow::Error`) from `Command::execute` lets a
/// command choose the process exit code. Any other error maps to
/// [`GENERIC_FAILURE_EXIT_CODE`], and so does a requested code of 0: a
/// failed command never exits successfully.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", display_message(.message, .exit_code))]
pub struct CommandError {
    message: Option<String>,
    exit_code: i32,
}

impl CommandError {
    /// Creates an error with a message and the generic failure code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            exit_code: GENERIC_FAILURE_EXIT_CODE,
        }
    }

    /// Creates an error that only carries an exit code.
    pub fn with_code(exit_code: i32) -> Self {
        Self::from_parts(None, exit_code)
    }

    /// Creates an error from an optional message and an exit code.
    pub fn from_parts(message: Option<String>, exit_code: i32) -> Self {
        Self {
            message: message.filter(|m| !m.trim().is_empty()),
            exit_code: failure_code(exit_code),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }
}

fn failure_code(exit_code: i32) -> i32 {
    if exit_code == 0 {
        GENERIC_FAILURE_EXIT_CODE
    } else {
        exit_code
    }
}

fn display_message(message: &Option<String>, exit_code: &i32) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("Command failed with exit code {}", exit_code),
    }
}

/// Result type for argot operations that can only fail at startup.
pub type ArgotResult<T> = std::result::Result<T, ConfigurationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_error_without_message_still_renders_text() {
        let error = CommandError::with_code(3);
        assert_eq!(error.exit_code(), 3);
        assert!(error.message().is_none());
        assert_eq!(error.to_string(), "Command failed with exit code 3");
    }

    #[test]
    fn zero_exit_code_becomes_generic_failure() {
        let error = CommandError::from_parts(Some("boom".to_string()), 0);
        assert_eq!(error.exit_code(), GENERIC_FAILURE_EXIT_CODE);
        assert_eq!(CommandError::with_code(0).exit_code(), GENERIC_FAILURE_EXIT_CODE);
    }

    #[test]
    fn blank_messages_are_dropped() {
        let error = CommandError::from_parts(Some("   ".to_string()), 9);
        assert!(error.message().is_none());
        assert_eq!(error.exit_code(), 9);
    }

    #[test]
    fn unknown_symbol_lists_choices() {
        let error = ConversionError::UnknownSymbol {
            value: "purple".to_string(),
            allowed: vec!["Red".to_string(), "Green".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Value 'purple' is not one of the allowed values: Red, Green"
        );
    }
}
