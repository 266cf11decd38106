//! Error types for option resolution and value computation.

use thiserror::Error;

use crate::options::value::OptionValue;

/// Errors that can occur when reading, writing or registering options.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionError {
    /// No option is registered under the given name.
    #[error("There is no option registered called {name}.")]
    UnknownOption { name: String },

    /// A computed value was rejected by the option's validator.
    #[error("The value {value:?} is not valid for the option {option}.")]
    Validation { option: String, value: OptionValue },

    /// An initial value was seeded into an option that already has one.
    #[error("The initial value of {option} was already set to {current:?}.")]
    DoubleInitialization { option: String, current: OptionValue },

    /// A named filter, validator or transform could not be resolved.
    #[error("Option {option} refers to unknown {kind} method '{method}'")]
    UnknownMethod {
        option: String,
        kind: &'static str,
        method: String,
    },

    /// The same option name was defined twice for one registry.
    #[error("Option {name} is already defined")]
    DuplicateOption { name: String },
}

impl OptionError {
    /// Short machine-readable kind, used in logs and CLI output.
    pub fn error_type(&self) -> &'static str {
        match self {
            OptionError::UnknownOption { .. } => "unknown_option",
            OptionError::Validation { .. } => "validation",
            OptionError::DoubleInitialization { .. } => "double_initialization",
            OptionError::UnknownMethod { .. } => "unknown_method",
            OptionError::DuplicateOption { .. } => "duplicate_option",
        }
    }

    /// The rejected value, for validation failures.
    pub fn rejected_value(&self) -> Option<&OptionValue> {
        match self {
            OptionError::Validation { value, .. } => Some(value),
            _ => None,
        }
    }
}
