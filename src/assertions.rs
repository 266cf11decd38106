//! Expectations for testing option behaviour of a host type.
//!
//! ```ignore
//! expect_option("duck").with_default("waddle waddle").check(&host)?;
//! expect_option("superduck").which_takes("walk").and_fails_validation().check(&host)?;
//! expect_option("duck").which_takes(42).and_sets("42").check(&host)?;
//! ```
//!
//! Built only on [`ChainOptions`] reads and writes; it adds no semantics.

use std::any::type_name;

use thiserror::Error;

use crate::chain::ChainOptions;
use crate::options::{OptionCall, OptionError, OptionValue};

/// A failed expectation, with a multi-line human-readable explanation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ExpectationFailure(pub String);

impl ExpectationFailure {
    fn lines(lines: &[String]) -> Self {
        let mut message = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                message.push_str("\n  ");
            }
            message.push_str(line);
        }
        Self(message)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    FailsValidation,
    Sets(OptionValue),
    SetsGiven,
}

/// Start an expectation about the option `name`.
pub fn expect_option(name: impl Into<String>) -> OptionExpectation {
    OptionExpectation {
        option: name.into(),
        default: None,
        given: None,
        outcome: None,
    }
}

/// Chained checks against one option: existence, default, and write outcome.
#[derive(Debug, Clone)]
pub struct OptionExpectation {
    option: String,
    default: Option<OptionValue>,
    given: Option<OptionValue>,
    outcome: Option<Outcome>,
}

impl OptionExpectation {
    pub fn with_default(mut self, expected: impl Into<OptionValue>) -> Self {
        self.default = Some(expected.into());
        self
    }

    pub fn which_takes(mut self, value: impl Into<OptionValue>) -> Self {
        self.given = Some(value.into());
        self
    }

    pub fn and_sets(mut self, expected: impl Into<OptionValue>) -> Self {
        self.outcome = Some(Outcome::Sets(expected.into()));
        self
    }

    pub fn and_sets_it_as_value(mut self) -> Self {
        self.outcome = Some(Outcome::SetsGiven);
        self
    }

    pub fn and_fails_validation(mut self) -> Self {
        self.outcome = Some(Outcome::FailsValidation);
        self
    }

    /// Run every configured check against `host`.
    pub fn check<H: ChainOptions>(&self, host: &H) -> Result<(), ExpectationFailure> {
        let host_type = type_name::<H>();
        let option = &self.option;

        if !host.option_registry().contains(option) {
            return Err(ExpectationFailure::lines(&[
                format!("Expected the type `{}`", host_type),
                format!("to define the chain option `:{}`,", option),
                "but it didn't.".to_string(),
            ]));
        }

        if let Some(expected) = &self.default {
            let actual = self.read(host)?;
            if &actual != expected {
                return Err(ExpectationFailure::lines(&[
                    format!("Expected the chain option `:{}`", option),
                    format!("of the type `{}`", host_type),
                    format!("to have the default value `{:?}`", expected),
                    format!("but the actual default value is `{:?}`", actual),
                ]));
            }
        }

        let (Some(given), Some(outcome)) = (&self.given, &self.outcome) else {
            return Ok(());
        };

        let written = host.option(option, OptionCall::arg(given.clone()));
        match outcome {
            Outcome::FailsValidation => match written {
                Ok(_) => Err(ExpectationFailure::lines(&[
                    format!("Expected the chain option `:{}`", option),
                    format!("not to accept the value `{:?}`,", given),
                    "but it did.".to_string(),
                ])),
                Err(OptionError::Validation { .. }) => Ok(()),
                Err(other) => Err(ExpectationFailure::lines(&[
                    format!("Expected the chain option `:{}`", option),
                    format!("of the type `{}`", host_type),
                    format!("to fail validation when given the value `{:?}`", given),
                    format!("but instead `{}` was raised.", other),
                ])),
            },
            Outcome::Sets(_) | Outcome::SetsGiven => {
                let expected = match outcome {
                    Outcome::Sets(v) => v,
                    _ => given,
                };
                let changed = match written {
                    Ok(result) => result.into_instance(),
                    Err(OptionError::Validation { .. }) => {
                        return Err(ExpectationFailure::lines(&[
                            format!("Expected the chain option `:{}`", option),
                            format!("of the type `{}`", host_type),
                            format!("to accept the value `{:?}`,", given),
                            "but it didn't.".to_string(),
                        ]));
                    }
                    Err(other) => return Err(ExpectationFailure(other.to_string())),
                };
                let actual = match changed {
                    Some(changed) => self.read(&changed)?,
                    None => OptionValue::Nil,
                };
                if &actual != expected {
                    return Err(ExpectationFailure::lines(&[
                        format!("Expected the chain option `:{}`", option),
                        format!("of the type `{}`", host_type),
                        format!("to accept the value `{:?}`", given),
                        format!("and set the option value to `{:?}`,", expected),
                        format!("but it was set to `{:?}`", actual),
                    ]));
                }
                Ok(())
            }
        }
    }

    /// Read through the same dispatch a caller would use.
    fn read<H: ChainOptions>(&self, host: &H) -> Result<OptionValue, ExpectationFailure> {
        host.option(&self.option, OptionCall::new())
            .map_err(|e| ExpectationFailure(e.to_string()))
            .map(|outcome| outcome.into_value().unwrap_or_default())
    }
}
