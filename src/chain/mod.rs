//! Immutable option chains.
//!
//! A host type exposes its options through [`ChainOptions`]. Reading an
//! option returns its value; writing one returns a *new* host carrying an
//! updated [`OptionValues`] snapshot. Existing instances are never mutated,
//! so earlier links of a chain can be shared and branched freely.

mod builder;
mod host;
mod values;

pub use builder::{apply_instructions, Builder};
pub use host::OptionHost;
pub use values::OptionValues;

use tracing::debug;

use crate::options::{Callable, OptionCall, OptionError, OptionRegistry, OptionValue};

/// Result of a dispatched option call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<H> {
    /// The call was a read.
    Value(OptionValue),
    /// The call was a write; a new instance carrying the updated value.
    Instance(H),
}

impl<H> CallOutcome<H> {
    pub fn into_value(self) -> Option<OptionValue> {
        match self {
            CallOutcome::Value(v) => Some(v),
            CallOutcome::Instance(_) => None,
        }
    }

    pub fn into_instance(self) -> Option<H> {
        match self {
            CallOutcome::Instance(h) => Some(h),
            CallOutcome::Value(_) => None,
        }
    }
}

/// Contract between a host type and its option registry.
///
/// Implementors provide the registry, the current snapshot and a way to build
/// a sibling instance from a snapshot; everything else is provided.
pub trait ChainOptions: Sized {
    /// The registry shared by all instances of this host type.
    fn option_registry(&self) -> &OptionRegistry;

    /// The option values of this instance.
    fn option_values(&self) -> &OptionValues;

    /// Build a new instance of the same type carrying `values`.
    fn with_option_values(&self, values: OptionValues) -> Self;

    /// Generic option accessor: reads on a getter-shaped call, writes otherwise.
    fn option(&self, name: &str, call: OptionCall) -> Result<CallOutcome<Self>, OptionError> {
        if self.option_registry().is_read(name, &call)? {
            return self.get_option(name).map(CallOutcome::Value);
        }
        self.with_option(name, call).map(CallOutcome::Instance)
    }

    /// Current value of `name` (custom value or default).
    fn get_option(&self, name: &str) -> Result<OptionValue, OptionError> {
        self.option_registry().current_value(name, self.option_values())
    }

    /// Write `name` through the value pipeline, returning the new instance.
    fn with_option(&self, name: &str, call: OptionCall) -> Result<Self, OptionError> {
        let values = self.option_values();
        let new_value = self
            .option_registry()
            .compute_new_value(name, &call, values)?
            .into_value();
        debug!(option = name, value = ?new_value, "option written");
        Ok(self.with_option_values(values.with(name, new_value)))
    }

    /// Write a single value.
    fn set_option(&self, name: &str, value: impl Into<OptionValue>) -> Result<Self, OptionError> {
        self.with_option(name, OptionCall::arg(value))
    }

    /// Write a block-only call; stored as-is when the option allows callables.
    fn set_option_block<F>(&self, name: &str, block: F) -> Result<Self, OptionError>
    where
        F: Fn() -> OptionValue + Send + Sync + 'static,
    {
        self.with_option(name, OptionCall::block(Callable::new(block)))
    }

    /// Set several options in sequence, see [`Builder`].
    fn build_options<F>(&self, f: F) -> Result<Self, OptionError>
    where
        F: FnOnce(&mut Builder<Self>) -> Result<(), OptionError>,
    {
        let mut builder = Builder::new(self.with_option_values(self.option_values().clone()));
        f(&mut builder)?;
        Ok(builder.result())
    }
}
