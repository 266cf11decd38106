//! Builder: set several options one after another.
//!
//! Replaces chains like
//!
//! ```text
//! let h = h.set_option("a", 1)?;
//! let h = if flag { h.set_option("b", 2)? } else { h };
//! ```
//!
//! with a sequence of `set` calls on a [`Builder`].

use tracing::debug;

use crate::chain::ChainOptions;
use crate::options::{Callable, OptionCall, OptionError, OptionValue};

/// Threads a host instance through successive option writes.
#[derive(Debug)]
pub struct Builder<H> {
    instance: H,
}

impl<H: ChainOptions> Builder<H> {
    pub fn new(initial: H) -> Self {
        Self { instance: initial }
    }

    /// Write `name` with a full call (arguments and/or block).
    pub fn apply(&mut self, name: &str, call: OptionCall) -> Result<&mut Self, OptionError> {
        debug!(option = name, "builder step");
        self.instance = self.instance.with_option(name, call)?;
        Ok(self)
    }

    /// Write a single value.
    pub fn set(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<&mut Self, OptionError> {
        self.apply(name, OptionCall::arg(value))
    }

    /// Write several positional values.
    pub fn set_args<I, T>(&mut self, name: &str, values: I) -> Result<&mut Self, OptionError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OptionValue>,
    {
        self.apply(name, OptionCall::args(values))
    }

    /// Write a block.
    pub fn set_block<F>(&mut self, name: &str, block: F) -> Result<&mut Self, OptionError>
    where
        F: Fn() -> OptionValue + Send + Sync + 'static,
    {
        self.apply(name, OptionCall::block(Callable::new(block)))
    }

    /// The current instance.
    pub fn instance(&self) -> &H {
        &self.instance
    }

    pub fn result(self) -> H {
        self.instance
    }
}

/// Apply an explicit list of `(name, call)` writes in order.
pub fn apply_instructions<H, I, S>(initial: H, instructions: I) -> Result<H, OptionError>
where
    H: ChainOptions,
    I: IntoIterator<Item = (S, OptionCall)>,
    S: AsRef<str>,
{
    let mut builder = Builder::new(initial);
    for (name, call) in instructions {
        builder.apply(name.as_ref(), call)?;
    }
    Ok(builder.result())
}
