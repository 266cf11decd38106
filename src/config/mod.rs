//! Declarative option definitions loaded from TOML.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{OptionDefinition, OptionFile};
