//! Immutable option chains.
//!
//! Host types expose named, typed options. Calling an option without
//! arguments reads it; calling it with arguments returns a *new* host
//! carrying the updated value:
//!
//! ```text
//! host.option("duck", call) → Read  → current value (custom or default)
//!                           → Write → Normalize → Transform → Filter → Validate → new host
//! ```
//!
//! - [`options`]: option configuration, registry and the value pipeline
//! - [`chain`]: the host contract, snapshots and the builder
//! - [`config`]: option definitions loaded from TOML
//! - [`assertions`]: expectations for testing option behaviour

pub mod assertions;
pub mod chain;
pub mod config;
pub mod logging;
pub mod options;

pub use chain::{CallOutcome, ChainOptions, OptionHost, OptionValues};
pub use options::{
    Callable, InvalidPolicy, MethodTable, OptionCall, OptionConfig, OptionError, OptionRegistry,
    OptionValue,
};
