//! Option definitions and value computation.
//!
//! ```text
//! OptionConfig → Resolve (MethodTable) → OptionSpec → Registry
//! OptionCall → Normalize → Transform → Filter → Validate → NewValue
//! ```
//!
//! Registries hold immutable specs; values live in per-instance snapshots
//! (see [`crate::chain::OptionValues`]).

mod error;
mod methods;
mod pipeline;
mod registry;
mod spec;
mod value;

pub use error::OptionError;
pub use methods::MethodTable;
pub use pipeline::{compute_new_value, BoundOption, NewValue, OptionCall, OptionState};
pub use registry::{incompatibilities, ConfigWarning, OptionRegistry, OptionRegistryBuilder};
pub use spec::{DefaultValue, Hook, InvalidPolicy, OptionConfig, OptionSpec, Predicate, Transform};
pub use value::{Callable, OptionValue, Shaped, UnsupportedValue};
