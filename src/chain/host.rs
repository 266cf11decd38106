//! A ready-made host for registries built at runtime.

use std::sync::Arc;

use crate::chain::{ChainOptions, OptionValues};
use crate::options::OptionRegistry;

/// Host type whose registry is shared through an `Arc`.
///
/// Useful when options are defined from a file rather than in code.
#[derive(Debug, Clone)]
pub struct OptionHost {
    registry: Arc<OptionRegistry>,
    values: OptionValues,
}

impl OptionHost {
    /// A host with no custom values.
    pub fn new(registry: Arc<OptionRegistry>) -> Self {
        Self::with_values(registry, OptionValues::new())
    }

    /// A host seeded with (a full or partial) snapshot.
    pub fn with_values(registry: Arc<OptionRegistry>, values: OptionValues) -> Self {
        Self { registry, values }
    }

    pub fn registry(&self) -> &Arc<OptionRegistry> {
        &self.registry
    }
}

impl ChainOptions for OptionHost {
    fn option_registry(&self) -> &OptionRegistry {
        &self.registry
    }

    fn option_values(&self) -> &OptionValues {
        &self.values
    }

    fn with_option_values(&self, values: OptionValues) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            values,
        }
    }
}
