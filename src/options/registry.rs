//! Option registry: single source of truth for a host type's options.

use std::collections::HashMap;
use std::fmt;

use tracing::{trace, warn};

use crate::chain::OptionValues;
use crate::options::error::OptionError;
use crate::options::methods::MethodTable;
use crate::options::pipeline::{compute_new_value, BoundOption, NewValue, OptionCall};
use crate::options::spec::{InvalidPolicy, OptionConfig, OptionSpec};
use crate::options::value::OptionValue;

/// Non-fatal warning about flags that do not make sense together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub option: String,
    pub conflicts: (&'static str, &'static str),
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The options {}, {} are incompatible for the chain option {}.",
            self.conflicts.0, self.conflicts.1, self.option
        )
    }
}

/// Check a config for incompatible flags.
///
/// Incremental options never fall back to the default and skip transform and filter.
pub fn incompatibilities(name: &str, config: &OptionConfig) -> Vec<ConfigWarning> {
    if !config.is_incremental() {
        return Vec::new();
    }

    let mut conflicts = Vec::new();
    if config.invalid_policy() == InvalidPolicy::UseDefault {
        conflicts.push(("invalid: default", "incremental: true"));
    }
    if config.has_filter() {
        conflicts.push(("incremental: true", "filter"));
    }
    if config.has_transform() {
        conflicts.push(("incremental: true", "transform"));
    }

    conflicts
        .into_iter()
        .map(|conflicts| ConfigWarning {
            option: name.to_string(),
            conflicts,
        })
        .collect()
}

/// Builder for an [`OptionRegistry`].
pub struct OptionRegistryBuilder {
    methods: MethodTable,
    configs: Vec<(String, OptionConfig)>,
}

impl OptionRegistryBuilder {
    /// Use `methods` to resolve named hooks (replaces the builtin table).
    pub fn methods(mut self, methods: MethodTable) -> Self {
        self.methods = methods;
        self
    }

    /// Register an option.
    pub fn define(mut self, name: impl Into<String>, config: OptionConfig) -> Self {
        self.configs.push((name.into(), config));
        self
    }

    /// Resolve every config and emit incompatibility warnings.
    pub fn build(self) -> Result<OptionRegistry, OptionError> {
        let mut specs = HashMap::with_capacity(self.configs.len());
        let mut order = Vec::with_capacity(self.configs.len());
        let mut warnings = Vec::new();

        for (name, config) in &self.configs {
            if specs.contains_key(name) {
                return Err(OptionError::DuplicateOption { name: name.clone() });
            }

            for warning in incompatibilities(name, config) {
                warn!("{}", warning);
                warnings.push(warning);
            }

            let spec = config.resolve(name, &self.methods)?;
            specs.insert(name.clone(), spec);
            order.push(name.clone());
        }

        Ok(OptionRegistry {
            specs,
            order,
            warnings,
        })
    }
}

/// The options of one host type.
///
/// Owns the (immutable) specs; values live in per-instance [`OptionValues`].
#[derive(Debug, Clone)]
pub struct OptionRegistry {
    specs: HashMap<String, OptionSpec>,
    order: Vec<String>,
    warnings: Vec<ConfigWarning>,
}

impl OptionRegistry {
    pub fn builder() -> OptionRegistryBuilder {
        OptionRegistryBuilder {
            methods: MethodTable::new(),
            configs: Vec::new(),
        }
    }

    /// Look up the spec registered under `name`.
    pub fn resolve(&self, name: &str) -> Result<&OptionSpec, OptionError> {
        self.specs.get(name).ok_or_else(|| OptionError::UnknownOption {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Option names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Warnings produced while building the registry.
    pub fn warnings(&self) -> &[ConfigWarning] {
        &self.warnings
    }

    /// Materialise the option `name` bound to `values` (dirty iff present there).
    pub fn option(&self, name: &str, values: &OptionValues) -> Result<BoundOption<'_>, OptionError> {
        let spec = self.resolve(name)?;
        let mut option = BoundOption::new(spec);
        if let Some(value) = values.get(name) {
            option.initial_value(value.clone())?;
        }
        Ok(option)
    }

    /// Current value of `name`: the custom value or the default.
    pub fn current_value(&self, name: &str, values: &OptionValues) -> Result<OptionValue, OptionError> {
        Ok(self.option(name, values)?.current_value())
    }

    /// Run the value pipeline for `name` against `values`. Never mutates `values`.
    pub fn compute_new_value(
        &self,
        name: &str,
        call: &OptionCall,
        values: &OptionValues,
    ) -> Result<NewValue, OptionError> {
        let option = self.option(name, values)?;
        compute_new_value(option.spec(), option.state(), call)
    }

    /// Whether `call` reads `name` rather than writing it.
    pub fn is_read(&self, name: &str, call: &OptionCall) -> Result<bool, OptionError> {
        let spec = self.resolve(name)?;
        let read = call.is_read(spec.allows_callable());
        trace!(option = name, read, "dispatching option call");
        Ok(read)
    }
}
