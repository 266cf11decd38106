//! Method table: named predicates and transforms that option configs may refer to.

use std::collections::HashMap;
use std::sync::Arc;

use crate::options::spec::{Predicate, Transform};
use crate::options::value::OptionValue;

/// Lookup table used to bind named hooks when a registry is built.
///
/// Adding a method: `with_predicate` / `with_transform` before `define`.
#[derive(Clone)]
pub struct MethodTable {
    predicates: HashMap<String, Predicate>,
    transforms: HashMap<String, Transform>,
}

impl MethodTable {
    /// Create a table containing the builtin methods.
    ///
    /// Transforms: `to_s` (stringify each element).
    /// Predicates: `even`, `odd`, `positive`, `negative` (integers only),
    /// `integer`, `string`, `present` (neither nil nor empty).
    pub fn new() -> Self {
        Self::empty()
            .with_transform("to_s", |v| OptionValue::Str(v.to_string()))
            .with_predicate("even", |v| v.as_int().is_some_and(|i| i % 2 == 0))
            .with_predicate("odd", |v| v.as_int().is_some_and(|i| i % 2 != 0))
            .with_predicate("positive", |v| v.as_int().is_some_and(|i| i > 0))
            .with_predicate("negative", |v| v.as_int().is_some_and(|i| i < 0))
            .with_predicate("integer", |v| v.as_int().is_some())
            .with_predicate("string", |v| v.as_str().is_some())
            .with_predicate("present", is_present)
    }

    /// Create a table without builtins.
    pub fn empty() -> Self {
        Self {
            predicates: HashMap::new(),
            transforms: HashMap::new(),
        }
    }

    /// Register a named predicate (usable as `validate` or `filter`).
    pub fn with_predicate<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&OptionValue) -> bool + Send + Sync + 'static,
    {
        self.predicates.insert(name.into(), Arc::new(f));
        self
    }

    /// Register a named transform.
    pub fn with_transform<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&OptionValue) -> OptionValue + Send + Sync + 'static,
    {
        self.transforms.insert(name.into(), Arc::new(f));
        self
    }

    pub fn predicate(&self, name: &str) -> Option<Predicate> {
        self.predicates.get(name).cloned()
    }

    pub fn transform(&self, name: &str) -> Option<Transform> {
        self.transforms.get(name).cloned()
    }
}

fn is_present(value: &OptionValue) -> bool {
    match value {
        OptionValue::Nil => false,
        OptionValue::Str(s) => !s.is_empty(),
        OptionValue::List(items) => !items.is_empty(),
        _ => true,
    }
}

impl Default for MethodTable {
    fn default() -> Self {
        Self::new()
    }
}
