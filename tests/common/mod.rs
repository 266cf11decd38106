//! Shared test hosts and method tables.

#![allow(dead_code)]

use std::sync::Arc;

use chain_options::{MethodTable, OptionConfig, OptionHost, OptionRegistry, OptionValue};

/// Rejects 5, or any list containing 5.
pub fn no_number_5(value: &OptionValue) -> bool {
    !value.contains(&OptionValue::Int(5))
}

pub fn even_numbers(value: &OptionValue) -> bool {
    value.as_int().is_some_and(|i| i % 2 == 0)
}

/// Method table with the named predicates used across tests.
pub fn test_methods() -> MethodTable {
    MethodTable::new()
        .with_predicate("no_number_5", no_number_5)
        .with_predicate("even_numbers", even_numbers)
}

/// A runtime host with a single option `name` configured by `config`.
pub fn host_with(name: &str, config: OptionConfig) -> OptionHost {
    let registry = OptionRegistry::builder()
        .methods(test_methods())
        .define(name, config)
        .build()
        .expect("Failed to build registry");
    OptionHost::new(Arc::new(registry))
}

pub fn ints<const N: usize>(values: [i64; N]) -> OptionValue {
    OptionValue::list(values)
}
