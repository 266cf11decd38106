//! Value pipeline: raw call arguments → accepted option value.
//!
//! ```text
//! OptionCall → Normalize → (Incremental | Transform → Filter) → Validate → NewValue
//! ```
//!
//! Each stage is a pure function over the `OptionSpec` and the current state.

use tracing::debug;

use crate::options::error::OptionError;
use crate::options::spec::{InvalidPolicy, OptionSpec};
use crate::options::value::{Callable, OptionValue, Shaped};

/// Arguments of a single option call: positional values plus an optional block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionCall {
    pub args: Vec<OptionValue>,
    pub block: Option<Callable>,
}

impl OptionCall {
    /// A call without arguments (a read, unless a block is attached).
    pub fn new() -> Self {
        Self::default()
    }

    /// A call with a single positional argument.
    pub fn arg(value: impl Into<OptionValue>) -> Self {
        Self {
            args: vec![value.into()],
            block: None,
        }
    }

    /// A call with several positional arguments.
    pub fn args<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OptionValue>,
    {
        Self {
            args: values.into_iter().map(Into::into).collect(),
            block: None,
        }
    }

    /// A call carrying only a block.
    pub fn block(block: Callable) -> Self {
        Self {
            args: Vec::new(),
            block: Some(block),
        }
    }

    pub fn with_block(mut self, block: Callable) -> Self {
        self.block = Some(block);
        self
    }

    /// Getter/setter intent: no arguments, and no block the option would store.
    pub fn is_read(&self, allow_callable: bool) -> bool {
        self.args.is_empty() && (self.block.is_none() || !allow_callable)
    }
}

/// Per-instance runtime state of one option.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionState {
    custom: Option<OptionValue>,
}

impl OptionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A state seeded with a custom value (dirty).
    pub fn with_custom(value: OptionValue) -> Self {
        Self {
            custom: Some(value),
        }
    }

    /// Whether a custom value replaced the default.
    pub fn is_dirty(&self) -> bool {
        self.custom.is_some()
    }

    pub fn custom_value(&self) -> Option<&OptionValue> {
        self.custom.as_ref()
    }
}

/// Outcome of a successful value computation.
#[derive(Debug, Clone, PartialEq)]
pub enum NewValue {
    /// The value passed validation and becomes the custom value.
    Accepted(OptionValue),
    /// Validation failed under `InvalidPolicy::UseDefault`; carries the default.
    Fallback(OptionValue),
}

impl NewValue {
    pub fn value(&self) -> &OptionValue {
        match self {
            NewValue::Accepted(v) | NewValue::Fallback(v) => v,
        }
    }

    pub fn into_value(self) -> OptionValue {
        match self {
            NewValue::Accepted(v) | NewValue::Fallback(v) => v,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, NewValue::Accepted(_))
    }
}

/// Compute the value a write call would produce, without touching `state`.
pub fn compute_new_value(
    spec: &OptionSpec,
    state: &OptionState,
    call: &OptionCall,
) -> Result<NewValue, OptionError> {
    let normalized = normalize(spec, call);

    let value = if spec.is_incremental() {
        accumulate(spec, state, normalized)
    } else {
        filter(spec, transform(spec, normalized)).into_value()
    };

    let valid = spec.validator().map_or(true, |validate| validate(&value));
    if valid {
        return Ok(NewValue::Accepted(value));
    }

    match spec.invalid_policy() {
        InvalidPolicy::UseDefault if !spec.is_incremental() => {
            debug!(option = spec.name(), rejected = ?value, "invalid value, falling back to default");
            Ok(NewValue::Fallback(spec.default_value()))
        }
        _ => Err(OptionError::Validation {
            option: spec.name().to_string(),
            value,
        }),
    }
}

/// Stage 1: a stored block, a single argument as-is, or all arguments as a sequence.
fn normalize(spec: &OptionSpec, call: &OptionCall) -> Shaped {
    if call.args.is_empty() && spec.allows_callable() {
        if let Some(block) = &call.block {
            return Shaped::Scalar(OptionValue::Callable(block.clone()));
        }
    }

    match call.args.as_slice() {
        [single] => Shaped::of(single.clone()),
        many => Shaped::Sequence(many.to_vec()),
    }
}

/// Incremental options keep a list of entries; each write appends one entry.
fn accumulate(spec: &OptionSpec, state: &OptionState, value: Shaped) -> OptionValue {
    let mut entries = match state.custom_value() {
        Some(current) => Shaped::of(current.clone()).to_sequence(),
        None => Vec::new(),
    };
    debug!(option = spec.name(), existing = entries.len(), "appending incremental entry");
    entries.push(OptionValue::List(value.to_sequence()));
    OptionValue::List(entries)
}

/// Stage 2: map each element; a scalar stays a scalar.
fn transform(spec: &OptionSpec, value: Shaped) -> Shaped {
    let Some(f) = spec.element_transform() else {
        return value;
    };

    let was_sequence = value.is_sequence();
    let mapped: Vec<OptionValue> = value.to_sequence().iter().map(|v| f(v)).collect();
    if was_sequence {
        Shaped::Sequence(mapped)
    } else {
        Shaped::Scalar(mapped.into_iter().next().unwrap_or_default())
    }
}

/// Stage 3: keep matching elements; the result is always a sequence.
fn filter(spec: &OptionSpec, value: Shaped) -> Shaped {
    let Some(keep) = spec.element_filter() else {
        return value;
    };

    Shaped::Sequence(value.to_sequence().into_iter().filter(|v| keep(v)).collect())
}

/// An option spec bound to the state of one host snapshot.
///
/// Created per call; writes mark it dirty but never touch the snapshot it came from.
#[derive(Debug, Clone)]
pub struct BoundOption<'a> {
    spec: &'a OptionSpec,
    state: OptionState,
}

impl<'a> BoundOption<'a> {
    /// A clean option that resolves to its default.
    pub fn new(spec: &'a OptionSpec) -> Self {
        Self {
            spec,
            state: OptionState::new(),
        }
    }

    pub fn spec(&self) -> &'a OptionSpec {
        self.spec
    }

    pub fn state(&self) -> &OptionState {
        &self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    /// Seed a custom value without running the pipeline. Only works on a clean option.
    pub fn initial_value(&mut self, value: OptionValue) -> Result<(), OptionError> {
        if let Some(current) = self.state.custom_value() {
            return Err(OptionError::DoubleInitialization {
                option: self.spec.name().to_string(),
                current: current.clone(),
            });
        }
        self.state = OptionState::with_custom(value);
        Ok(())
    }

    /// The custom value if one was set, otherwise the (freshly resolved) default.
    pub fn current_value(&self) -> OptionValue {
        match self.state.custom_value() {
            Some(v) => v.clone(),
            None => self.spec.default_value(),
        }
    }

    /// Run the pipeline. Accepted values become this option's custom value.
    pub fn new_value(&mut self, call: &OptionCall) -> Result<OptionValue, OptionError> {
        let computed = compute_new_value(self.spec, &self.state, call)?;
        if computed.is_accepted() {
            self.state = OptionState::with_custom(computed.value().clone());
        }
        Ok(computed.into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::methods::MethodTable;
    use crate::options::spec::OptionConfig;

    fn spec(config: OptionConfig) -> OptionSpec {
        config.resolve("test_option", &MethodTable::new()).unwrap()
    }

    #[test]
    fn incremental_concats_values() {
        let spec = spec(OptionConfig::new().incremental(true));
        let mut option = BoundOption::new(&spec);

        option.new_value(&OptionCall::arg(vec![4])).unwrap();
        assert_eq!(option.current_value(), OptionValue::list([OptionValue::list([4])]));

        let next = option.new_value(&OptionCall::arg(vec![2, 3])).unwrap();
        assert_eq!(
            next,
            OptionValue::list([OptionValue::list([4]), OptionValue::list([2, 3])])
        );
    }

    #[test]
    fn fallback_does_not_mark_dirty() {
        let spec = spec(
            OptionConfig::new()
                .default_value(666)
                .invalid(InvalidPolicy::UseDefault)
                .validate(|v| !v.contains(&OptionValue::Int(5))),
        );
        let mut option = BoundOption::new(&spec);

        assert_eq!(option.new_value(&OptionCall::arg(5)).unwrap(), OptionValue::Int(666));
        assert!(!option.is_dirty());
    }

    #[test]
    fn rejected_value_leaves_state_untouched() {
        let spec = spec(OptionConfig::new().validate(|v| v != &OptionValue::Int(5)));
        let mut option = BoundOption::new(&spec);
        option.initial_value(OptionValue::Int(1)).unwrap();

        assert!(option.new_value(&OptionCall::arg(5)).is_err());
        assert_eq!(option.current_value(), OptionValue::Int(1));
    }

    #[test]
    fn double_initialization_is_rejected() {
        let spec = spec(OptionConfig::new());
        let mut option = BoundOption::new(&spec);

        option.initial_value(OptionValue::Int(1)).unwrap();
        let err = option.initial_value(OptionValue::Int(2)).unwrap_err();
        assert_eq!(
            err,
            OptionError::DoubleInitialization {
                option: "test_option".to_string(),
                current: OptionValue::Int(1),
            }
        );
    }

    #[test]
    fn block_is_ignored_unless_callable_values_allowed() {
        let block = Callable::new(|| OptionValue::Int(1));
        let call = OptionCall::block(block.clone());

        assert!(call.is_read(false));
        assert!(!call.is_read(true));

        let spec = spec(OptionConfig::new().allow_callable(true));
        let computed = compute_new_value(&spec, &OptionState::new(), &call).unwrap();
        assert_eq!(computed, NewValue::Accepted(OptionValue::Callable(block)));
    }

    #[test]
    fn transform_of_nil_scalar_is_nil() {
        let spec = spec(OptionConfig::new().transform_named("to_s"));
        let computed = compute_new_value(&spec, &OptionState::new(), &OptionCall::arg(OptionValue::Nil))
            .unwrap();
        assert_eq!(computed.into_value(), OptionValue::Nil);
    }
}
