//! Option configuration: what a host type declares per option name.
//!
//! ```text
//! OptionConfig (declared, may name methods) → resolve(MethodTable) → OptionSpec (uniform callables)
//! ```

use std::fmt;
use std::sync::Arc;

use crate::options::error::OptionError;
use crate::options::methods::MethodTable;
use crate::options::value::{Callable, OptionValue};

/// Predicate over a value (used by `validate` and `filter`).
pub type Predicate = Arc<dyn Fn(&OptionValue) -> bool + Send + Sync>;

/// Per-element mapping (used by `transform`).
pub type Transform = Arc<dyn Fn(&OptionValue) -> OptionValue + Send + Sync>;

/// What happens when a computed value fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidPolicy {
    /// Fail the write with a validation error.
    #[default]
    Raise,
    /// Fall back to the option's default value.
    UseDefault,
}

impl InvalidPolicy {
    /// Parse from a config key (`"raise"` or `"default"`).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "raise" => Some(Self::Raise),
            "default" => Some(Self::UseDefault),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Raise => "raise",
            Self::UseDefault => "default",
        }
    }
}

/// Default value of an option: a fixed value or a producer invoked on every read.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Value(OptionValue),
    Producer(Callable),
}

impl DefaultValue {
    /// Resolve the default. Producers are never cached.
    pub fn resolve(&self) -> OptionValue {
        match self {
            DefaultValue::Value(v) => v.clone(),
            DefaultValue::Producer(p) => p.call(),
        }
    }
}

impl Default for DefaultValue {
    fn default() -> Self {
        DefaultValue::Value(OptionValue::Nil)
    }
}

/// A hook given either inline or by name (resolved against a [`MethodTable`]).
#[derive(Clone)]
pub enum Hook<F> {
    Inline(F),
    Named(String),
}

impl<F> Hook<F> {
    fn describe(&self) -> String {
        match self {
            Hook::Inline(_) => "<closure>".to_string(),
            Hook::Named(name) => format!(":{}", name),
        }
    }
}

impl<F> fmt::Debug for Hook<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Declared configuration for one option, as passed to `define`.
///
/// Recognises exactly the keys a chain option supports; anything else is a
/// compile error here, and a parse error in definition files.
#[derive(Debug, Clone, Default)]
pub struct OptionConfig {
    pub(crate) default: DefaultValue,
    pub(crate) invalid: InvalidPolicy,
    pub(crate) validate: Option<Hook<Predicate>>,
    pub(crate) filter: Option<Hook<Predicate>>,
    pub(crate) transform: Option<Hook<Transform>>,
    pub(crate) incremental: bool,
    pub(crate) allow_callable: bool,
}

impl OptionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed default value.
    pub fn default_value(mut self, value: impl Into<OptionValue>) -> Self {
        self.default = DefaultValue::Value(value.into());
        self
    }

    /// Default produced fresh on every resolution.
    pub fn default_with<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> OptionValue + Send + Sync + 'static,
    {
        self.default = DefaultValue::Producer(Callable::new(producer));
        self
    }

    pub fn invalid(mut self, policy: InvalidPolicy) -> Self {
        self.invalid = policy;
        self
    }

    /// Validator; receives the value after transform and filter.
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&OptionValue) -> bool + Send + Sync + 'static,
    {
        self.validate = Some(Hook::Inline(Arc::new(f)));
        self
    }

    pub fn validate_named(mut self, method: impl Into<String>) -> Self {
        self.validate = Some(Hook::Named(method.into()));
        self
    }

    /// Element filter; the filtered value is always a list.
    pub fn filter<F>(mut self, f: F) -> Self
    where
        F: Fn(&OptionValue) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Hook::Inline(Arc::new(f)));
        self
    }

    pub fn filter_named(mut self, method: impl Into<String>) -> Self {
        self.filter = Some(Hook::Named(method.into()));
        self
    }

    /// Element transform; preserves scalar/list shape.
    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(&OptionValue) -> OptionValue + Send + Sync + 'static,
    {
        self.transform = Some(Hook::Inline(Arc::new(f)));
        self
    }

    pub fn transform_named(mut self, method: impl Into<String>) -> Self {
        self.transform = Some(Hook::Named(method.into()));
        self
    }

    /// Append-only accumulation instead of overriding.
    pub fn incremental(mut self, incremental: bool) -> Self {
        self.incremental = incremental;
        self
    }

    /// Store a block passed without arguments as the value itself.
    pub fn allow_callable(mut self, allow: bool) -> Self {
        self.allow_callable = allow;
        self
    }

    pub fn is_incremental(&self) -> bool {
        self.incremental
    }

    pub fn invalid_policy(&self) -> InvalidPolicy {
        self.invalid
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    pub fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    /// Bind every named hook against `methods`, producing a spec with uniform callables.
    pub fn resolve(&self, name: &str, methods: &MethodTable) -> Result<OptionSpec, OptionError> {
        let predicate = |hook: &Option<Hook<Predicate>>, kind: &'static str| match hook {
            None => Ok(None),
            Some(Hook::Inline(f)) => Ok(Some(f.clone())),
            Some(Hook::Named(method)) => methods
                .predicate(method)
                .map(Some)
                .ok_or_else(|| OptionError::UnknownMethod {
                    option: name.to_string(),
                    kind,
                    method: method.clone(),
                }),
        };

        let validate = predicate(&self.validate, "validate")?;
        let filter = predicate(&self.filter, "filter")?;
        let transform = match &self.transform {
            None => None,
            Some(Hook::Inline(f)) => Some(f.clone()),
            Some(Hook::Named(method)) => Some(methods.transform(method).ok_or_else(|| {
                OptionError::UnknownMethod {
                    option: name.to_string(),
                    kind: "transform",
                    method: method.clone(),
                }
            })?),
        };

        let mut summary = Vec::new();
        if self.incremental {
            summary.push(("incremental", "true".to_string()));
        }
        if let Some(default) = describe_default(&self.default) {
            summary.push(("default", default));
        }
        if let Some(hook) = &self.transform {
            summary.push(("transform", hook.describe()));
        }
        if let Some(hook) = &self.filter {
            summary.push(("filter", hook.describe()));
        }
        if let Some(hook) = &self.validate {
            summary.push(("validate", hook.describe()));
        }
        summary.push(("invalid", self.invalid.as_str().to_string()));
        if self.allow_callable {
            summary.push(("allow_block", "true".to_string()));
        }

        Ok(OptionSpec {
            name: name.to_string(),
            default: self.default.clone(),
            invalid: self.invalid,
            validate,
            filter,
            transform,
            incremental: self.incremental,
            allow_callable: self.allow_callable,
            summary,
        })
    }
}

fn describe_default(default: &DefaultValue) -> Option<String> {
    match default {
        DefaultValue::Value(OptionValue::Nil) => None,
        DefaultValue::Value(v) => Some(v.inspect()),
        DefaultValue::Producer(_) => Some("<producer>".to_string()),
    }
}

/// Resolved, immutable configuration of one option.
///
/// Shared by every instance of the host type; never mutated after registration.
#[derive(Clone)]
pub struct OptionSpec {
    name: String,
    default: DefaultValue,
    invalid: InvalidPolicy,
    validate: Option<Predicate>,
    filter: Option<Predicate>,
    transform: Option<Transform>,
    incremental: bool,
    allow_callable: bool,
    summary: Vec<(&'static str, String)>,
}

impl OptionSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve the default value (producers are invoked every time).
    pub fn default_value(&self) -> OptionValue {
        self.default.resolve()
    }

    pub fn invalid_policy(&self) -> InvalidPolicy {
        self.invalid
    }

    pub fn is_incremental(&self) -> bool {
        self.incremental
    }

    pub fn allows_callable(&self) -> bool {
        self.allow_callable
    }

    /// The configured parameters, in declaration order, for display.
    pub fn summary(&self) -> &[(&'static str, String)] {
        &self.summary
    }

    pub(crate) fn validator(&self) -> Option<&Predicate> {
        self.validate.as_ref()
    }

    pub(crate) fn element_filter(&self) -> Option<&Predicate> {
        self.filter.as_ref()
    }

    pub(crate) fn element_transform(&self) -> Option<&Transform> {
        self.transform.as_ref()
    }
}

impl fmt::Debug for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSpec")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .finish()
    }
}
