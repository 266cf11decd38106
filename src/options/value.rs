//! Option values: the dynamic payload carried by every option.

use std::fmt;
use std::sync::Arc;

/// A shared zero-argument closure producing an option value.
///
/// Used both for stored callable values (options that allow blocks) and for
/// lazily produced defaults. Two callables are equal only if they are the
/// same closure.
#[derive(Clone)]
pub struct Callable(Arc<dyn Fn() -> OptionValue + Send + Sync>);

impl Callable {
    /// Wrap a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> OptionValue + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Invoke the closure.
    pub fn call(&self) -> OptionValue {
        (self.0)()
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<callable>")
    }
}

/// The value of an option.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OptionValue {
    /// No value.
    #[default]
    Nil,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    Str(String),
    /// Ordered sequence of values. The only sequence-typed variant.
    List(Vec<OptionValue>),
    /// A stored closure (see [`Callable`]).
    Callable(Callable),
}

impl OptionValue {
    /// Build a list from anything convertible into values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OptionValue>,
    {
        OptionValue::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, OptionValue::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            OptionValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[OptionValue]> {
        match self {
            OptionValue::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            OptionValue::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// Returns true if the list contains `needle` (or, for non-lists, equals it).
    pub fn contains(&self, needle: &OptionValue) -> bool {
        match self {
            OptionValue::List(items) => items.contains(needle),
            other => other == needle,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Nil => "nil",
            OptionValue::Bool(_) => "bool",
            OptionValue::Int(_) => "int",
            OptionValue::Float(_) => "float",
            OptionValue::Str(_) => "string",
            OptionValue::List(_) => "list",
            OptionValue::Callable(_) => "callable",
        }
    }

    /// Literal form: strings quoted, `nil` spelled out, lists recursive.
    pub fn inspect(&self) -> String {
        match self {
            OptionValue::Nil => "nil".to_string(),
            OptionValue::Str(v) => format!("{:?}", v),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Nil => Ok(()),
            OptionValue::Bool(v) => write!(f, "{}", v),
            OptionValue::Int(v) => write!(f, "{}", v),
            // `{:?}` keeps the fractional part of whole floats (`1.0`).
            OptionValue::Float(v) => write!(f, "{:?}", v),
            OptionValue::Str(v) => f.write_str(v),
            OptionValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&item.inspect())?;
                }
                f.write_str("]")
            }
            OptionValue::Callable(_) => f.write_str("<callable>"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<i32> for OptionValue {
    fn from(v: i32) -> Self {
        OptionValue::Int(i64::from(v))
    }
}

impl From<u32> for OptionValue {
    fn from(v: u32) -> Self {
        OptionValue::Int(i64::from(v))
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<Callable> for OptionValue {
    fn from(v: Callable) -> Self {
        OptionValue::Callable(v)
    }
}

impl<T: Into<OptionValue>> From<Vec<T>> for OptionValue {
    fn from(v: Vec<T>) -> Self {
        OptionValue::list(v)
    }
}

impl From<&OptionValue> for serde_json::Value {
    fn from(value: &OptionValue) -> Self {
        match value {
            OptionValue::Nil => serde_json::Value::Null,
            OptionValue::Bool(v) => serde_json::Value::Bool(*v),
            OptionValue::Int(v) => serde_json::Value::from(*v),
            OptionValue::Float(v) => serde_json::Value::from(*v),
            OptionValue::Str(v) => serde_json::Value::String(v.clone()),
            OptionValue::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            OptionValue::Callable(_) => serde_json::Value::String("<callable>".to_string()),
        }
    }
}

/// A JSON value with no option equivalent (objects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedValue(pub String);

impl fmt::Display for UnsupportedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported option value: {}", self.0)
    }
}

impl std::error::Error for UnsupportedValue {}

impl TryFrom<serde_json::Value> for OptionValue {
    type Error = UnsupportedValue;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            serde_json::Value::Null => OptionValue::Nil,
            serde_json::Value::Bool(v) => OptionValue::Bool(v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => OptionValue::Int(i),
                None => OptionValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => OptionValue::Str(s),
            serde_json::Value::Array(items) => OptionValue::List(
                items
                    .into_iter()
                    .map(OptionValue::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(_) => return Err(UnsupportedValue(value.to_string())),
        })
    }
}

/// Pipeline-internal shape of a value: a single scalar or a sequence.
///
/// Coercions are total; no value is ever inspected for "iterability".
#[derive(Debug, Clone, PartialEq)]
pub enum Shaped {
    Scalar(OptionValue),
    Sequence(Vec<OptionValue>),
}

impl Shaped {
    /// Lists are sequences, everything else is a scalar.
    pub fn of(value: OptionValue) -> Self {
        match value {
            OptionValue::List(items) => Shaped::Sequence(items),
            other => Shaped::Scalar(other),
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Shaped::Sequence(_))
    }

    /// `Nil` becomes an empty sequence, a scalar a one-element sequence.
    pub fn to_sequence(self) -> Vec<OptionValue> {
        match self {
            Shaped::Scalar(OptionValue::Nil) => Vec::new(),
            Shaped::Scalar(v) => vec![v],
            Shaped::Sequence(items) => items,
        }
    }

    pub fn into_value(self) -> OptionValue {
        match self {
            Shaped::Scalar(v) => v,
            Shaped::Sequence(items) => OptionValue::List(items),
        }
    }
}
