//! Option value snapshots.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::options::OptionValue;

/// Immutable mapping of option name → custom value for one host instance.
///
/// Only explicitly set options are present; absent names resolve to their
/// default. Cloning is cheap, and [`OptionValues::with`] copies on write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionValues {
    inner: Arc<BTreeMap<String, OptionValue>>,
}

impl OptionValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.inner.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    /// A new snapshot with `name` set to `value`; `self` is left untouched.
    pub fn with(&self, name: &str, value: OptionValue) -> Self {
        let mut map = BTreeMap::clone(&self.inner);
        map.insert(name.to_string(), value);
        Self {
            inner: Arc::new(map),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for OptionValues
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: Arc::new(
                iter.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}
