use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single parsed option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    String(String),
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Parsed options for one invocation, keyed by option name.
///
/// Options the user did not supply are absent from the bag. The bag is
/// assembled by the argument parser and then only shared by reference, so
/// validators and the action all observe the same values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentBag {
    values: IndexMap<String, ArgValue>,
}

impl ArgumentBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, convenient in tests and parsers.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// String value of an option. Empty strings are treated as absent.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(ArgValue::String(value)) if !value.is_empty() => Some(value.as_str()),
            _ => None,
        }
    }

    /// Whether a boolean switch was turned on.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(ArgValue::Bool(true)))
    }

    /// Whether the option carries a meaningful value: a non-empty string or
    /// a switch set to `true`.
    pub fn is_set(&self, name: &str) -> bool {
        match self.values.get(name) {
            Some(ArgValue::String(value)) => !value.is_empty(),
            Some(ArgValue::Bool(value)) => *value,
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ArgumentBag
where
    K: Into<String>,
    V: Into<ArgValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut bag = Self::new();
        for (name, value) in iter {
            bag.insert(name, value);
        }
        bag
    }
}
