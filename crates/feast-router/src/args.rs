/// Bound request arguments and the argument zipper
///
/// Matched path values are bound to parameter names positionally. The only
/// place a parameter receives more than one value is a variadic final entry.
use crate::route::ArgumentChainEntry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value bound to a single argument name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Nothing was matched and the parameter has no default
    Null,
    Single(String),
    /// Surplus values collected by a variadic parameter
    Many(Vec<String>),
}

impl ArgValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ArgValue::Null)
    }

    /// The scalar value, if this is a single value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Single(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// All values as a list; `Null` is empty, `Single` has one element
    pub fn values(&self) -> Vec<&str> {
        match self {
            ArgValue::Null => Vec::new(),
            ArgValue::Single(value) => vec![value.as_str()],
            ArgValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Null => Ok(()),
            ArgValue::Single(value) => f.write_str(value),
            ArgValue::Many(values) => f.write_str(&values.join("/")),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Single(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Single(value)
    }
}

impl From<Vec<String>> for ArgValue {
    fn from(values: Vec<String>) -> Self {
        ArgValue::Many(values)
    }
}

impl From<Vec<&str>> for ArgValue {
    fn from(values: Vec<&str>) -> Self {
        ArgValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Option<String>> for ArgValue {
    fn from(value: Option<String>) -> Self {
        value.map(ArgValue::Single).unwrap_or(ArgValue::Null)
    }
}

/// Ordered name → value map
///
/// Insertion order is kept so generated query strings and CLI bindings are
/// deterministic. Re-inserting a name replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arguments {
    entries: Vec<(String, ArgValue)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    ///
    /// ```
    /// use feast_router::{ArgValue, Arguments};
    ///
    /// let args = Arguments::new().with("id", "7").with("tags", vec!["a", "b"]);
    /// assert_eq!(args.get_str("id"), Some("7"));
    /// assert_eq!(args.get("tags"), Some(&ArgValue::Many(vec!["a".into(), "b".into()])));
    /// ```
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<ArgValue> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends every entry of `other`, replacing names that already exist
    pub fn extend(&mut self, other: Arguments) {
        for (name, value) in other.entries {
            self.insert(name, value);
        }
    }
}

impl<K: Into<String>, V: Into<ArgValue>> FromIterator<(K, V)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Arguments::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}

impl IntoIterator for Arguments {
    type Item = (String, ArgValue);
    type IntoIter = std::vec::IntoIter<(String, ArgValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Binds matched values to an argument chain positionally
///
/// Names without a value get their default, or `Null`. An optional variadic
/// tail with nothing to capture binds to an empty list. When the final entry
/// is variadic and more than one value is left over, the leftovers are bound
/// to it as a list; otherwise surplus values are dropped.
///
/// ```
/// use feast_router::{zip_arguments, ArgValue, ArgumentChainEntry};
///
/// let chain = vec![
///     ArgumentChainEntry::new("name", None),
///     ArgumentChainEntry::new("otherArgs", None).variadic(true).optional(true),
/// ];
/// let args = zip_arguments(&chain, vec!["test2".into(), "a".into(), "b".into()]);
/// assert_eq!(args.get_str("name"), Some("test2"));
/// assert_eq!(args.get("otherArgs"), Some(&ArgValue::Many(vec!["a".into(), "b".into()])));
/// ```
pub fn zip_arguments(chain: &[ArgumentChainEntry], values: Vec<String>) -> Arguments {
    let mut args = Arguments::new();
    let mut values = values.into_iter();
    let last = chain.len().saturating_sub(1);

    for (index, entry) in chain.iter().enumerate() {
        let value = if index == last && entry.variadic {
            let rest: Vec<String> = values.by_ref().collect();
            match rest.len() {
                0 => match &entry.default {
                    Some(default) => ArgValue::Single(default.clone()),
                    None if entry.optional => ArgValue::Many(Vec::new()),
                    None => ArgValue::Null,
                },
                1 => rest.into_iter().next().map(ArgValue::Single).unwrap_or(ArgValue::Null),
                _ => ArgValue::Many(rest),
            }
        } else {
            values
                .next()
                .map(ArgValue::Single)
                .unwrap_or_else(|| entry.default.clone().into())
        };
        args.insert(entry.name.clone(), value);
    }

    args
}
