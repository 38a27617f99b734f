//! Column-name to value maps used to build parameterized SQL fragments.

use crate::value::Value;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Token replaced by the field name in [`ValuesMap::format`] patterns.
pub const FIELD_TOKEN: &str = "%field";

/// An ordered-by-key mapping from column name to bound value.
///
/// Iteration, [`fields`](ValuesMap::fields), [`values`](ValuesMap::values) and
/// [`format`](ValuesMap::format) all follow ascending column-name order, so the
/// SQL text and its parameter list always line up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValuesMap {
    entries: BTreeMap<String, Value>,
}

impl ValuesMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value for the same column.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(column.into(), value.into())
    }

    /// Insert a value (consuming version).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.entries.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.entries.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    /// Column names in ascending order.
    pub fn fields(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Values in ascending column-name order.
    pub fn values(&self) -> Vec<Value> {
        self.entries.values().cloned().collect()
    }

    /// Render `pattern` once per column and join the results with `sep`.
    ///
    /// Every `%field` in `pattern` is replaced with the column name.
    ///
    /// ```ignore
    /// let m = values!{ "f1" => 1, "f2" => 2 };
    /// assert_eq!(m.format("%field = ?", ", "), "f1 = ?, f2 = ?");
    /// ```
    pub fn format(&self, pattern: &str, sep: &str) -> String {
        self.entries
            .keys()
            .map(|field| pattern.replace(FIELD_TOKEN, field))
            .collect::<Vec<_>>()
            .join(sep)
    }

    /// Keep only the columns for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Value) -> bool) {
        self.entries.retain(|k, v| keep(k, v));
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValuesMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for ValuesMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for ValuesMap {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValuesMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Build a [`ValuesMap`] from `column => value` pairs.
///
/// # Example
/// ```ignore
/// let m = sqler::values! { "f1" => 1, "f2" => sqler::Value::Null };
/// ```
#[macro_export]
macro_rules! values {
    () => {
        $crate::ValuesMap::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::ValuesMap::new();
        $(map.insert($column, $value);)+
        map
    }};
}
