//! SQL fragments with their positional parameters.

use crate::error::{SqlerError, SqlerResult};
use crate::placeholder::count_placeholders;
use crate::value::Value;
use crate::values_map::ValuesMap;

/// A SQL fragment paired with the values bound to its `?` placeholders.
///
/// Parts are used as WHERE clauses for [`Update`](crate::Update) and
/// [`Select`](crate::Select), and can be combined with [`QueryPart::and`] and
/// [`QueryPart::or`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPart {
    pub query: String,
    pub values: Vec<Value>,
}

/// Create a fragment from raw SQL and its values.
///
/// # Example
/// ```ignore
/// let cond = sqler::part("f2 > ?", [10]);
/// ```
pub fn part<V: Into<Value>>(query: impl Into<String>, values: impl IntoIterator<Item = V>) -> QueryPart {
    QueryPart::new(query, values)
}

/// `f1 = ? AND f2 = ?` over the columns of `values`, in column-name order.
pub fn equal(values: &ValuesMap) -> QueryPart {
    QueryPart {
        query: values.format("%field = ?", " AND "),
        values: values.values(),
    }
}

impl QueryPart {
    pub fn new<V: Into<Value>>(query: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            query: query.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// A fragment without parameters.
    pub fn raw(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            values: Vec::new(),
        }
    }

    /// Whether the fragment has no SQL text.
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
    }

    /// `(self) AND (other)`; an empty side is dropped.
    pub fn and(self, other: QueryPart) -> QueryPart {
        self.join(other, "AND")
    }

    /// `(self) OR (other)`; an empty side is dropped.
    pub fn or(self, other: QueryPart) -> QueryPart {
        self.join(other, "OR")
    }

    fn join(mut self, other: QueryPart, op: &str) -> QueryPart {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        self.query = format!("({}) {} ({})", self.query, op, other.query);
        self.values.extend(other.values);
        self
    }

    /// Append a trailing fragment verbatim (e.g. `ORDER BY id`), keeping value order.
    pub fn push(mut self, suffix: QueryPart) -> QueryPart {
        if suffix.is_empty() {
            return self;
        }
        if !self.query.is_empty() {
            self.query.push(' ');
        }
        self.query.push_str(&suffix.query);
        self.values.extend(suffix.values);
        self
    }

    /// Check that the number of `?` placeholders matches the number of values.
    pub fn validate(&self) -> SqlerResult<()> {
        let expected = count_placeholders(&self.query);
        if expected != self.values.len() {
            return Err(SqlerError::validation(format!(
                "placeholder count mismatch: {} placeholder(s), {} value(s) in `{}`",
                expected,
                self.values.len(),
                self.query
            )));
        }
        Ok(())
    }
}

impl From<&str> for QueryPart {
    fn from(query: &str) -> Self {
        QueryPart::raw(query)
    }
}

impl From<String> for QueryPart {
    fn from(query: String) -> Self {
        QueryPart::raw(query)
    }
}
