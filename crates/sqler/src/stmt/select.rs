//! SELECT statement.

use crate::error::SqlerResult;
use crate::part::QueryPart;
use crate::stmt::traits::{RowQuery, Statement};
use crate::stmt::validate_filter;
use crate::value::Value;

/// `SELECT <fields or *> FROM <table> [WHERE <filter>]`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    pub table: String,
    /// Selected columns; empty selects `*`.
    pub fields: Vec<String>,
    pub filter: Option<QueryPart>,
}

impl Select {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            fields: Vec::new(),
            filter: None,
        }
    }

    /// Set the selected columns.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.fields = fields.into_iter().map(|f| f.as_ref().to_string()).collect();
        self
    }

    /// Set the WHERE clause.
    pub fn filter(mut self, filter: QueryPart) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl Statement for Select {
    fn format(&self) -> (String, Vec<Value>) {
        let fields = if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(", ")
        };
        let mut sql = format!("SELECT {} FROM {}", fields, self.table);
        let mut values = Vec::new();

        if let Some(filter) = &self.filter {
            sql.push_str(" WHERE ");
            sql.push_str(&filter.query);
            values.extend(filter.values.iter().cloned());
        }

        (sql, values)
    }

    fn validate(&self) -> SqlerResult<()> {
        validate_filter("SELECT", &self.table, self.filter.as_ref())
    }
}

impl RowQuery for Select {}
