//! UPDATE statement.

use crate::error::{SqlerError, SqlerResult};
use crate::part::QueryPart;
use crate::stmt::traits::Statement;
use crate::stmt::validate_filter;
use crate::value::Value;
use crate::values_map::ValuesMap;

/// `UPDATE <table> SET c1 = ?, c2 = ? [WHERE <filter>]`
///
/// Without a filter every row of the table is updated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    pub table: String,
    pub values: ValuesMap,
    pub filter: Option<QueryPart>,
}

impl Update {
    pub fn new(table: impl Into<String>, values: ValuesMap) -> Self {
        Self {
            table: table.into(),
            values,
            filter: None,
        }
    }

    /// Add or replace a SET value.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(column, value);
        self
    }

    /// Set the WHERE clause.
    pub fn filter(mut self, filter: QueryPart) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl Statement for Update {
    fn format(&self) -> (String, Vec<Value>) {
        let mut sql = format!(
            "UPDATE {} SET {}",
            self.table,
            self.values.format("%field = ?", ", ")
        );
        let mut values = self.values.values();

        if let Some(filter) = &self.filter {
            sql.push_str(" WHERE ");
            sql.push_str(&filter.query);
            values.extend(filter.values.iter().cloned());
        }

        (sql, values)
    }

    fn validate(&self) -> SqlerResult<()> {
        if self.values.is_empty() {
            return Err(SqlerError::validation(format!(
                "UPDATE {} requires at least one SET value",
                self.table
            )));
        }
        validate_filter("UPDATE", &self.table, self.filter.as_ref())
    }
}
