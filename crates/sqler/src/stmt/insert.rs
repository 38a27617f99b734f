//! INSERT and REPLACE statements.

use crate::error::{SqlerError, SqlerResult};
use crate::stmt::traits::Statement;
use crate::value::Value;
use crate::values_map::ValuesMap;

/// `INSERT INTO <table> (<columns>) VALUES(<placeholders>)`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insert {
    pub table: String,
    pub values: ValuesMap,
}

/// `REPLACE INTO <table> (<columns>) VALUES(<placeholders>)`
///
/// For drivers that understand `REPLACE` (MySQL, SQLite).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Replace {
    pub table: String,
    pub values: ValuesMap,
}

impl Insert {
    pub fn new(table: impl Into<String>, values: ValuesMap) -> Self {
        Self {
            table: table.into(),
            values,
        }
    }

    /// Add or replace a column value.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(column, value);
        self
    }
}

impl Replace {
    pub fn new(table: impl Into<String>, values: ValuesMap) -> Self {
        Self {
            table: table.into(),
            values,
        }
    }

    /// Add or replace a column value.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(column, value);
        self
    }
}

fn format_into(verb: &str, table: &str, values: &ValuesMap) -> (String, Vec<Value>) {
    let sql = format!(
        "{} INTO {} ({}) VALUES({})",
        verb,
        table,
        values.format("%field", ", "),
        values.format("?", ", ")
    );
    (sql, values.values())
}

fn require_values(verb: &str, table: &str, values: &ValuesMap) -> SqlerResult<()> {
    if values.is_empty() {
        return Err(SqlerError::validation(format!(
            "{verb} INTO {table} requires at least one column value"
        )));
    }
    Ok(())
}

impl Statement for Insert {
    fn format(&self) -> (String, Vec<Value>) {
        format_into("INSERT", &self.table, &self.values)
    }

    fn validate(&self) -> SqlerResult<()> {
        require_values("INSERT", &self.table, &self.values)
    }
}

impl Statement for Replace {
    fn format(&self) -> (String, Vec<Value>) {
        format_into("REPLACE", &self.table, &self.values)
    }

    fn validate(&self) -> SqlerResult<()> {
        require_values("REPLACE", &self.table, &self.values)
    }
}
