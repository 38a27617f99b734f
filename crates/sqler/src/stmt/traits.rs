//! Trait definitions for statements.

use crate::client::{Execer, Querier};
use crate::error::SqlerResult;
use crate::mapper::{Mapper, from_row};
use crate::part::QueryPart;
use crate::placeholder::Placeholder;
use crate::value::Value;
use std::future::Future;

/// Base trait for everything that renders to a SQL statement.
pub trait Statement: Sync {
    /// Render SQL with `?` placeholders and the values in placeholder order.
    fn format(&self) -> (String, Vec<Value>);

    /// Render SQL in the given placeholder style.
    fn format_with(&self, placeholder: Placeholder) -> (String, Vec<Value>) {
        let (sql, values) = self.format();
        (placeholder.rebind(&sql).into_owned(), values)
    }

    /// Validate statement state before execution.
    fn validate(&self) -> SqlerResult<()> {
        Ok(())
    }

    /// Execute and return affected row count.
    fn exec(&self, ex: &impl Execer) -> impl Future<Output = SqlerResult<u64>> + Send {
        async move {
            self.validate()?;
            let (sql, values) = self.format_with(ex.placeholder());
            ex.exec(&sql, &values).await
        }
    }
}

/// Statements that return rows.
pub trait RowQuery: Statement {
    /// Execute and return all rows.
    fn query<Q: Querier>(&self, q: &Q) -> impl Future<Output = SqlerResult<Vec<Q::Row>>> + Send {
        async move {
            self.validate()?;
            let (sql, values) = self.format_with(q.placeholder());
            q.query(&sql, &values).await
        }
    }

    /// Execute and return the first row, or [`SqlerError::NotFound`](crate::SqlerError::NotFound).
    fn query_row<Q: Querier>(&self, q: &Q) -> impl Future<Output = SqlerResult<Q::Row>> + Send {
        async move {
            self.validate()?;
            let (sql, values) = self.format_with(q.placeholder());
            q.query_row(&sql, &values).await
        }
    }

    /// Execute and return the first row, if any.
    fn query_opt<Q: Querier>(
        &self,
        q: &Q,
    ) -> impl Future<Output = SqlerResult<Option<Q::Row>>> + Send {
        async move {
            self.validate()?;
            let (sql, values) = self.format_with(q.placeholder());
            q.query_opt(&sql, &values).await
        }
    }

    /// Execute and map all rows to `T`.
    fn fetch_all<T, Q>(&self, q: &Q) -> impl Future<Output = SqlerResult<Vec<T>>> + Send
    where
        T: Mapper + Default + Send,
        Q: Querier,
    {
        async move {
            let rows = self.query(q).await?;
            rows.iter().map(from_row).collect()
        }
    }

    /// Execute and map the first row to `T`.
    fn fetch_one<T, Q>(&self, q: &Q) -> impl Future<Output = SqlerResult<T>> + Send
    where
        T: Mapper + Default + Send,
        Q: Querier,
    {
        async move {
            let row = self.query_row(q).await?;
            from_row(&row)
        }
    }

    /// Execute and map the first row to `T`, if any.
    fn fetch_opt<T, Q>(&self, q: &Q) -> impl Future<Output = SqlerResult<Option<T>>> + Send
    where
        T: Mapper + Default + Send,
        Q: Querier,
    {
        async move {
            let row = self.query_opt(q).await?;
            row.as_ref().map(from_row).transpose()
        }
    }
}

impl Statement for QueryPart {
    fn format(&self) -> (String, Vec<Value>) {
        (self.query.clone(), self.values.clone())
    }

    fn validate(&self) -> SqlerResult<()> {
        QueryPart::validate(self)
    }
}

impl RowQuery for QueryPart {}
