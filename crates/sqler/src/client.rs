//! Execution capabilities supplied by the caller.
//!
//! sqler builds statements and maps rows, but it never owns a connection.
//! Anything that can run a statement implements [`Execer`]; anything that can
//! also return rows implements [`Querier`]. Implementations are provided for
//! tokio-postgres clients and transactions (and deadpool-postgres with the
//! `pool` feature); other drivers can implement the traits directly.

use crate::error::{SqlerError, SqlerResult};
use crate::placeholder::Placeholder;
use crate::row::ResultRow;
use crate::value::{Value, params_ref};
use std::future::Future;

/// Runs statements that do not return rows.
pub trait Execer: Send + Sync {
    /// Execute a statement and return the number of affected rows.
    fn exec(&self, sql: &str, values: &[Value]) -> impl Future<Output = SqlerResult<u64>> + Send;

    /// Placeholder style the driver expects.
    ///
    /// Statements are rendered with this style before they are executed.
    fn placeholder(&self) -> Placeholder {
        Placeholder::Question
    }
}

/// Runs statements that return rows.
pub trait Querier: Execer {
    type Row: ResultRow + Send;

    /// Execute a query and return all rows.
    fn query(
        &self,
        sql: &str,
        values: &[Value],
    ) -> impl Future<Output = SqlerResult<Vec<Self::Row>>> + Send;

    /// Execute a query and return the **first** row.
    ///
    /// Semantics:
    /// - 0 rows: returns [`SqlerError::NotFound`]
    /// - 1 or more rows: returns the first row
    fn query_row(
        &self,
        sql: &str,
        values: &[Value],
    ) -> impl Future<Output = SqlerResult<Self::Row>> + Send {
        async move {
            let rows = self.query(sql, values).await?;
            rows.into_iter()
                .next()
                .ok_or_else(|| SqlerError::not_found("Expected one row, got none"))
        }
    }

    /// Execute a query and return the first row, if any.
    fn query_opt(
        &self,
        sql: &str,
        values: &[Value],
    ) -> impl Future<Output = SqlerResult<Option<Self::Row>>> + Send {
        async move {
            let rows = self.query(sql, values).await?;
            Ok(rows.into_iter().next())
        }
    }
}

impl Execer for tokio_postgres::Client {
    async fn exec(&self, sql: &str, values: &[Value]) -> SqlerResult<u64> {
        tokio_postgres::Client::execute(self, sql, &params_ref(values))
            .await
            .map_err(SqlerError::from_db_error)
    }

    fn placeholder(&self) -> Placeholder {
        Placeholder::Dollar
    }
}

impl Querier for tokio_postgres::Client {
    type Row = tokio_postgres::Row;

    async fn query(&self, sql: &str, values: &[Value]) -> SqlerResult<Vec<Self::Row>> {
        tokio_postgres::Client::query(self, sql, &params_ref(values))
            .await
            .map_err(SqlerError::from_db_error)
    }
}

impl Execer for tokio_postgres::Transaction<'_> {
    async fn exec(&self, sql: &str, values: &[Value]) -> SqlerResult<u64> {
        tokio_postgres::Transaction::execute(self, sql, &params_ref(values))
            .await
            .map_err(SqlerError::from_db_error)
    }

    fn placeholder(&self) -> Placeholder {
        Placeholder::Dollar
    }
}

impl Querier for tokio_postgres::Transaction<'_> {
    type Row = tokio_postgres::Row;

    async fn query(&self, sql: &str, values: &[Value]) -> SqlerResult<Vec<Self::Row>> {
        tokio_postgres::Transaction::query(self, sql, &params_ref(values))
            .await
            .map_err(SqlerError::from_db_error)
    }
}

#[cfg(feature = "pool")]
impl Execer for deadpool_postgres::Client {
    async fn exec(&self, sql: &str, values: &[Value]) -> SqlerResult<u64> {
        let client: &tokio_postgres::Client = self;
        Execer::exec(client, sql, values).await
    }

    fn placeholder(&self) -> Placeholder {
        Placeholder::Dollar
    }
}

#[cfg(feature = "pool")]
impl Querier for deadpool_postgres::Client {
    type Row = tokio_postgres::Row;

    async fn query(&self, sql: &str, values: &[Value]) -> SqlerResult<Vec<Self::Row>> {
        let client: &tokio_postgres::Client = self;
        Querier::query(client, sql, values).await
    }
}

#[cfg(feature = "pool")]
impl Execer for deadpool_postgres::Transaction<'_> {
    async fn exec(&self, sql: &str, values: &[Value]) -> SqlerResult<u64> {
        let tx: &tokio_postgres::Transaction<'_> = self;
        Execer::exec(tx, sql, values).await
    }

    fn placeholder(&self) -> Placeholder {
        Placeholder::Dollar
    }
}

#[cfg(feature = "pool")]
impl Querier for deadpool_postgres::Transaction<'_> {
    type Row = tokio_postgres::Row;

    async fn query(&self, sql: &str, values: &[Value]) -> SqlerResult<Vec<Self::Row>> {
        let tx: &tokio_postgres::Transaction<'_> = self;
        Querier::query(tx, sql, values).await
    }
}

// ===== Reference implementations =====

impl<C: Execer> Execer for &C {
    fn exec(&self, sql: &str, values: &[Value]) -> impl Future<Output = SqlerResult<u64>> + Send {
        (*self).exec(sql, values)
    }

    fn placeholder(&self) -> Placeholder {
        (*self).placeholder()
    }
}

impl<C: Querier> Querier for &C {
    type Row = C::Row;

    fn query(
        &self,
        sql: &str,
        values: &[Value],
    ) -> impl Future<Output = SqlerResult<Vec<Self::Row>>> + Send {
        (*self).query(sql, values)
    }

    fn query_row(
        &self,
        sql: &str,
        values: &[Value],
    ) -> impl Future<Output = SqlerResult<Self::Row>> + Send {
        (*self).query_row(sql, values)
    }

    fn query_opt(
        &self,
        sql: &str,
        values: &[Value],
    ) -> impl Future<Output = SqlerResult<Option<Self::Row>>> + Send {
        (*self).query_opt(sql, values)
    }
}
