//! Statement logging around any executor.

use crate::client::{Execer, Querier};
use crate::config::SqlerConfig;
use crate::error::SqlerResult;
use crate::placeholder::Placeholder;
use crate::value::Value;
use std::time::{Duration, Instant};

/// Wraps an [`Execer`]/[`Querier`] and emits `tracing` events for every
/// statement it runs.
///
/// Events use the `sqler.sql` target: `debug` for normal statements, `warn`
/// for failures and for statements slower than the configured threshold.
/// The config can also override the placeholder style of the wrapped client.
///
/// # Example
///
/// ```ignore
/// let client = InstrumentedClient::new(pg_client)
///     .with_config(SqlerConfig::new().log_params(true));
/// Insert::new("users", values).exec(&client).await?;
/// ```
#[derive(Debug)]
pub struct InstrumentedClient<C> {
    client: C,
    config: SqlerConfig,
}

impl<C> InstrumentedClient<C> {
    /// Wrap a client with the default configuration.
    pub fn new(client: C) -> Self {
        Self {
            client,
            config: SqlerConfig::default(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: SqlerConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &SqlerConfig {
        &self.config
    }

    /// Get a reference to the inner client.
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Get the inner client, consuming this wrapper.
    pub fn into_inner(self) -> C {
        self.client
    }

    fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.config.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)).into(),
            _ => sql.into(),
        }
    }

    fn render_params(&self, values: &[Value]) -> String {
        if self.config.log_params {
            let rendered: Vec<String> = values.iter().map(ToString::to_string).collect();
            format!("[{}]", rendered.join(", "))
        } else {
            format!("<{} value(s)>", values.len())
        }
    }

    /// Decide how a finished statement is reported; `None` when logging is off.
    fn classify<T>(
        &self,
        elapsed: Duration,
        result: &SqlerResult<T>,
        rows: impl FnOnce(&T) -> u64,
    ) -> Option<Outcome> {
        if !self.config.logging_enabled {
            return None;
        }
        let outcome = match result {
            Err(_) => Outcome::Failed,
            Ok(value) => {
                let rows = rows(value);
                let slow = self
                    .config
                    .slow_query_threshold
                    .is_some_and(|threshold| elapsed >= threshold);
                if slow {
                    Outcome::Slow { rows }
                } else {
                    Outcome::Completed { rows }
                }
            }
        };
        Some(outcome)
    }

    fn log_outcome<T>(
        &self,
        kind: &'static str,
        sql: &str,
        values: &[Value],
        elapsed: Duration,
        result: &SqlerResult<T>,
        rows: impl FnOnce(&T) -> u64,
    ) {
        let Some(outcome) = self.classify(elapsed, result, rows) else {
            return;
        };

        let sql = self.truncate_sql(sql);
        let params = self.render_params(values);
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;

        match outcome {
            Outcome::Completed { rows } => {
                tracing::debug!(
                    target: "sqler.sql",
                    kind,
                    sql = %sql,
                    params = %params,
                    rows,
                    elapsed_ms,
                    "statement"
                );
            }
            Outcome::Slow { rows } => {
                tracing::warn!(
                    target: "sqler.sql",
                    kind,
                    sql = %sql,
                    params = %params,
                    rows,
                    elapsed_ms,
                    "slow statement"
                );
            }
            Outcome::Failed => {
                if let Err(error) = result {
                    tracing::warn!(
                        target: "sqler.sql",
                        kind,
                        sql = %sql,
                        params = %params,
                        elapsed_ms,
                        %error,
                        "statement failed"
                    );
                }
            }
        }
    }
}

/// How a finished statement is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    /// `debug`
    Completed { rows: u64 },
    /// `warn`, elapsed time at or over the threshold
    Slow { rows: u64 },
    /// `warn`, with the error
    Failed,
}

/// Cut `sql` to at most `max_bytes`, respecting char boundaries.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

impl<C: Execer> Execer for InstrumentedClient<C> {
    async fn exec(&self, sql: &str, values: &[Value]) -> SqlerResult<u64> {
        let start = Instant::now();
        let result = self.client.exec(sql, values).await;
        self.log_outcome("exec", sql, values, start.elapsed(), &result, |n| *n);
        result
    }

    fn placeholder(&self) -> Placeholder {
        self.config
            .placeholder
            .unwrap_or_else(|| self.client.placeholder())
    }
}

impl<C: Querier> Querier for InstrumentedClient<C> {
    type Row = C::Row;

    async fn query(&self, sql: &str, values: &[Value]) -> SqlerResult<Vec<Self::Row>> {
        let start = Instant::now();
        let result = self.client.query(sql, values).await;
        self.log_outcome("query", sql, values, start.elapsed(), &result, |rows| {
            rows.len() as u64
        });
        result
    }
}

#[cfg(test)]
mod tests;
