use super::{InstrumentedClient, Outcome, truncate_sql_bytes};
use crate::error::{SqlerError, SqlerResult};
use crate::{Execer, Querier, SqlerConfig, Value, ValuesMap};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber, span};

// ==================== helpers ====================

/// Executor that waits, then fails or reports `rows` rows.
#[derive(Default)]
struct ScriptedClient {
    delay: Duration,
    fail: bool,
    rows: usize,
}

impl ScriptedClient {
    async fn run(&self) -> SqlerResult<usize> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(SqlerError::driver("connection reset"));
        }
        Ok(self.rows)
    }
}

impl Execer for ScriptedClient {
    async fn exec(&self, _: &str, _: &[Value]) -> SqlerResult<u64> {
        self.run().await.map(|n| n as u64)
    }
}

impl Querier for ScriptedClient {
    type Row = ValuesMap;

    async fn query(&self, _: &str, _: &[Value]) -> SqlerResult<Vec<ValuesMap>> {
        self.run().await.map(|n| vec![ValuesMap::new(); n])
    }
}

#[derive(Debug)]
struct CapturedEvent {
    level: Level,
    target: String,
    fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }
}

/// Subscriber that records every event it sees.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<CapturedEvent>>>);

impl Capture {
    fn events(&self) -> std::sync::MutexGuard<'_, Vec<CapturedEvent>> {
        self.0.lock().unwrap()
    }
}

#[derive(Default)]
struct FieldMap(BTreeMap<String, String>);

impl Visit for FieldMap {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl Subscriber for Capture {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
        span::Id::from_u64(1)
    }

    fn record(&self, _: &span::Id, _: &span::Record<'_>) {}

    fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut fields = FieldMap::default();
        event.record(&mut fields);
        self.0.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: fields.0,
        });
    }

    fn enter(&self, _: &span::Id) {}

    fn exit(&self, _: &span::Id) {}
}

// ==================== formatting ====================

#[test]
fn truncate_respects_char_boundary() {
    assert_eq!(truncate_sql_bytes("abc", 10), "abc");
    assert_eq!(truncate_sql_bytes("héllo", 2), "h");
    assert_eq!(truncate_sql_bytes("héllo", 3), "hé");
}

#[test]
fn params_hidden_by_default() {
    let client = InstrumentedClient::new(());
    assert_eq!(client.render_params(&[Value::Int(1), Value::Null]), "<2 value(s)>");
}

#[test]
fn params_rendered_when_enabled() {
    let client = InstrumentedClient::new(()).with_config(SqlerConfig::new().log_params(true));
    assert_eq!(
        client.render_params(&[Value::Int(1), Value::Text("a".into())]),
        "[1, 'a']"
    );
}

#[test]
fn long_sql_is_truncated() {
    let client = InstrumentedClient::new(()).with_config(SqlerConfig::new().max_sql_length(6));
    assert_eq!(client.truncate_sql("SELECT * FROM t"), "SELECT...");
    let client = InstrumentedClient::new(()).with_config(SqlerConfig::new().no_truncate());
    assert_eq!(client.truncate_sql("SELECT * FROM t"), "SELECT * FROM t");
}

// ==================== classification ====================

#[test]
fn classify_completed_and_slow() {
    let client = InstrumentedClient::new(())
        .with_config(SqlerConfig::new().slow_query_threshold(Duration::from_millis(100)));
    let ok: SqlerResult<u64> = Ok(4);

    assert_eq!(
        client.classify(Duration::from_millis(99), &ok, |n| *n),
        Some(Outcome::Completed { rows: 4 })
    );
    assert_eq!(
        client.classify(Duration::from_millis(100), &ok, |n| *n),
        Some(Outcome::Slow { rows: 4 })
    );
}

#[test]
fn classify_without_threshold_is_never_slow() {
    let client = InstrumentedClient::new(());
    let ok: SqlerResult<u64> = Ok(0);
    assert_eq!(
        client.classify(Duration::from_secs(3600), &ok, |n| *n),
        Some(Outcome::Completed { rows: 0 })
    );
}

#[test]
fn classify_failure_ignores_threshold() {
    let client = InstrumentedClient::new(())
        .with_config(SqlerConfig::new().slow_query_threshold(Duration::ZERO));
    let err: SqlerResult<u64> = Err(SqlerError::driver("boom"));
    assert_eq!(
        client.classify(Duration::from_secs(1), &err, |n| *n),
        Some(Outcome::Failed)
    );
}

#[test]
fn classify_disabled_reports_nothing() {
    let client = InstrumentedClient::new(()).with_config(SqlerConfig::new().logging(false));
    let err: SqlerResult<u64> = Err(SqlerError::driver("boom"));
    assert_eq!(client.classify(Duration::from_secs(1), &err, |n| *n), None);
}

// ==================== emitted events ====================

#[tokio::test]
async fn completed_statement_logs_debug() {
    let capture = Capture::default();
    let _guard = tracing::subscriber::set_default(capture.clone());

    let client = InstrumentedClient::new(ScriptedClient {
        rows: 3,
        ..ScriptedClient::default()
    });
    let affected = client.exec("DELETE FROM t WHERE a = ?", &[Value::Int(1)]).await.unwrap();
    assert_eq!(affected, 3);

    let events = capture.events();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.level, Level::DEBUG);
    assert_eq!(event.target, "sqler.sql");
    assert_eq!(event.field("message"), "statement");
    assert_eq!(event.field("kind"), "exec");
    assert_eq!(event.field("rows"), "3");
    assert_eq!(event.field("sql"), "DELETE FROM t WHERE a = ?");
    assert_eq!(event.field("params"), "<1 value(s)>");
}

#[tokio::test]
async fn slow_statement_logs_warn() {
    let capture = Capture::default();
    let _guard = tracing::subscriber::set_default(capture.clone());

    let client = InstrumentedClient::new(ScriptedClient {
        delay: Duration::from_millis(20),
        rows: 1,
        ..ScriptedClient::default()
    })
    .with_config(SqlerConfig::new().slow_query_threshold(Duration::from_millis(5)));
    client.exec("UPDATE t SET a = ?", &[Value::Int(1)]).await.unwrap();

    let events = capture.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::WARN);
    assert_eq!(events[0].field("message"), "slow statement");
    assert_eq!(events[0].field("rows"), "1");
}

#[tokio::test]
async fn failed_statement_logs_warn_and_returns_error() {
    let capture = Capture::default();
    let _guard = tracing::subscriber::set_default(capture.clone());

    let client = InstrumentedClient::new(ScriptedClient {
        fail: true,
        ..ScriptedClient::default()
    })
    .with_config(SqlerConfig::new().log_params(true));
    let err = client
        .exec("INSERT INTO t (a) VALUES(?)", &[Value::Text("x".into())])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlerError::Driver(ref m) if m == "connection reset"));

    let events = capture.events();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.level, Level::WARN);
    assert_eq!(event.field("message"), "statement failed");
    assert_eq!(event.field("error"), "Driver error: connection reset");
    assert_eq!(event.field("params"), "['x']");
    assert!(!event.fields.contains_key("rows"));
}

#[tokio::test]
async fn disabled_logging_emits_nothing() {
    let capture = Capture::default();
    let _guard = tracing::subscriber::set_default(capture.clone());

    let client = InstrumentedClient::new(ScriptedClient {
        fail: true,
        ..ScriptedClient::default()
    })
    .with_config(SqlerConfig::new().logging(false));
    assert!(client.exec("SELECT 1", &[]).await.is_err());

    assert!(capture.events().is_empty());
}

#[tokio::test]
async fn query_reports_returned_rows() {
    let capture = Capture::default();
    let _guard = tracing::subscriber::set_default(capture.clone());

    let client = InstrumentedClient::new(ScriptedClient {
        rows: 2,
        ..ScriptedClient::default()
    })
    .with_config(SqlerConfig::new().max_sql_length(8));
    let rows = client.query("SELECT * FROM t", &[]).await.unwrap();
    assert_eq!(rows.len(), 2);

    let events = capture.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("kind"), "query");
    assert_eq!(events[0].field("rows"), "2");
    assert_eq!(events[0].field("sql"), "SELECT *...");
}
