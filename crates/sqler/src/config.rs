//! Configuration for [`InstrumentedClient`](crate::InstrumentedClient).

use crate::placeholder::Placeholder;
use serde::Deserialize;
use std::time::Duration;

/// Configuration for `InstrumentedClient`.
///
/// Builder-style, and also deserializable so applications can keep it in
/// their own config files:
///
/// ```toml
/// [sqler]
/// placeholder = "dollar"
/// log_params = true
/// max_sql_length = 500
/// slow_query_threshold_ms = 250
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SqlerConfig {
    /// Override the placeholder style reported by the wrapped executor.
    pub placeholder: Option<Placeholder>,
    /// Whether to emit `tracing` events for each statement.
    pub logging_enabled: bool,
    /// Whether to render bound values into log events.
    pub log_params: bool,
    /// Truncate logged SQL to this many bytes. `None` disables truncation.
    pub max_sql_length: Option<usize>,
    /// Statements slower than this are logged at `warn`.
    #[serde(rename = "slow_query_threshold_ms", with = "millis")]
    pub slow_query_threshold: Option<Duration>,
}

impl Default for SqlerConfig {
    fn default() -> Self {
        Self {
            placeholder: None,
            logging_enabled: true,
            log_params: false,
            max_sql_length: Some(200),
            slow_query_threshold: None,
        }
    }
}

impl SqlerConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a placeholder style regardless of the wrapped executor.
    pub fn placeholder(mut self, placeholder: Placeholder) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    /// Enable or disable statement logging.
    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Include bound values in log events.
    pub fn log_params(mut self, enabled: bool) -> Self {
        self.log_params = enabled;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Set the slow query threshold.
    pub fn slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
