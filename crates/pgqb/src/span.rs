//! Instrumentation side-channel.
//!
//! A [`QueryBuilder`](crate::QueryBuilder) can be given an [`AttributeSink`]
//! at construction. After each statement is generated the builder reports a
//! few attributes into it, using OpenTelemetry database semantic-convention
//! keys:
//!
//! - `db.collection.name`: the table name, unquoted
//! - `db.operation.name`: always `SELECT`
//! - `db.query.text`: the generated SQL
//! - `db.query.parameter.<column>`: the value of each scalar WHERE condition
//!
//! Reporting happens after generation and never influences the returned SQL
//! or arguments.
//!
//! # Example
//!
//! ```rust,ignore
//! use pgqb::{Condition, QbOption, QueryBuilder, RecordingSink};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(RecordingSink::new());
//! let qb = QueryBuilder::with_options([QbOption::Sink(sink.clone())])
//!     .from("users")?
//!     .where_and([Condition::eq("name", "Mark")?]);
//!
//! let built = qb.to_select_sql();
//! assert_eq!(sink.get("db.query.parameter.name").as_deref(), Some("Mark"));
//! ```

use std::sync::Mutex;

pub const COLLECTION_NAME: &str = "db.collection.name";
pub const OPERATION_NAME: &str = "db.operation.name";
pub const QUERY_TEXT: &str = "db.query.text";
pub const QUERY_PARAMETER_PREFIX: &str = "db.query.parameter.";

/// Fixed value reported under [`OPERATION_NAME`] for every statement.
pub const OPERATION_VALUE: &str = "SELECT";

/// Receiver for instrumentation attributes.
///
/// Implement this to forward attributes to a tracing span, a metrics system,
/// or anything else that accepts string key/value pairs.
pub trait AttributeSink: Send + Sync {
    /// Record one attribute. Recording the same key twice overwrites or
    /// appends, at the implementation's choice.
    fn record_attribute(&self, key: &str, value: &str);
}

/// A sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl AttributeSink for NoopSink {
    fn record_attribute(&self, _key: &str, _value: &str) {}
}

/// A sink that keeps every attribute in memory, in recording order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    attributes: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All attributes recorded so far, oldest first.
    pub fn attributes(&self) -> Vec<(String, String)> {
        match self.attributes.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The most recent value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.attributes()
            .into_iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// True when `key` was recorded with exactly `value` at least once.
    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.attributes()
            .iter()
            .any(|(k, v)| k == key && v == value)
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        match self.attributes.lock() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl AttributeSink for RecordingSink {
    fn record_attribute(&self, key: &str, value: &str) {
        let entry = (key.to_string(), value.to_string());
        match self.attributes.lock() {
            Ok(mut guard) => guard.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }
}

/// Truncate `s` to at most `max_bytes`, backing off to a char boundary.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(feature = "tracing")]
pub use tracing_sink::TracingSink;

#[cfg(feature = "tracing")]
mod tracing_sink {
    use super::{AttributeSink, truncate_bytes};
    use tracing::{Level, Span};

    /// A `tracing`-based sink that emits each attribute as an event inside a
    /// caller-supplied span.
    ///
    /// Enable via the crate feature: `pgqb = { features = ["tracing"] }`.
    #[derive(Debug, Clone)]
    pub struct TracingSink {
        span: Span,
        /// Tracing event level to emit at.
        pub level: Level,
        /// Truncate long values (in bytes). `None` means no truncation.
        pub max_value_length: Option<usize>,
    }

    impl TracingSink {
        /// Emit into `span` at `DEBUG`, truncating values past 200 bytes.
        pub fn new(span: Span) -> Self {
            Self {
                span,
                level: Level::DEBUG,
                max_value_length: Some(200),
            }
        }

        /// Emit into the span that is current at construction time.
        pub fn current() -> Self {
            Self::new(Span::current())
        }

        /// Override the tracing event level.
        pub fn level(mut self, level: Level) -> Self {
            self.level = level;
            self
        }

        /// Set maximum value length to display.
        pub fn max_value_length(mut self, len: usize) -> Self {
            self.max_value_length = Some(len);
            self
        }

        /// Disable value truncation.
        pub fn no_truncate(mut self) -> Self {
            self.max_value_length = None;
            self
        }

        pub(crate) fn truncate(&self, value: &str) -> String {
            match self.max_value_length {
                Some(max) if value.len() > max => format!("{}...", truncate_bytes(value, max)),
                _ => value.to_string(),
            }
        }
    }

    impl AttributeSink for TracingSink {
        fn record_attribute(&self, key: &str, value: &str) {
            /// Dispatch a tracing event at a runtime-determined level.
            macro_rules! emit_at_level {
                ($level:expr, $($field:tt)*) => {
                    match $level {
                        Level::ERROR => tracing::error!($($field)*),
                        Level::WARN  => tracing::warn!($($field)*),
                        Level::INFO  => tracing::info!($($field)*),
                        Level::DEBUG => tracing::debug!($($field)*),
                        Level::TRACE => tracing::trace!($($field)*),
                    }
                };
            }

            let value = self.truncate(value);
            self.span.in_scope(|| {
                emit_at_level!(self.level, target: "pgqb.span", key, value = %value);
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order_and_latest() {
        let sink = RecordingSink::new();
        sink.record_attribute("a", "1");
        sink.record_attribute("b", "2");
        sink.record_attribute("a", "3");

        assert_eq!(sink.attributes().len(), 3);
        assert_eq!(sink.get("a").as_deref(), Some("3"));
        assert!(sink.contains("a", "1"));
        assert!(!sink.contains("c", "1"));

        sink.clear();
        assert!(sink.attributes().is_empty());
    }

    #[test]
    fn test_noop_sink() {
        NoopSink.record_attribute("a", "1");
    }

    #[test]
    fn test_truncate_bytes_respects_char_boundary() {
        assert_eq!(truncate_bytes("abc", 10), "abc");
        assert_eq!(truncate_bytes("abcdef", 3), "abc");
        // 'é' is two bytes; cutting at 1 backs off to 0.
        assert_eq!(truncate_bytes("é", 1), "");
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn test_tracing_sink_without_subscriber() {
        let sink = TracingSink::new(tracing::Span::none()).max_value_length(4);
        sink.record_attribute(QUERY_TEXT, "SELECT 1");
        assert_eq!(sink.truncate("SELECT 1"), "SELE...");
    }
}
