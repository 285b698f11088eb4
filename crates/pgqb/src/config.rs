//! Builder configuration.

use crate::span::AttributeSink;
use std::fmt;
use std::sync::Arc;

/// How condition values reach the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Values become `$n` placeholders and are returned as arguments.
    #[default]
    Placeholder,
    /// Values are formatted inline as SQL literals; no arguments are produced.
    Literal,
}

/// Configuration applied when a [`QueryBuilder`](crate::QueryBuilder) is created.
///
/// By default WHERE values are parameterized and no attribute sink is attached.
#[derive(Clone, Default)]
pub struct QbConfig {
    /// Placeholder or literal rendering for WHERE values.
    pub mode: RenderMode,
    /// Receiver for instrumentation attributes. `None` means nothing is reported.
    pub sink: Option<Arc<dyn AttributeSink>>,
}

impl QbConfig {
    /// Create a new configuration with defaults (placeholder mode, no sink).
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` parameterizes WHERE values (the default), `false` inlines them.
    pub fn with_parse_where(mut self, parse: bool) -> Self {
        self.mode = if parse {
            RenderMode::Placeholder
        } else {
            RenderMode::Literal
        };
        self
    }

    /// Set the render mode directly.
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Attach an attribute sink.
    pub fn with_sink(mut self, sink: Arc<dyn AttributeSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Apply a single option.
    pub fn apply(self, option: QbOption) -> Self {
        match option {
            QbOption::ParseWhere(parse) => self.with_parse_where(parse),
            QbOption::Sink(sink) => self.with_sink(sink),
        }
    }
}

impl fmt::Debug for QbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QbConfig")
            .field("mode", &self.mode)
            .field("sink", &self.sink.as_ref().map(|_| "<dyn AttributeSink>"))
            .finish()
    }
}

/// Named construction option, for the variadic
/// [`QueryBuilder::with_options`](crate::QueryBuilder::with_options) form.
///
/// Options apply in order; a later option overrides an earlier one.
#[derive(Clone)]
pub enum QbOption {
    /// `true` for placeholder mode (default), `false` for literal mode.
    ParseWhere(bool),
    /// Attribute sink for instrumentation.
    Sink(Arc<dyn AttributeSink>),
}

impl fmt::Debug for QbOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QbOption::ParseWhere(parse) => f.debug_tuple("ParseWhere").field(parse).finish(),
            QbOption::Sink(_) => f.debug_tuple("Sink").field(&"<dyn AttributeSink>").finish(),
        }
    }
}

impl FromIterator<QbOption> for QbConfig {
    fn from_iter<I: IntoIterator<Item = QbOption>>(options: I) -> Self {
        options.into_iter().fold(QbConfig::new(), QbConfig::apply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::RecordingSink;

    #[test]
    fn test_default_is_placeholder_mode() {
        let config = QbConfig::new();
        assert_eq!(config.mode, RenderMode::Placeholder);
        assert!(config.sink.is_none());
    }

    #[test]
    fn test_options_apply_in_order() {
        let config: QbConfig = [QbOption::ParseWhere(false), QbOption::ParseWhere(true)]
            .into_iter()
            .collect();
        assert_eq!(config.mode, RenderMode::Placeholder);

        let config: QbConfig = [
            QbOption::ParseWhere(false),
            QbOption::Sink(Arc::new(RecordingSink::new())),
        ]
        .into_iter()
        .collect();
        assert_eq!(config.mode, RenderMode::Literal);
        assert!(config.sink.is_some());
    }
}
