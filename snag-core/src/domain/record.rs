//! Log record domain types

use chrono::{DateTime, Utc};

use super::exception::ExceptionRef;
use super::level::Level;

/// Free-form key/value metadata
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Context passed along with a log call
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Error the event is about, if any
    pub exception: Option<ExceptionRef>,

    /// Remaining context values
    pub fields: Metadata,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.exception.is_none() && self.fields.is_empty()
    }
}

/// A single log event handed to a handler
///
/// Handlers only read records. `formatted` is filled in by the processing
/// pipeline before the record reaches a handler's `write`.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub channel: String,
    pub level: Level,
    pub message: String,
    pub formatted: String,
    pub datetime: DateTime<Utc>,
    pub context: Context,

    /// Metadata added by processors. `None` means no extra was attached,
    /// which is different from an attached but empty map.
    pub extra: Option<Metadata>,
}

impl LogRecord {
    /// Creates a record stamped with the current time
    pub fn new(channel: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            level,
            message: message.into(),
            formatted: String::new(),
            datetime: Utc::now(),
            context: Context::default(),
            extra: None,
        }
    }

    pub fn with_exception(mut self, exception: ExceptionRef) -> Self {
        self.context.exception = Some(exception);
        self
    }

    pub fn with_context(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.context.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_extra(mut self, extra: Metadata) -> Self {
        self.extra = Some(extra);
        self
    }

    /// Adds one extra value, attaching an extra map if there was none
    pub fn with_extra_value(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.extra
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_formatted(mut self, formatted: impl Into<String>) -> Self {
        self.formatted = formatted.into();
        self
    }

    pub fn with_datetime(mut self, datetime: DateTime<Utc>) -> Self {
        self.datetime = datetime;
        self
    }

    pub fn has_exception(&self) -> bool {
        self.context.exception.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_record_has_no_extra() {
        let record = LogRecord::new("app", Level::INFO, "hello");
        assert_eq!(record.channel, "app");
        assert_eq!(record.message, "hello");
        assert!(record.formatted.is_empty());
        assert!(record.extra.is_none());
        assert!(record.context.is_empty());
        assert!(!record.has_exception());
    }

    #[test]
    fn test_extra_presence_is_kept_apart_from_emptiness() {
        let record = LogRecord::new("app", Level::INFO, "hello").with_extra(Metadata::new());
        assert_eq!(record.extra.as_ref().map(|m| m.is_empty()), Some(true));
    }

    #[test]
    fn test_with_extra_value_creates_the_map() {
        let record = LogRecord::new("app", Level::WARNING, "disk low")
            .with_extra_value("free_gb", 2)
            .with_extra_value("mount", "/var");

        let extra = record.extra.unwrap();
        assert_eq!(extra.get("free_gb"), Some(&json!(2)));
        assert_eq!(extra.get("mount"), Some(&json!("/var")));
    }

    #[test]
    fn test_with_exception() {
        let exception = ExceptionRef::new(std::io::Error::other("boom"));
        let record =
            LogRecord::new("app", Level::CRITICAL, "boom").with_exception(exception.clone());

        assert!(record.has_exception());
        assert!(record.context.exception.as_ref().unwrap().ptr_eq(&exception));
    }
}
