//! Record formatting
//!
//! A [`Formatter`] renders a [`LogRecord`] to the text stored in its
//! `formatted` field. [`LineFormatter`] substitutes `%placeholder%` tokens in
//! a template:
//!
//! - `%message%`, `%channel%`, `%level%` (ordinal), `%level_name%`, `%datetime%`
//! - `%context%` and `%extra%` as JSON (`[]` when empty)
//! - `%context.KEY%` and `%extra.KEY%` for single values; a key used this way
//!   is left out of the `%context%`/`%extra%` dump
//!
//! Unknown tokens are kept verbatim. Substituted text is never rescanned, so a
//! message containing `%channel%` comes out unchanged.

use std::collections::HashSet;
use std::fmt::Write;

use serde_json::Value;

use crate::domain::record::{LogRecord, Metadata};

/// Renders records to text
pub trait Formatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;

    /// Renders several records as one block
    fn format_batch(&self, records: &[LogRecord]) -> String {
        records.iter().map(|record| self.format(record)).collect()
    }
}

/// Template-based single line formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormatter {
    template: String,
    date_format: String,
}

impl LineFormatter {
    pub const SIMPLE_FORMAT: &'static str =
        "[%datetime%] %channel%.%level_name%: %message% %context% %extra%\n";
    pub const SIMPLE_DATE: &'static str = "%Y-%m-%d %H:%M:%S";

    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            date_format: Self::SIMPLE_DATE.to_string(),
        }
    }

    /// Sets the `chrono` format string used for `%datetime%`
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    fn render_token(&self, token: &str, record: &LogRecord, used: &UsedKeys) -> Option<String> {
        if let Some(key) = token.strip_prefix("extra.") {
            return Some(
                record
                    .extra
                    .as_ref()
                    .and_then(|extra| extra.get(key))
                    .map(stringify_value)
                    .unwrap_or_default(),
            );
        }

        if let Some(key) = token.strip_prefix("context.") {
            if key == "exception" {
                return Some(
                    record
                        .context
                        .exception
                        .as_ref()
                        .map(|e| format!("[object] ({})", e))
                        .unwrap_or_default(),
                );
            }
            return Some(
                record
                    .context
                    .fields
                    .get(key)
                    .map(stringify_value)
                    .unwrap_or_default(),
            );
        }

        let rendered = match token {
            "message" => record.message.clone(),
            "channel" => record.channel.clone(),
            "level" => record.level.ordinal().to_string(),
            "level_name" => record.level.to_string(),
            "datetime" => {
                let mut text = String::new();
                // chrono reports a bad format string as a fmt error
                if write!(text, "{}", record.datetime.format(&self.date_format)).is_err() {
                    text = record.datetime.to_rfc3339();
                }
                text
            }
            "context" => stringify_map(&context_values(record, &used.context)),
            "extra" => match &record.extra {
                Some(extra) => stringify_map(&without(extra, &used.extra)),
                None => "[]".to_string(),
            },
            _ => return None,
        };
        Some(rendered)
    }
}

impl Default for LineFormatter {
    fn default() -> Self {
        Self::new(Self::SIMPLE_FORMAT)
    }
}

impl Formatter for LineFormatter {
    fn format(&self, record: &LogRecord) -> String {
        let used = UsedKeys::scan(&self.template);
        let mut output = String::with_capacity(self.template.len() + record.message.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find('%') {
            output.push_str(&rest[..start]);
            let after = &rest[start + 1..];

            let rendered = after.find('%').and_then(|end| {
                self.render_token(&after[..end], record, &used)
                    .map(|text| (text, end))
            });

            match rendered {
                Some((text, end)) => {
                    output.push_str(&text);
                    rest = &after[end + 1..];
                }
                None => {
                    output.push('%');
                    rest = after;
                }
            }
        }
        output.push_str(rest);

        output
    }
}

/// `%extra.KEY%` / `%context.KEY%` keys referenced by a template
#[derive(Default)]
struct UsedKeys {
    extra: HashSet<String>,
    context: HashSet<String>,
}

impl UsedKeys {
    fn scan(template: &str) -> Self {
        let mut used = UsedKeys::default();
        for part in template.split('%') {
            if let Some(key) = part.strip_prefix("extra.") {
                used.extra.insert(key.to_string());
            } else if let Some(key) = part.strip_prefix("context.") {
                used.context.insert(key.to_string());
            }
        }
        used
    }
}

fn context_values(record: &LogRecord, used: &HashSet<String>) -> Metadata {
    let mut values = without(&record.context.fields, used);
    if let Some(exception) = &record.context.exception {
        if !used.contains("exception") {
            values.insert(
                "exception".to_string(),
                Value::String(format!("[object] ({})", exception)),
            );
        }
    }
    values
}

fn without(map: &Metadata, used: &HashSet<String>) -> Metadata {
    map.iter()
        .filter(|(key, _)| !used.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn stringify_map(map: &Metadata) -> String {
    if map.is_empty() {
        return "[]".to_string();
    }
    serde_json::to_string(map).unwrap_or_else(|_| "[]".to_string())
}

fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
