//! Report drafts
//!
//! A [`Report`] is built by the client for every notification and handed to
//! the caller's callback before it is serialized, so severity and metadata
//! can be adjusted per event.

use snag_core::{ExceptionRef, Metadata, Severity};

/// One entry of a report's exception list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportException {
    pub error_class: String,
    pub message: String,
}

/// Why a report carries its severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityReason {
    HandledError,
    HandledException,
    UserCallbackSetSeverity,
}

impl SeverityReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityReason::HandledError => "handledError",
            SeverityReason::HandledException => "handledException",
            SeverityReason::UserCallbackSetSeverity => "userCallbackSetSeverity",
        }
    }
}

/// In-flight error report
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    exceptions: Vec<ReportException>,
    severity: Severity,
    severity_reason: SeverityReason,
    meta_data: Option<Metadata>,
    context: Option<String>,
    unhandled: bool,
}

impl Report {
    /// Report for a named error without an error value
    pub fn from_named_error(name: &str, message: &str) -> Self {
        Self::with_exceptions(
            vec![ReportException {
                error_class: name.to_string(),
                message: message.to_string(),
            }],
            SeverityReason::HandledError,
        )
    }

    /// Report for an error value; each `source()` link becomes another entry
    pub fn from_exception(exception: &ExceptionRef) -> Self {
        let mut exceptions = vec![ReportException {
            error_class: exception.class().to_string(),
            message: exception.message(),
        }];
        exceptions.extend(
            exception
                .causes()
                .into_iter()
                .map(|(error_class, message)| ReportException { error_class, message }),
        );

        Self::with_exceptions(exceptions, SeverityReason::HandledException)
    }

    fn with_exceptions(exceptions: Vec<ReportException>, reason: SeverityReason) -> Self {
        Self {
            exceptions,
            severity: Severity::Warning,
            severity_reason: reason,
            meta_data: None,
            context: None,
            unhandled: false,
        }
    }

    pub fn set_severity(&mut self, severity: Severity) {
        self.severity = severity;
        self.severity_reason = SeverityReason::UserCallbackSetSeverity;
    }

    /// Replaces the report's metadata
    pub fn set_meta_data(&mut self, meta_data: Metadata) {
        self.meta_data = Some(meta_data);
    }

    pub fn set_context(&mut self, context: impl Into<String>) {
        self.context = Some(context.into());
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn severity_reason(&self) -> SeverityReason {
        self.severity_reason
    }

    pub fn meta_data(&self) -> Option<&Metadata> {
        self.meta_data.as_ref()
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn exceptions(&self) -> &[ReportException] {
        &self.exceptions
    }

    pub fn is_unhandled(&self) -> bool {
        self.unhandled
    }
}
