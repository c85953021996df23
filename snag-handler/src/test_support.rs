//! Test doubles shared by the handler tests

use snag_client::{ClientError, Report, ReportingClient};
use snag_core::ExceptionRef;
use std::sync::Mutex;

/// A submission seen by [`RecordingClient`], with the report as the
/// callback left it
#[derive(Debug, Clone)]
pub enum Call {
    Exception {
        exception: ExceptionRef,
        report: Report,
    },
    Error {
        name: String,
        message: String,
        report: Report,
    },
}

impl Call {
    pub fn report(&self) -> &Report {
        match self {
            Call::Exception { report, .. } | Call::Error { report, .. } => report,
        }
    }
}

/// Reporting client that records calls instead of sending them
#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    fail: bool,
}

impl RecordingClient {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> snag_client::Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(ClientError::DeliveryClosed);
        }
        Ok(())
    }
}

impl ReportingClient for RecordingClient {
    fn notify_exception(
        &self,
        exception: &ExceptionRef,
        callback: &dyn Fn(&mut Report),
    ) -> snag_client::Result<()> {
        let mut report = Report::from_exception(exception);
        callback(&mut report);
        self.record(Call::Exception {
            exception: exception.clone(),
            report,
        })
    }

    fn notify_error(
        &self,
        name: &str,
        message: &str,
        callback: &dyn Fn(&mut Report),
    ) -> snag_client::Result<()> {
        let mut report = Report::from_named_error(name, message);
        callback(&mut report);
        self.record(Call::Error {
            name: name.to_string(),
            message: message.to_string(),
            report,
        })
    }
}
