//! Report submission

use snag_core::ExceptionRef;
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::payload::NotifyPayload;
use crate::report::Report;
use crate::{BugsnagClient, ReportingClient};

impl BugsnagClient {
    /// Run the callback, serialize and queue a report
    ///
    /// Reports from a release stage outside `notify_release_stages` are
    /// dropped without error.
    fn submit(&self, mut report: Report, callback: &dyn Fn(&mut Report)) -> Result<()> {
        if !self.config.should_notify() {
            debug!(
                release_stage = %self.config.release_stage,
                "Release stage not in notify_release_stages, skipping report"
            );
            return Ok(());
        }

        callback(&mut report);

        let body = serde_json::to_vec(&NotifyPayload::new(&self.config, &report))?;
        self.queue
            .send(body)
            .map_err(|_| ClientError::DeliveryClosed)?;

        debug!(severity = %report.severity(), "Queued report");
        Ok(())
    }
}

impl ReportingClient for BugsnagClient {
    fn notify_exception(
        &self,
        exception: &ExceptionRef,
        callback: &dyn Fn(&mut Report),
    ) -> Result<()> {
        self.submit(Report::from_exception(exception), callback)
    }

    fn notify_error(
        &self,
        name: &str,
        message: &str,
        callback: &dyn Fn(&mut Report),
    ) -> Result<()> {
        self.submit(Report::from_named_error(name, message), callback)
    }
}
