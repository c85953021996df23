//! Handler capability
//!
//! [`Handler`] is what a logging pipeline talks to. Most handlers only need
//! to implement [`ProcessingHandler`]: the blanket implementation takes care
//! of minimum-level gating, rendering `formatted` and the bubble flag, and
//! calls [`ProcessingHandler::write`] with a ready record.

use snag_core::{Formatter, Level, LogRecord};

use crate::error::Result;

/// A destination for log records
pub trait Handler: Send + Sync {
    /// Whether records at `level` are accepted
    fn is_handling(&self, level: Level) -> bool;

    /// Handle one record
    ///
    /// # Returns
    /// `true` when the record must not be passed to further handlers
    fn handle(&self, record: LogRecord) -> Result<bool>;

    /// Handle several records at once
    ///
    /// Each accepted record is written on its own. Its `formatted` text comes
    /// from the batch formatter, without the trailing line break.
    fn handle_batch(&self, records: Vec<LogRecord>) -> Result<()>;
}

/// Base behaviour for handlers that format records before writing them
pub trait ProcessingHandler: Send + Sync {
    /// Minimum level this handler accepts
    fn level(&self) -> Level;

    /// Whether handled records continue to the next handler
    fn bubble(&self) -> bool;

    /// Formatter for records handled one at a time
    fn formatter(&self) -> &dyn Formatter;

    /// Formatter for records handled as a batch
    fn batch_formatter(&self) -> &dyn Formatter;

    /// Write a gated and formatted record
    fn write(&self, record: &LogRecord) -> Result<()>;
}

impl<T: ProcessingHandler> Handler for T {
    fn is_handling(&self, level: Level) -> bool {
        level >= self.level()
    }

    fn handle(&self, mut record: LogRecord) -> Result<bool> {
        if !self.is_handling(record.level) {
            return Ok(false);
        }

        record.formatted = self.formatter().format(&record);
        self.write(&record)?;

        Ok(!self.bubble())
    }

    fn handle_batch(&self, records: Vec<LogRecord>) -> Result<()> {
        for mut record in records {
            if !self.is_handling(record.level) {
                continue;
            }

            let mut formatted = self.batch_formatter().format(&record);
            formatted.truncate(formatted.trim_end_matches(['\r', '\n']).len());
            record.formatted = formatted;
            self.write(&record)?;
        }

        Ok(())
    }
}
