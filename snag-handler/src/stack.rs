//! Handler stack
//!
//! Records are offered to handlers from the top of the stack down. A handler
//! that handles a record without bubbling ends the walk.

use std::sync::Arc;

use snag_core::{Level, LogRecord};

use crate::error::Result;
use crate::handler::Handler;

/// Ordered chain of handlers
#[derive(Clone, Default)]
pub struct HandlerStack {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a handler on top of the stack; it will run first
    pub fn push(&mut self, handler: Arc<dyn Handler>) -> &mut Self {
        self.handlers.insert(0, handler);
        self
    }

    pub fn with_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Whether any handler accepts records at `level`
    pub fn is_handling(&self, level: Level) -> bool {
        self.handlers.iter().any(|h| h.is_handling(level))
    }

    /// Offers a record to the stack
    ///
    /// # Returns
    /// `false` when no handler accepts the record's level
    pub fn dispatch(&self, record: LogRecord) -> Result<bool> {
        let Some(first) = self
            .handlers
            .iter()
            .position(|h| h.is_handling(record.level))
        else {
            return Ok(false);
        };

        for handler in &self.handlers[first..] {
            if handler.handle(record.clone())? {
                break;
            }
        }

        Ok(true)
    }

    /// Offers a batch of records to every handler
    pub fn dispatch_batch(&self, records: &[LogRecord]) -> Result<()> {
        for handler in &self.handlers {
            let accepted: Vec<LogRecord> = records
                .iter()
                .filter(|r| handler.is_handling(r.level))
                .cloned()
                .collect();

            if !accepted.is_empty() {
                handler.handle_batch(accepted)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity_mapping::SeverityMappingHandler;
    use crate::test_support::RecordingClient;

    fn reporting(client: &Arc<RecordingClient>, level: Level, bubble: bool) -> Arc<dyn Handler> {
        Arc::new(
            SeverityMappingHandler::new(client.clone())
                .with_level(level)
                .with_bubble(bubble),
        )
    }

    #[test]
    fn test_empty_stack_handles_nothing() {
        let stack = HandlerStack::new();
        assert!(stack.is_empty());
        assert!(!stack.is_handling(Level::EMERGENCY));
        assert!(!stack.dispatch(LogRecord::new("app", Level::ERROR, "x")).unwrap());
    }

    #[test]
    fn test_bubbling_reaches_every_handler() {
        let top = Arc::new(RecordingClient::default());
        let bottom = Arc::new(RecordingClient::default());
        let stack = HandlerStack::new()
            .with_handler(reporting(&bottom, Level::DEBUG, true))
            .with_handler(reporting(&top, Level::DEBUG, true));

        assert!(stack.dispatch(LogRecord::new("app", Level::INFO, "x")).unwrap());

        assert_eq!(top.calls().len(), 1);
        assert_eq!(bottom.calls().len(), 1);
    }

    #[test]
    fn test_non_bubbling_handler_stops_the_walk() {
        let top = Arc::new(RecordingClient::default());
        let bottom = Arc::new(RecordingClient::default());
        let stack = HandlerStack::new()
            .with_handler(reporting(&bottom, Level::DEBUG, true))
            .with_handler(reporting(&top, Level::DEBUG, false));

        stack.dispatch(LogRecord::new("app", Level::INFO, "x")).unwrap();

        assert_eq!(top.calls().len(), 1);
        assert!(bottom.calls().is_empty());
    }

    #[test]
    fn test_gated_handler_does_not_stop_the_walk() {
        let top = Arc::new(RecordingClient::default());
        let bottom = Arc::new(RecordingClient::default());
        let stack = HandlerStack::new()
            .with_handler(reporting(&bottom, Level::DEBUG, true))
            .with_handler(reporting(&top, Level::ERROR, false));

        assert!(stack.is_handling(Level::INFO));
        stack.dispatch(LogRecord::new("app", Level::INFO, "x")).unwrap();

        assert!(top.calls().is_empty());
        assert_eq!(bottom.calls().len(), 1);
    }

    #[test]
    fn test_errors_propagate() {
        let failing = Arc::new(RecordingClient::failing());
        let stack = HandlerStack::new().with_handler(reporting(&failing, Level::DEBUG, true));

        assert!(stack.dispatch(LogRecord::new("app", Level::ERROR, "x")).is_err());
    }

    #[test]
    fn test_dispatch_batch_filters_per_handler() {
        let errors_only = Arc::new(RecordingClient::default());
        let everything = Arc::new(RecordingClient::default());
        let stack = HandlerStack::new()
            .with_handler(reporting(&errors_only, Level::ERROR, true))
            .with_handler(reporting(&everything, Level::DEBUG, true));

        stack
            .dispatch_batch(&[
                LogRecord::new("app", Level::INFO, "a"),
                LogRecord::new("app", Level::ERROR, "b"),
            ])
            .unwrap();

        assert_eq!(errors_only.calls().len(), 1);
        assert_eq!(everything.calls().len(), 2);
    }
}
