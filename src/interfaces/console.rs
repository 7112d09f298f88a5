use crate::domain::log::LogEvent;
use crate::domain::ports::EventSink;
use crate::infrastructure::console_log::BATCH_SUCCESS_MESSAGE;
use std::io::Write;
use std::sync::Mutex;

/// Streams every event to a writer as it happens, oldest first.
///
/// Lines look like `[12:00:01] ➜ Success: 0x00000000... [explorer] https://...`.
pub struct StreamSink<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> StreamSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_event(&self, event: &LogEvent) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let result = match &event.link {
            Some(link) => writeln!(out, "[{}] ➜ {} [explorer] {}", event.time, event.text, link),
            None => writeln!(out, "[{}] ➜ {}", event.time, event.text),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write console line");
        }
    }
}

impl<W: Write + Send> EventSink for StreamSink<W> {
    fn on_log(&self, event: LogEvent) {
        self.write_event(&event);
    }

    fn on_success(&self) {
        self.write_event(&LogEvent::info(BATCH_SUCCESS_MESSAGE));
    }

    fn on_error(&self, message: &str) {
        self.write_event(&LogEvent::error(format!("Error: {message}")));
    }
}
