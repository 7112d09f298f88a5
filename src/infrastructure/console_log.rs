use crate::domain::log::LogEvent;
use crate::domain::ports::EventSink;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const READY_BANNER: &str = "Tempo Payroll Agent Ready";
pub const BATCH_SUCCESS_MESSAGE: &str = "Batch processed successfully!";

/// Bounded console of the most recent log events, newest first.
///
/// This is the caller-side view of a run: it keeps what the operator sees
/// and drops the oldest lines once `capacity` is reached.
#[derive(Debug)]
pub struct ConsoleLog {
    entries: Mutex<VecDeque<LogEvent>>,
    capacity: usize,
}

impl ConsoleLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn with_banner(capacity: usize) -> Self {
        let log = Self::new(capacity);
        log.push(LogEvent::info(READY_BANNER));
        log
    }

    pub fn push(&self, event: LogEvent) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.lock();
        entries.push_front(event);
        entries.truncate(self.capacity);
    }

    /// Newest first.
    pub fn entries(&self) -> Vec<LogEvent> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEvent>> {
        // Every critical section leaves the deque consistent, so poisoning is ignored.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for ConsoleLog {
    fn on_log(&self, event: LogEvent) {
        self.push(event);
    }

    fn on_success(&self) {
        self.push(LogEvent::info(BATCH_SUCCESS_MESSAGE));
    }

    fn on_error(&self, message: &str) {
        self.push(LogEvent::error(format!("Error: {message}")));
    }
}
