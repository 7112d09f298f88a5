#![allow(dead_code)]

use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempo_payroll::application::queue::RecipientQueue;
use tempo_payroll::config::{NetworkConfig, OrchestratorConfig, default_tokens};
use tempo_payroll::domain::address::Address;
use tempo_payroll::domain::log::LogEvent;
use tempo_payroll::domain::ports::EventSink;
use tempo_payroll::domain::recipient::{Recipient, RecipientCandidate};
use tempo_payroll::domain::token::TokenRegistry;

/// Deterministic, distinct address for index `i`.
pub fn address(i: usize) -> String {
    format!("0x{:040x}", i + 1)
}

pub fn alpha_usd() -> Address {
    default_tokens()[1].address.clone()
}

pub fn path_usd() -> Address {
    default_tokens()[0].address.clone()
}

pub fn registry() -> TokenRegistry {
    TokenRegistry::new(default_tokens())
}

pub fn network() -> NetworkConfig {
    NetworkConfig::default()
}

pub fn no_delay() -> OrchestratorConfig {
    OrchestratorConfig {
        inter_transfer_delay_ms: 0,
        ..Default::default()
    }
}

/// Queue with `amounts.len()` recipients named `Payee {i}`.
pub fn recipients(amounts: &[&str]) -> Vec<Recipient> {
    let mut queue = RecipientQueue::new();
    for (i, amount) in amounts.iter().enumerate() {
        queue
            .add(RecipientCandidate::new(format!("Payee {}", i + 1), address(i), *amount))
            .unwrap();
    }
    queue.snapshot()
}

/// Captures everything a run reports, in order.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<LogEvent>>,
    errors: Mutex<Vec<String>>,
    successes: AtomicUsize,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<LogEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.text).collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn successes(&self) -> usize {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn success_events(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| e.text.starts_with("Success:"))
            .count()
    }

    pub fn error_events(&self) -> usize {
        self.events().iter().filter(|e| e.is_error()).count()
    }
}

impl EventSink for RecordingSink {
    fn on_log(&self, event: LogEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn on_success(&self) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

pub fn generate_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["name", "address", "amount"])?;

    for i in 0..rows {
        wtr.write_record([format!("Payee {}", i + 1), address(i), "1.5".to_string()])?;
    }

    wtr.flush()?;
    Ok(())
}
