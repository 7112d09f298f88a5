use super::address::Address;
use super::log::LogEvent;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub const GENERIC_TRANSFER_FAILURE: &str = "The transfer failed.";

/// One token transfer handed to the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub token: Address,
    pub destination: Address,
    /// Amount already scaled to the token's fixed-point representation.
    pub amount: u128,
    /// Set only when the operator chose a fee token other than `token`.
    pub fee_token: Option<Address>,
}

/// Rejection reported by the network or the signer.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("{}", self.summary())]
pub struct TransferError {
    pub short_message: Option<String>,
    pub message: Option<String>,
}

impl TransferError {
    pub fn short(short_message: impl Into<String>) -> Self {
        Self {
            short_message: Some(short_message.into()),
            message: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            short_message: None,
            message: Some(message.into()),
        }
    }

    /// Prefers the short machine message, then the long one, then a generic text.
    pub fn summary(&self) -> &str {
        [&self.short_message, &self.message]
            .into_iter()
            .flatten()
            .map(|m| m.trim())
            .find(|m| !m.is_empty())
            .unwrap_or(GENERIC_TRANSFER_FAILURE)
    }
}

/// Submits value transfers on behalf of the connected account.
///
/// Implementations own wallet sessions, signing and RPC; the orchestrator
/// only asks whether a session exists and hands over one transfer at a time.
#[async_trait]
pub trait TransferExecutor: Send + Sync {
    fn is_connected(&self) -> bool;

    /// Returns the transaction hash once the network acknowledges the submission.
    async fn submit_transfer(&self, request: TransferRequest) -> Result<String, TransferError>;
}

/// Receives progress from a payment run, one call per step, in order.
pub trait EventSink: Send + Sync {
    fn on_log(&self, event: LogEvent);
    fn on_success(&self);
    fn on_error(&self, message: &str);
}

pub type TransferExecutorRef = Arc<dyn TransferExecutor>;
pub type EventSinkBox = Box<dyn EventSink>;
