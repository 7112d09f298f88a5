use crate::config::{NetworkConfig, OrchestratorConfig};
use crate::domain::address::Address;
use crate::domain::log::LogEvent;
use crate::domain::ports::{EventSink, TransferError, TransferExecutorRef, TransferRequest};
use crate::domain::recipient::{Recipient, RecipientId};
use crate::domain::token::TokenRegistry;
use crate::error::Precondition;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

pub const START_MESSAGE: &str = "--- START PAYING ---";
pub const DONE_MESSAGE: &str = "✓ IT'S ALL DONE!";
const TX_HASH_PREFIX_LEN: usize = 10;

/// Where a payment run stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running { index: usize, total: usize },
    Completed,
    Failed { index: usize, message: String },
    Rejected(Precondition),
}

/// A transfer the network acknowledged during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub recipient_id: RecipientId,
    pub destination: Address,
    pub scaled_amount: u128,
    pub tx_hash: String,
    pub link: String,
}

/// Outcome of one `execute_batch_payment` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub state: RunState,
    /// Transfers that went through before the run ended, in order.
    pub transactions: Vec<TransferReceipt>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.state == RunState::Completed
    }
}

/// Transient state of one run, built from a snapshot of the queue.
struct PaymentRun {
    recipients: Vec<Recipient>,
    payment_token: Address,
    fee_token: Option<Address>,
    decimals: u32,
    state: RunState,
    transactions: Vec<TransferReceipt>,
}

impl PaymentRun {
    fn into_report(self) -> RunReport {
        RunReport {
            state: self.state,
            transactions: self.transactions,
        }
    }
}

/// Clears the processing flag however the run ends.
struct ProcessingGuard(Arc<AtomicBool>);

impl ProcessingGuard {
    fn engage(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(Arc::clone(flag))
    }
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Pays a list of recipients one transfer at a time.
///
/// Transfers are strictly sequential: the next one is submitted only after
/// the previous one was acknowledged and the configured delay elapsed, so the
/// sending account's nonce advances one step at a time. The first failure
/// ends the run; transfers already sent stay sent.
///
/// The orchestrator does not stop a caller from starting a second run while
/// one is in flight. Callers poll [`Self::is_processing`] for that.
pub struct BatchPaymentOrchestrator {
    executor: TransferExecutorRef,
    tokens: TokenRegistry,
    network: NetworkConfig,
    config: OrchestratorConfig,
    processing: Arc<AtomicBool>,
}

impl BatchPaymentOrchestrator {
    pub fn new(
        executor: TransferExecutorRef,
        tokens: TokenRegistry,
        network: NetworkConfig,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            executor,
            tokens,
            network,
            config,
            processing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    /// Shared handle on the processing flag, for callers that gate their
    /// own controls on it.
    pub fn processing_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.processing)
    }

    pub async fn execute_batch_payment(
        &self,
        recipients: &[Recipient],
        payment_token: Option<&Address>,
        fee_token: Option<&Address>,
        sink: &dyn EventSink,
    ) -> RunReport {
        let snapshot = recipients.to_vec();

        let (payment_token, fee_token) = match self.check_preconditions(payment_token, fee_token) {
            Ok(tokens) => tokens,
            Err(precondition) => {
                warn!(%precondition, "batch payment rejected");
                let message = precondition.to_string();
                sink.on_log(LogEvent::error(format!("[Error] {message}")));
                sink.on_error(&message);
                return RunReport {
                    state: RunState::Rejected(precondition),
                    transactions: Vec::new(),
                };
            }
        };

        let decimals = self.tokens.decimals_for(&payment_token).unwrap_or_else(|| {
            warn!(token = %payment_token, decimals = self.config.default_decimals,
                "payment token not in token list, using default decimals");
            self.config.default_decimals
        });

        let mut run = PaymentRun {
            recipients: snapshot,
            fee_token: (fee_token != payment_token).then_some(fee_token),
            payment_token,
            decimals,
            state: RunState::Idle,
            transactions: Vec::new(),
        };

        let _guard = ProcessingGuard::engage(&self.processing);
        self.drive(&mut run, sink).await;
        run.into_report()
    }

    fn check_preconditions(
        &self,
        payment_token: Option<&Address>,
        fee_token: Option<&Address>,
    ) -> Result<(Address, Address), Precondition> {
        if !self.executor.is_connected() {
            return Err(Precondition::WalletNotConnected);
        }
        let payment_token = payment_token.ok_or(Precondition::PaymentTokenMissing)?;
        let fee_token = fee_token.ok_or(Precondition::FeeTokenMissing)?;
        Ok((payment_token.clone(), fee_token.clone()))
    }

    async fn drive(&self, run: &mut PaymentRun, sink: &dyn EventSink) {
        let total = run.recipients.len();
        run.state = RunState::Running { index: 0, total };
        info!(total, token = %run.payment_token, "batch payment started");
        sink.on_log(LogEvent::info(START_MESSAGE));

        if let Some(fee_token) = &run.fee_token {
            let label = self
                .tokens
                .by_address(fee_token)
                .map(|t| t.symbol.clone())
                .unwrap_or_else(|| fee_token.to_string());
            sink.on_log(LogEvent::info(format!(
                "Fee token {label} differs from payment token; forwarding fee preference to executor"
            )));
        }

        for index in 0..total {
            run.state = RunState::Running { index, total };
            let recipient = &run.recipients[index];
            sink.on_log(LogEvent::info(format!(
                "[{}/{}] Send {} to {}...",
                index + 1,
                total,
                recipient.amount,
                recipient.name
            )));

            match self.pay(run, index).await {
                Ok(receipt) => {
                    info!(index, tx_hash = %receipt.tx_hash, "transfer acknowledged");
                    sink.on_log(LogEvent::with_link(
                        format!("Success: {}...", hash_prefix(&receipt.tx_hash)),
                        receipt.link.clone(),
                    ));
                    run.transactions.push(receipt);
                }
                Err(err) => {
                    let message = err.summary().to_string();
                    warn!(index, error = %message, "transfer failed, halting batch");
                    sink.on_log(LogEvent::error(format!("[Error] {message}")));
                    sink.on_error(&message);
                    run.state = RunState::Failed { index, message };
                    return;
                }
            }

            if index + 1 < total {
                let delay = self.config.inter_transfer_delay();
                debug!(?delay, "waiting before next transfer");
                tokio::time::sleep(delay).await;
            }
        }

        info!(total, "batch payment completed");
        sink.on_log(LogEvent::info(DONE_MESSAGE));
        run.state = RunState::Completed;
        sink.on_success();
    }

    async fn pay(&self, run: &PaymentRun, index: usize) -> Result<TransferReceipt, TransferError> {
        let recipient = &run.recipients[index];
        let amount = recipient
            .amount
            .to_fixed_point(run.decimals)
            .map_err(|e| TransferError::message(e.to_string()))?;
        if amount == 0 {
            warn!(
                index,
                amount = %recipient.amount,
                decimals = run.decimals,
                "amount scales to zero units"
            );
            return Err(TransferError::message(format!(
                "Amount {} is below the smallest unit of the payment token",
                recipient.amount
            )));
        }

        let request = TransferRequest {
            token: run.payment_token.clone(),
            destination: recipient.address.clone(),
            amount,
            fee_token: run.fee_token.clone(),
        };
        info!(index, destination = %request.destination, amount, "submitting transfer");

        let tx_hash = self.executor.submit_transfer(request).await?;
        Ok(TransferReceipt {
            recipient_id: recipient.id,
            destination: recipient.address.clone(),
            scaled_amount: amount,
            link: self.network.tx_link(&tx_hash),
            tx_hash,
        })
    }
}

fn hash_prefix(tx_hash: &str) -> &str {
    tx_hash
        .char_indices()
        .nth(TX_HASH_PREFIX_LEN)
        .map_or(tx_hash, |(i, _)| &tx_hash[..i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_tokens;
    use crate::infrastructure::console_log::ConsoleLog;
    use crate::infrastructure::simulated::SimulatedTransferExecutor;

    fn orchestrator(executor: Arc<SimulatedTransferExecutor>) -> BatchPaymentOrchestrator {
        BatchPaymentOrchestrator::new(
            executor,
            TokenRegistry::new(default_tokens()),
            NetworkConfig::default(),
            OrchestratorConfig {
                inter_transfer_delay_ms: 0,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_hash_prefix() {
        assert_eq!(hash_prefix("0x1234567890abcdef"), "0x12345678");
        assert_eq!(hash_prefix("0x12"), "0x12");
    }

    #[tokio::test]
    async fn test_flag_cleared_after_run() {
        let executor = Arc::new(SimulatedTransferExecutor::new());
        let orchestrator = orchestrator(executor);
        let token = default_tokens()[1].address.clone();
        let sink = ConsoleLog::new(15);

        let report = orchestrator
            .execute_batch_payment(&[], Some(&token), Some(&token), &sink)
            .await;

        assert!(report.is_success());
        assert!(!orchestrator.is_processing());
        assert!(!orchestrator.processing_flag().load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_disconnected_wallet_is_rejected() {
        let executor = Arc::new(SimulatedTransferExecutor::disconnected());
        let orchestrator = orchestrator(executor.clone());
        let token = default_tokens()[1].address.clone();
        let sink = ConsoleLog::new(15);

        let report = orchestrator
            .execute_batch_payment(&[], Some(&token), Some(&token), &sink)
            .await;

        assert_eq!(report.state, RunState::Rejected(Precondition::WalletNotConnected));
        assert_eq!(executor.submitted().await.len(), 0);
        assert!(sink.entries().iter().any(|e| e.text == "Error: Wallet not connected"));
    }

    #[tokio::test]
    async fn test_missing_fee_token_is_rejected() {
        let executor = Arc::new(SimulatedTransferExecutor::new());
        let orchestrator = orchestrator(executor);
        let token = default_tokens()[1].address.clone();
        let sink = ConsoleLog::new(15);

        let report = orchestrator
            .execute_batch_payment(&[], Some(&token), None, &sink)
            .await;

        assert_eq!(report.state, RunState::Rejected(Precondition::FeeTokenMissing));
    }
}
