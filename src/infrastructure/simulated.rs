use crate::domain::ports::{TransferError, TransferExecutor, TransferRequest};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// An in-process executor that records transfers instead of signing them.
///
/// Hashes are deterministic (`0x` + the 1-based submission number as 64 hex
/// digits). A failure can be injected at a given 0-based submission index to
/// rehearse how a run halts.
#[derive(Default, Clone)]
pub struct SimulatedTransferExecutor {
    submitted: Arc<RwLock<Vec<TransferRequest>>>,
    disconnected: Arc<AtomicBool>,
    fail_at: Option<usize>,
    failure: TransferError,
}

impl SimulatedTransferExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disconnected() -> Self {
        let executor = Self::default();
        executor.set_connected(false);
        executor
    }

    /// Fails the submission with 0-based index `index` with `error`.
    pub fn failing_at(index: usize, error: TransferError) -> Self {
        Self {
            fail_at: Some(index),
            failure: error,
            ..Self::default()
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.disconnected.store(!connected, Ordering::SeqCst);
    }

    /// Every request received so far, including a failed one.
    pub async fn submitted(&self) -> Vec<TransferRequest> {
        self.submitted.read().await.clone()
    }
}

#[async_trait]
impl TransferExecutor for SimulatedTransferExecutor {
    fn is_connected(&self) -> bool {
        !self.disconnected.load(Ordering::SeqCst)
    }

    async fn submit_transfer(&self, request: TransferRequest) -> Result<String, TransferError> {
        let mut submitted = self.submitted.write().await;
        let index = submitted.len();
        submitted.push(request);

        if self.fail_at == Some(index) {
            return Err(self.failure.clone());
        }
        Ok(format!("0x{:064x}", index + 1))
    }
}
