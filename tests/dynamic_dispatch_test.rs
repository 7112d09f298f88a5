mod common;

use std::sync::Arc;
use tempo_payroll::domain::address::Address;
use tempo_payroll::domain::log::LogEvent;
use tempo_payroll::domain::ports::{EventSinkBox, TransferExecutorRef, TransferRequest};
use tempo_payroll::infrastructure::console_log::ConsoleLog;
use tempo_payroll::infrastructure::simulated::SimulatedTransferExecutor;

#[tokio::test]
async fn test_ports_as_trait_objects() {
    let simulated = Arc::new(SimulatedTransferExecutor::new());
    let executor: TransferExecutorRef = simulated.clone();
    let sink: EventSinkBox = Box::new(ConsoleLog::new(4));

    let request = TransferRequest {
        token: common::alpha_usd(),
        destination: Address::parse(&common::address(0)).unwrap(),
        amount: 1_000_000,
        fee_token: None,
    };

    // Verify Send + Sync by spawning tasks
    let tx_handle = tokio::spawn(async move { executor.submit_transfer(request).await.unwrap() });
    let log_handle = tokio::spawn(async move {
        sink.on_log(LogEvent::info("from another task"));
        sink.on_success();
    });

    let hash = tx_handle.await.unwrap();
    log_handle.await.unwrap();

    assert!(hash.starts_with("0x"));
    assert_eq!(simulated.submitted().await.len(), 1);
}
