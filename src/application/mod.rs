//! Application layer: the recipient queue and the batch payment orchestrator.
//!
//! The queue is plain owned state edited by the caller. The orchestrator
//! takes a snapshot of it and walks the recipients one transfer at a time
//! through the injected `TransferExecutor`, reporting each step to an
//! `EventSink`.

pub mod orchestrator;
pub mod queue;
