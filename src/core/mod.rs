//! Core business logic module
//!
//! This module contains the core transfer processing components:
//! - `ledger` - Authoritative balances and atomic transfer application
//! - `transaction_log` - Append-only history and identifier issuance
//! - `transaction` - Transfer value object driving one execution
//! - `batch_processor` - Concurrent execution of independent transfer groups

pub mod batch_processor;
pub mod ledger;
pub mod transaction;
pub mod transaction_log;

pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use ledger::{validate_transfer, Ledger, LedgerConfig, OverdraftPolicy};
pub use transaction::Transaction;
pub use transaction_log::{Entries, TransactionLog};
