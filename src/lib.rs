//! Transfer Ledger Library
//! # Overview
//!
//! This library applies account-to-account transfers to a shared, concurrent
//! balance ledger and records every executed transfer in an append-only log.
//! Transfers can be driven one by one, or read from CSV and executed with a
//! synchronous or an asynchronous batch strategy.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (AccountId, LedgerEntry, LedgerError, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - Balances, atomic transfers and the overdraft policy
//!   - [`core::transaction_log`] - Ordered history and identifier issuance
//!   - [`core::transaction`] - Validated transfer with one-shot execution
//!   - [`core::batch_processor`] - Parallel execution of independent groups
//! - [`io`] - CSV reading and balance/journal output
//! - [`strategy`] - Pluggable processing pipelines
//! - [`logging`] - Tracing subscriber setup
//!
//! # Invariants
//!
//! - Every account starts at zero and all balances always sum to zero
//! - A transfer is applied in full or not at all
//! - Log identifiers are unique and strictly increasing
//! - A transaction executes at most once

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{
    BatchProcessor, Ledger, LedgerConfig, OverdraftPolicy, Transaction, TransactionLog,
};
pub use io::{write_balances_csv, write_journal_csv};
pub use types::{AccountBalance, AccountId, EntryId, LedgerEntry, LedgerError, TransferRecord};
