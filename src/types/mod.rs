//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account identifiers and balance rows
//! - `transaction`: Transfer records, log entries and their identifiers
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod transaction;

pub use account::{AccountBalance, AccountId};
pub use error::LedgerError;
pub use transaction::{EntryId, LedgerEntry, TransferRecord};
