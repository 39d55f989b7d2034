//! Transfer-related types for the transfer ledger
//!
//! This module defines the log identifier, the unvalidated transfer record
//! read from input, and the append-only entry stored in the transaction log.

use super::account::AccountId;
use rust_decimal::Decimal;
use std::fmt;

/// Transaction log entry identifier
///
/// Issued by the `TransactionLog` in strictly increasing order, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);

impl EntryId {
    /// Wrap a raw identifier value
    pub fn new(value: u64) -> Self {
        EntryId(value)
    }

    /// The raw identifier value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transfer request as read from input
///
/// Nothing about this record has been validated yet; it becomes a
/// `Transaction` once sender, receiver and amount pass construction checks.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRecord {
    /// Account to debit
    pub sender: AccountId,

    /// Account to credit
    pub receiver: AccountId,

    /// Quantity to move, with the scale it was written in
    pub amount: Decimal,
}

/// An executed transfer as stored in the transaction log
///
/// Entries are immutable once recorded. The resulting balances are the
/// values the ledger returned for this transfer, which makes the log usable
/// as an audit trail without consulting the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// Unique, monotonically increasing identifier
    pub id: EntryId,

    /// Debited account
    pub sender: AccountId,

    /// Credited account
    pub receiver: AccountId,

    /// Amount moved
    pub amount: Decimal,

    /// Sender balance immediately after this transfer
    pub sender_balance: Decimal,

    /// Receiver balance immediately after this transfer
    pub receiver_balance: Decimal,
}
