//! Transaction log for executed transfers
//!
//! This module provides the `TransactionLog` component that keeps the ordered,
//! append-only history of every successfully executed transfer and issues the
//! identifiers callers use to refer back to them.
//!
//! # Ordering
//!
//! Identifier issuance and the append happen under one write lock, so no two
//! concurrent `record` calls can receive the same identifier. The order of the
//! log is the order in which `record` calls were admitted. Transfers record
//! through `Ledger::apply_and_record` while their accounts are still locked,
//! so the entries touching any one account appear in the order the ledger
//! applied them.

use crate::types::{AccountId, EntryId, LedgerEntry, LedgerError};
use parking_lot::RwLock;
use rust_decimal::Decimal;

/// Append-only log of executed transfers
///
/// Entries are stored in execution order. Entry `n` (1-based) carries
/// identifier `n`, which makes lookups by identifier an index operation.
#[derive(Debug, Default)]
pub struct TransactionLog {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl TransactionLog {
    /// Create an empty transaction log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an executed transfer and return its identifier
    ///
    /// Identifiers are strictly increasing and never reused. Recording cannot
    /// fail for the in-memory log.
    pub fn record(
        &self,
        sender: &AccountId,
        receiver: &AccountId,
        amount: Decimal,
        sender_balance: Decimal,
        receiver_balance: Decimal,
    ) -> EntryId {
        let mut entries = self.entries.write();
        let id = EntryId::new(entries.len() as u64 + 1);

        entries.push(LedgerEntry {
            id,
            sender: sender.clone(),
            receiver: receiver.clone(),
            amount,
            sender_balance,
            receiver_balance,
        });

        id
    }

    /// Look up an entry by identifier
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no entry carries `id`.
    pub fn get(&self, id: EntryId) -> Result<LedgerEntry, LedgerError> {
        let index = id
            .value()
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .ok_or_else(|| LedgerError::not_found(id))?;

        self.entries
            .read()
            .get(index)
            .cloned()
            .ok_or_else(|| LedgerError::not_found(id))
    }

    /// Lazily iterate over all entries in execution order
    ///
    /// Each call starts a fresh traversal from the first entry. The traversal
    /// covers the entries present when it was created; entries appended while
    /// it runs are left for the next traversal.
    pub fn all(&self) -> Entries<'_> {
        Entries {
            log: self,
            next: 0,
            end: self.len(),
        }
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Lazy traversal over a `TransactionLog`
///
/// Takes the read lock for one entry at a time, so a long traversal never
/// holds off writers.
#[derive(Debug)]
pub struct Entries<'a> {
    log: &'a TransactionLog,
    next: usize,
    end: usize,
}

impl Iterator for Entries<'_> {
    type Item = LedgerEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let entry = self.log.entries.read().get(self.next).cloned();
        self.next += 1;
        entry
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Entries<'_> {}
