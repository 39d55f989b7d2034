//! Batch processing with account-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which executes a batch of
//! transfers concurrently while producing exactly the balances a one-by-one
//! run would produce.
//!
//! # Design
//!
//! A transfer touches two accounts, so a batch cannot simply be split per
//! account. Instead the batch is partitioned into groups of transfers that are
//! connected through shared accounts (union-find over account identifiers).
//! Groups share no account with each other, so they can run in any
//! interleaving; within a group, transfers keep their input order.
//!
//! Because every overdraft check only reads accounts of its own group, the
//! final balances match the sequential result under either overdraft policy.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<Ledger>          (shared balances)
//!     └── Arc<TransactionLog>  (shared history)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::core::ledger::Ledger;
use crate::core::transaction::Transaction;
use crate::core::transaction_log::TransactionLog;
use crate::types::{AccountId, EntryId, LedgerError, TransferRecord};

/// Result of processing a single transfer
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The transfer record that was processed
    pub record: TransferRecord,

    /// The issued log identifier, or why the transfer was rejected
    pub result: Result<EntryId, LedgerError>,
}

/// Batch processor with account-based partitioning
///
/// Cheap to clone; clones share the same ledger and log.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    ledger: Arc<Ledger>,
    log: Arc<TransactionLog>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor over a shared ledger and log
    pub fn new(ledger: Arc<Ledger>, log: Arc<TransactionLog>) -> Self {
        Self { ledger, log }
    }

    /// Partition a batch into groups of transfers that share accounts
    ///
    /// # Guarantees
    ///
    /// - Each transfer appears in exactly one group
    /// - No two groups reference the same account
    /// - Transfers within a group keep their original order
    /// - Groups are returned in order of their first transfer
    pub fn partition(&self, batch: Vec<TransferRecord>) -> Vec<Vec<TransferRecord>> {
        let mut accounts = AccountSets::default();
        for record in &batch {
            accounts.union(&record.sender, &record.receiver);
        }

        let mut groups: Vec<Vec<TransferRecord>> = Vec::new();
        let mut group_of_root: HashMap<usize, usize> = HashMap::new();

        for record in batch {
            let root = accounts.root_of(&record.sender);
            let group = *group_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[group].push(record);
        }

        groups
    }

    /// Execute every transfer of one group, in order
    ///
    /// All transfers are attempted; a rejection is captured in its result and
    /// does not stop the rest of the group.
    pub async fn process_group(&self, transfers: Vec<TransferRecord>) -> Vec<ProcessingResult> {
        transfers
            .into_iter()
            .map(|record| {
                let result = self.execute(&record);
                if let Err(e) = &result {
                    warn!(
                        sender = %record.sender,
                        receiver = %record.receiver,
                        amount = %record.amount,
                        error = %e,
                        "Transfer rejected"
                    );
                }
                ProcessingResult { record, result }
            })
            .collect()
    }

    /// Process a batch of transfers with account-based partitioning
    ///
    /// 1. Partitions the batch into independent groups
    /// 2. Spawns one tokio task per group
    /// 3. Waits for all tasks and collects their results
    ///
    /// Results are grouped by partition, not in input order.
    ///
    /// # Panics
    ///
    /// A panic inside a group task is resumed on the caller instead of
    /// dropping that group's results.
    pub async fn process_batch(&self, batch: Vec<TransferRecord>) -> Vec<ProcessingResult> {
        let groups = self.partition(batch);

        let mut tasks = Vec::with_capacity(groups.len());
        for transfers in groups {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_group(transfers).await
            }));
        }

        join_groups(tasks).await
    }

    fn execute(&self, record: &TransferRecord) -> Result<EntryId, LedgerError> {
        let mut transaction =
            Transaction::new(&record.sender, &record.receiver, record.amount)?;
        transaction.execute(&self.ledger, &self.log)
    }
}

/// Collect group results in task order, resuming any task panic
async fn join_groups(tasks: Vec<JoinHandle<Vec<ProcessingResult>>>) -> Vec<ProcessingResult> {
    let mut results = Vec::new();
    for task in tasks {
        match task.await {
            Ok(group_results) => results.extend(group_results),
            Err(e) if e.is_panic() => {
                error!("Transfer group task panicked");
                std::panic::resume_unwind(e.into_panic());
            }
            Err(e) => {
                error!(error = %e, "Transfer group task cancelled");
                std::panic::resume_unwind(Box::new(e.to_string()));
            }
        }
    }
    results
}

/// Disjoint sets over account identifiers
#[derive(Debug, Default)]
struct AccountSets {
    index: HashMap<AccountId, usize>,
    parent: Vec<usize>,
}

impl AccountSets {
    fn slot(&mut self, account: &AccountId) -> usize {
        if let Some(&slot) = self.index.get(account) {
            return slot;
        }
        let slot = self.parent.len();
        self.parent.push(slot);
        self.index.insert(account.clone(), slot);
        slot
    }

    fn find(&mut self, mut slot: usize) -> usize {
        while self.parent[slot] != slot {
            // path halving
            self.parent[slot] = self.parent[self.parent[slot]];
            slot = self.parent[slot];
        }
        slot
    }

    fn union(&mut self, a: &AccountId, b: &AccountId) {
        let a = self.slot(a);
        let b = self.slot(b);
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent[root_b] = root_a;
        }
    }

    fn root_of(&mut self, account: &AccountId) -> usize {
        let slot = self.slot(account);
        self.find(slot)
    }
}
