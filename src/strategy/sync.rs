//! Synchronous processing strategy
//!
//! Executes transfers one at a time, in file order, on the calling thread.
//! CSV parsing is delegated to `SyncReader` and execution to `Transaction`.
//!
//! # Memory Efficiency
//!
//! Records are streamed one at a time; memory use is
//! O(accounts + log entries), independent of how the input is read.

use crate::core::{Ledger, Transaction, TransactionLog};
use crate::io::sync_reader::SyncReader;
use crate::strategy::{ProcessingStrategy, ProcessingSummary};
use crate::types::LedgerError;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use transfer_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use transfer_ledger::{Ledger, TransactionLog};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let ledger = Arc::new(Ledger::new());
/// let log = Arc::new(TransactionLog::new());
///
/// let summary = SyncProcessingStrategy
///     .process(Path::new("transfers.csv"), Arc::clone(&ledger), Arc::clone(&log))
///     .expect("Processing failed");
/// println!("{} executed, {} rejected", summary.executed, summary.rejected);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        input_path: &Path,
        ledger: Arc<Ledger>,
        log: Arc<TransactionLog>,
    ) -> Result<ProcessingSummary, LedgerError> {
        let reader = SyncReader::new(input_path)?;
        let mut summary = ProcessingSummary::default();

        for result in reader {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "CSV parsing error");
                    summary.rejected += 1;
                    continue;
                }
            };

            let outcome = Transaction::new(record.sender, record.receiver, record.amount)
                .and_then(|mut transaction| transaction.execute(&ledger, &log));

            match outcome {
                Ok(_) => summary.executed += 1,
                Err(e) => {
                    warn!(error = %e, "Transfer rejected");
                    summary.rejected += 1;
                }
            }
        }

        info!(
            strategy = "sync",
            executed = summary.executed,
            rejected = summary.rejected,
            "Processing complete"
        );

        Ok(summary)
    }
}
