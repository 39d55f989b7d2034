//! Asynchronous batch processing strategy
//!
//! This module provides a multi-threaded implementation of the
//! ProcessingStrategy trait. Transfers are read in batches; each batch is
//! partitioned into groups that share no account and the groups run in
//! parallel on a tokio multi-threaded runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (account partitioning + tasks)
//!         ├── Arc<Ledger>
//!         └── Arc<TransactionLog>
//! ```
//!
//! # Ordering
//!
//! Batches run one after another, so a transfer never overtakes an earlier
//! transfer that touches one of its accounts. Final balances therefore equal
//! those of the synchronous strategy; only the log order of transfers in
//! different groups may differ.

use crate::core::{BatchProcessor, Ledger, TransactionLog};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{ProcessingStrategy, ProcessingSummary};
use crate::types::LedgerError;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of transfers per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig; zero values fall back to the defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "Invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "Invalid max_concurrent_batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(
        &self,
        input_path: &Path,
        ledger: Arc<Ledger>,
        log: Arc<TransactionLog>,
    ) -> Result<ProcessingSummary, LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()?;

        runtime.block_on(async {
            let processor = BatchProcessor::new(ledger, log);

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| match e.kind() {
                    ErrorKind::NotFound => LedgerError::file_not_found(input_path),
                    _ => LedgerError::from(e),
                })?;

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);
            let mut summary = ProcessingSummary::default();

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                debug!(size = batch.len(), "Processing batch");
                for result in processor.process_batch(batch).await {
                    match result.result {
                        Ok(_) => summary.executed += 1,
                        Err(_) => summary.rejected += 1,
                    }
                }
            }

            summary.rejected += reader.skipped();

            info!(
                strategy = "async",
                executed = summary.executed,
                rejected = summary.rejected,
                "Processing complete"
            );

            Ok(summary)
        })
    }
}
