//! Processing strategy module for transfer processing
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! from CSV parsing to transfer execution. Different implementations
//! (synchronous, asynchronous batch) can be selected at runtime, and both
//! execute against a caller-owned ledger and log.

use crate::cli::StrategyType;
use crate::core::{Ledger, TransactionLog};
use crate::types::LedgerError;
use std::path::Path;
use std::sync::Arc;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Outcome counts of one processing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingSummary {
    /// Transfers executed and recorded in the log
    pub executed: usize,

    /// Records skipped as malformed or rejected by ledger rules
    pub rejected: usize,
}

/// Processing strategy trait for complete transfer processing pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Execute every transfer in `input_path` against `ledger` and `log`
    ///
    /// Individual malformed or rejected transfers are logged and counted in
    /// the summary; they never abort the run.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal conditions:
    /// - The input file cannot be opened (file not found, permission denied)
    /// - The async runtime cannot be created
    fn process(
        &self,
        input_path: &Path,
        ledger: Arc<Ledger>,
        log: Arc<TransactionLog>,
    ) -> Result<ProcessingSummary, LedgerError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is only used by the async strategy; `None` selects the defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
