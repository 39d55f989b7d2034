use crate::core::{LedgerConfig, OverdraftPolicy};
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Apply account-to-account transfers from a CSV file and print final balances
#[derive(Parser, Debug)]
#[command(name = "transfer-ledger")]
#[command(about = "Apply account-to-account transfers and print final balances", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing transfer records
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy to use for executing transfers
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for sequential or 'async' for batched parallel execution"
    )]
    pub strategy: StrategyType,

    /// Number of transfers per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of transfers per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of runtime worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads executing transfer groups (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Overdraft rule applied to senders
    #[arg(
        long = "overdraft",
        value_name = "POLICY",
        default_value = "allow",
        help = "Overdraft policy: 'allow' lets balances go negative, 'reject' refuses transfers that would"
    )]
    pub overdraft: OverdraftArg,

    /// Accounts exempt from the overdraft check
    #[arg(
        long = "issuer",
        value_name = "ACCOUNT",
        help = "Account allowed to go negative under --overdraft reject (repeatable)"
    )]
    pub issuers: Vec<String>,

    /// Optional path for the transaction journal
    #[arg(
        long = "journal",
        value_name = "PATH",
        help = "Write every executed transfer to this CSV file"
    )]
    pub journal: Option<PathBuf>,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Command-line spelling of `OverdraftPolicy`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OverdraftArg {
    Allow,
    Reject,
}

impl From<OverdraftArg> for OverdraftPolicy {
    fn from(arg: OverdraftArg) -> Self {
        match arg {
            OverdraftArg::Allow => OverdraftPolicy::AllowOverdraft,
            OverdraftArg::Reject => OverdraftPolicy::RejectIfInsufficient,
        }
    }
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values take their defaults. Zero values are replaced by the
    /// defaults with a logged warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create a LedgerConfig from the overdraft policy and issuer list
    pub fn to_ledger_config(&self) -> LedgerConfig {
        self.issuers
            .iter()
            .fold(LedgerConfig::new(self.overdraft.into()), |config, issuer| {
                config.with_issuer(issuer.trim())
            })
    }
}
