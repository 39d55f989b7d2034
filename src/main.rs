//! Transfer Ledger CLI
//!
//! Command-line interface for applying account-to-account transfers from CSV
//! files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- transfers.csv > balances.csv
//! cargo run -- --strategy sync transfers.csv > balances.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 transfers.csv > balances.csv
//! cargo run -- --overdraft reject --issuer mint --journal journal.csv transfers.csv
//! ```
//!
//! Final balances are written to stdout; logs go to stderr and are filtered
//! with `RUST_LOG`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, file not readable, output failure, etc.)

use std::fs::File;
use std::io::BufWriter;
use std::process;
use std::sync::Arc;

use tracing::{error, info};
use transfer_ledger::cli::{self, CliArgs};
use transfer_ledger::strategy;
use transfer_ledger::{
    logging, write_balances_csv, write_journal_csv, Ledger, LedgerError, TransactionLog,
};

fn main() {
    let args = cli::parse_args();
    logging::init();

    if let Err(e) = run(&args) {
        error!(error = %e, "Processing failed");
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), LedgerError> {
    let ledger = Arc::new(Ledger::with_config(args.to_ledger_config()));
    let log = Arc::new(TransactionLog::new());

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    strategy.process(&args.input_file, Arc::clone(&ledger), Arc::clone(&log))?;

    let mut output = std::io::stdout().lock();
    write_balances_csv(&ledger.snapshot(), &mut output)?;

    if let Some(path) = &args.journal {
        let mut journal = BufWriter::new(File::create(path)?);
        write_journal_csv(log.all(), &mut journal)?;
        info!(path = %path.display(), entries = log.len(), "Journal written");
    }

    Ok(())
}
