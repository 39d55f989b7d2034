//! Error types for the transfer ledger
//!
//! This module defines all error types that can occur while validating,
//! executing and recording transfers, plus the I/O errors of the CSV surface.
//!
//! # Error Categories
//!
//! - **Validation Errors**: Non-positive amounts, self-transfers
//! - **Policy Errors**: Insufficient funds under strict accounting
//! - **Lifecycle Errors**: Re-executing a transaction, reading balances too early
//! - **Lookup Errors**: Unknown log identifiers
//! - **Arithmetic Errors**: Overflow in balance calculations
//! - **File I/O Errors**: File not found, malformed CSV, etc.

use crate::types::{AccountId, EntryId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger
///
/// Every variant is a local, recoverable condition. None of them leaves
/// the ledger with a partially applied transfer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Transfer amount is zero or negative
    #[error("Invalid amount {amount}: transfers must move a positive quantity")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Sender and receiver are the same account
    #[error("Sender and receiver are the same account '{account}'")]
    SameAccount {
        /// The account named on both sides
        account: AccountId,
    },

    /// Sender would go negative while overdrafts are rejected
    #[error("Insufficient funds for account '{account}': balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Debited account
        account: AccountId,
        /// Balance at the time of the attempt
        balance: Decimal,
        /// Requested transfer amount
        requested: Decimal,
    },

    /// The transaction already executed successfully
    ///
    /// Executed is a terminal state; the second attempt leaves balances untouched.
    #[error("Transaction already executed as entry {id}")]
    AlreadyExecuted {
        /// Identifier issued on the successful execution
        id: EntryId,
    },

    /// Post-execution balances were requested before a successful execute
    #[error("Transaction has not been executed yet")]
    NotExecutedYet,

    /// No log entry carries the given identifier
    #[error("Ledger entry {id} not found")]
    NotFound {
        /// The identifier that was looked up
        id: EntryId,
    },

    /// A balance would leave the representable decimal range
    #[error("Arithmetic overflow in {operation} for account '{account}'")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account whose balance would overflow
        account: AccountId,
    },

    /// A balance cannot represent the exact result of a transfer
    ///
    /// Raised when the result needs more significant digits than a decimal
    /// holds and would otherwise be rounded.
    #[error("Precision loss in {operation} for account '{account}'")]
    PrecisionLoss {
        /// Operation that would round
        operation: String,
        /// Account whose balance would round
        account: AccountId,
    },

    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error - the malformed record is skipped
    /// and processing continues with the next record.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());
        let message = error.to_string();

        // Writer failures surface as csv errors wrapping an io::Error
        match error.into_kind() {
            csv::ErrorKind::Io(io_error) => LedgerError::from(io_error),
            _ => LedgerError::ParseError { line, message },
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create a SameAccount error
    pub fn same_account(account: &AccountId) -> Self {
        LedgerError::SameAccount {
            account: account.clone(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: &AccountId, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account: account.clone(),
            balance,
            requested,
        }
    }

    /// Create an AlreadyExecuted error
    pub fn already_executed(id: EntryId) -> Self {
        LedgerError::AlreadyExecuted { id }
    }

    /// Create a NotFound error
    pub fn not_found(id: EntryId) -> Self {
        LedgerError::NotFound { id }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.clone(),
        }
    }

    /// Create a PrecisionLoss error
    pub fn precision_loss(operation: &str, account: &AccountId) -> Self {
        LedgerError::PrecisionLoss {
            operation: operation.to_string(),
            account: account.clone(),
        }
    }

    /// Create a FileNotFound error
    pub fn file_not_found(path: &std::path::Path) -> Self {
        LedgerError::FileNotFound {
            path: path.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::invalid_amount(
        LedgerError::InvalidAmount { amount: Decimal::new(-5, 1) },
        "Invalid amount -0.5: transfers must move a positive quantity"
    )]
    #[case::same_account(
        LedgerError::SameAccount { account: AccountId::from("Alice") },
        "Sender and receiver are the same account 'Alice'"
    )]
    #[case::insufficient_funds(
        LedgerError::InsufficientFunds {
            account: AccountId::from("Bob"),
            balance: Decimal::new(250, 1),
            requested: Decimal::new(1000, 1),
        },
        "Insufficient funds for account 'Bob': balance 25.0, requested 100.0"
    )]
    #[case::already_executed(
        LedgerError::AlreadyExecuted { id: EntryId::new(7) },
        "Transaction already executed as entry 7"
    )]
    #[case::not_executed_yet(LedgerError::NotExecutedYet, "Transaction has not been executed yet")]
    #[case::not_found(LedgerError::NotFound { id: EntryId::new(42) }, "Ledger entry 42 not found")]
    #[case::arithmetic_overflow(
        LedgerError::ArithmeticOverflow { operation: "credit".to_string(), account: AccountId::from("Carol") },
        "Arithmetic overflow in credit for account 'Carol'"
    )]
    #[case::precision_loss(
        LedgerError::PrecisionLoss { operation: "debit".to_string(), account: AccountId::from("Dave") },
        "Precision loss in debit for account 'Dave'"
    )]
    #[case::file_not_found(
        LedgerError::FileNotFound { path: "transfers.csv".to_string() },
        "File not found: transfers.csv"
    )]
    #[case::parse_error_with_line(
        LedgerError::ParseError { line: Some(3), message: "Invalid field".to_string() },
        "CSV parse error at line 3: Invalid field"
    )]
    #[case::parse_error_without_line(
        LedgerError::ParseError { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::invalid_amount(
        LedgerError::invalid_amount(Decimal::ZERO),
        LedgerError::InvalidAmount { amount: Decimal::ZERO }
    )]
    #[case::same_account(
        LedgerError::same_account(&AccountId::from("Alice")),
        LedgerError::SameAccount { account: AccountId::from("Alice") }
    )]
    #[case::already_executed(
        LedgerError::already_executed(EntryId::new(1)),
        LedgerError::AlreadyExecuted { id: EntryId::new(1) }
    )]
    #[case::precision_loss(
        LedgerError::precision_loss("credit", &AccountId::from("Erin")),
        LedgerError::PrecisionLoss { operation: "credit".to_string(), account: AccountId::from("Erin") }
    )]
    #[case::not_found(
        LedgerError::not_found(EntryId::new(9)),
        LedgerError::NotFound { id: EntryId::new(9) }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }

    #[test]
    fn test_csv_io_error_converts_to_io_error() {
        let csv_error = csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "Broken pipe",
        ));
        let error: LedgerError = csv_error.into();
        assert_eq!(error, LedgerError::IoError { message: "Broken pipe".to_string() });
    }

    #[test]
    fn test_csv_record_error_converts_to_parse_error() {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader("a,b\nc\n".as_bytes());
        let csv_error = reader
            .records()
            .find_map(Result::err)
            .expect("Unequal row lengths should fail");

        let error: LedgerError = csv_error.into();
        assert!(matches!(error, LedgerError::ParseError { line: Some(2), .. }));
    }
}
