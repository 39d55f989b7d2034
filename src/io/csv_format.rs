//! CSV format handling for transfer records, balances and the journal
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to domain types
//! - Balance and journal output serialization
//!
//! All functions are pure (no file handling) for easy testing.

use crate::types::{AccountBalance, AccountId, LedgerEntry, LedgerError, TransferRecord};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: sender, receiver, amount.
/// The amount is kept as an optional string so that a missing or malformed
/// amount is reported per record instead of aborting the whole file.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub sender: String,
    pub receiver: String,
    pub amount: Option<String>,
}

/// Convert a CsvRecord to a TransferRecord
///
/// Only checks that the fields are present and the amount parses as a
/// decimal. Ledger rules (positive amount, distinct accounts) are enforced
/// later by `Transaction::new`, so they surface as typed errors.
///
/// # Returns
///
/// * `Ok(TransferRecord)` - Successfully converted record
/// * `Err(String)` - Error message describing the conversion failure
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<TransferRecord, String> {
    let sender = csv_record.sender.trim();
    let receiver = csv_record.receiver.trim();

    if sender.is_empty() || receiver.is_empty() {
        return Err(format!(
            "Transfer '{}' -> '{}' requires both a sender and a receiver",
            sender, receiver
        ));
    }

    let amount = match csv_record.amount.as_deref().map(str::trim) {
        Some(amount_str) if !amount_str.is_empty() => Decimal::from_str(amount_str)
            .map_err(|_| {
                format!(
                    "Invalid amount '{}' for transfer {} -> {}",
                    amount_str, sender, receiver
                )
            })?,
        _ => {
            return Err(format!(
                "Transfer {} -> {} requires an amount",
                sender, receiver
            ))
        }
    };

    Ok(TransferRecord {
        sender: AccountId::from(sender),
        receiver: AccountId::from(receiver),
        amount,
    })
}

/// Write account balances to CSV format
///
/// Writes balances with columns: account, balance.
/// Rows are sorted by account for deterministic output, and balances are
/// rendered with four decimal places.
pub fn write_balances_csv(
    balances: &[AccountBalance],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["account", "balance"])?;

    let mut sorted = balances.to_vec();
    sorted.sort_by(|a, b| a.account.cmp(&b.account));

    for row in sorted {
        writer.write_record(&[row.account.to_string(), format!("{:.4}", row.balance)])?;
    }

    writer.flush()?;

    Ok(())
}

/// Write transaction log entries to CSV format
///
/// Writes entries in the order given with columns:
/// id, sender, receiver, amount, sender_balance, receiver_balance.
/// Amounts keep the scale they were executed with.
pub fn write_journal_csv<I>(entries: I, output: &mut dyn Write) -> Result<(), LedgerError>
where
    I: IntoIterator<Item = LedgerEntry>,
{
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record([
        "id",
        "sender",
        "receiver",
        "amount",
        "sender_balance",
        "receiver_balance",
    ])?;

    for entry in entries {
        writer.write_record(&[
            entry.id.to_string(),
            entry.sender.to_string(),
            entry.receiver.to_string(),
            entry.amount.to_string(),
            entry.sender_balance.to_string(),
            entry.receiver_balance.to_string(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryId;
    use rstest::rstest;

    fn csv_record(sender: &str, receiver: &str, amount: Option<&str>) -> CsvRecord {
        CsvRecord {
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            amount: amount.map(str::to_string),
        }
    }

    #[rstest]
    #[case::plain("100.0", Decimal::new(1000, 1))]
    #[case::padded(" 25.5 ", Decimal::new(255, 1))]
    #[case::four_places("0.0001", Decimal::new(1, 4))]
    fn test_convert_csv_record_parses_amount(#[case] raw: &str, #[case] expected: Decimal) {
        let record = convert_csv_record(csv_record("Alice", "Bob", Some(raw))).unwrap();

        assert_eq!(record.sender, AccountId::from("Alice"));
        assert_eq!(record.receiver, AccountId::from("Bob"));
        assert_eq!(record.amount, expected);
    }

    #[test]
    fn test_convert_csv_record_keeps_amount_scale() {
        let record = convert_csv_record(csv_record("Alice", "Bob", Some("100.0"))).unwrap();
        assert_eq!(record.amount.to_string(), "100.0");
    }

    #[test]
    fn test_convert_csv_record_trims_account_names() {
        let record = convert_csv_record(csv_record("  Alice ", "Bob  ", Some("1"))).unwrap();
        assert_eq!(record.sender.as_str(), "Alice");
        assert_eq!(record.receiver.as_str(), "Bob");
    }

    #[rstest]
    #[case::missing_amount(csv_record("Alice", "Bob", None), "requires an amount")]
    #[case::blank_amount(csv_record("Alice", "Bob", Some("  ")), "requires an amount")]
    #[case::invalid_amount(csv_record("Alice", "Bob", Some("abc")), "Invalid amount 'abc'")]
    #[case::missing_sender(csv_record("", "Bob", Some("1")), "requires both a sender and a receiver")]
    #[case::missing_receiver(csv_record("Alice", " ", Some("1")), "requires both a sender and a receiver")]
    fn test_convert_csv_record_errors(#[case] record: CsvRecord, #[case] message: &str) {
        let error = convert_csv_record(record).unwrap_err();
        assert!(error.contains(message), "unexpected error: {}", error);
    }

    #[test]
    fn test_convert_csv_record_leaves_ledger_rules_to_transactions() {
        // Non-positive amounts and self-transfers are rejected downstream
        assert!(convert_csv_record(csv_record("Alice", "Alice", Some("-1"))).is_ok());
    }

    #[test]
    fn test_write_balances_csv_sorts_and_formats() {
        let balances = vec![
            AccountBalance::new(AccountId::from("Bob"), Decimal::new(500, 1)),
            AccountBalance::new(AccountId::from("Alice"), Decimal::new(-500, 1)),
        ];
        let mut output = Vec::new();

        write_balances_csv(&balances, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output, "account,balance\nAlice,-50.0000\nBob,50.0000\n");
    }

    #[test]
    fn test_write_balances_csv_empty_has_header_only() {
        let mut output = Vec::new();
        write_balances_csv(&[], &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "account,balance\n");
    }

    /// Writer whose every write fails, like a closed stdout
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "Broken pipe"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failures_are_io_errors() {
        let balances = vec![AccountBalance::new(AccountId::from("Alice"), Decimal::ONE)];

        let balances_error = write_balances_csv(&balances, &mut ClosedPipe).unwrap_err();
        let journal_error =
            write_journal_csv(Vec::<LedgerEntry>::new(), &mut ClosedPipe).unwrap_err();

        assert!(matches!(balances_error, LedgerError::IoError { .. }));
        assert!(matches!(journal_error, LedgerError::IoError { .. }));
    }

    #[test]
    fn test_write_journal_csv_writes_entries_in_order() {
        let entries = vec![
            LedgerEntry {
                id: EntryId::new(1),
                sender: AccountId::from("Alice"),
                receiver: AccountId::from("Bob"),
                amount: Decimal::new(500, 1),
                sender_balance: Decimal::new(-500, 1),
                receiver_balance: Decimal::new(500, 1),
            },
            LedgerEntry {
                id: EntryId::new(2),
                sender: AccountId::from("Bob"),
                receiver: AccountId::from("Charlie"),
                amount: Decimal::new(250, 1),
                sender_balance: Decimal::new(250, 1),
                receiver_balance: Decimal::new(250, 1),
            },
        ];
        let mut output = Vec::new();

        write_journal_csv(entries, &mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output,
            "id,sender,receiver,amount,sender_balance,receiver_balance\n\
             1,Alice,Bob,50.0,-50.0,50.0\n\
             2,Bob,Charlie,25.0,25.0,25.0\n"
        );
    }
}
