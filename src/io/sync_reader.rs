//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over transfer records from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding `Result<TransferRecord, String>`
//! for each CSV row:
//!
//! ```no_run
//! use transfer_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("transfers.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Transfer: {:?}", record),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record parsing errors are yielded as Err variants in the iterator
//! - Line numbers are included in error messages for debugging

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{LedgerError, TransferRecord};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

/// Synchronous CSV reader
///
/// Reads one record at a time; memory use does not grow with the file.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl SyncReader {
    /// Open a CSV file for streaming iteration
    ///
    /// The CSV reader trims whitespace from all fields, tolerates a missing
    /// trailing amount column and uses an 8KB buffer.
    ///
    /// # Errors
    ///
    /// * `FileNotFound` if the path does not exist
    /// * `IoError` for any other failure to open the file
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LedgerError::file_not_found(path),
            _ => LedgerError::from(e),
        })?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<TransferRecord, String>;

    /// Get the next transfer record from the CSV file
    ///
    /// Error messages carry the 1-based file line, counting the header.
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();

        let next = deserializer.next()?;
        self.line_num += 1;
        let line = self.line_num + 1;

        Some(match next {
            Ok(csv_record) => {
                convert_csv_record(csv_record).map_err(|e| format!("Line {}: {}", line, e))
            }
            Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
        })
    }
}
