//! Asynchronous CSV reader with batch interface
//!
//! Provides batch reading over transfer records from any `futures` async
//! reader, using csv-async for streaming CSV parsing.
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of TransferRecords
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::TransferRecord;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Invalid records are logged and skipped; the number skipped so far is
/// available through `skipped()`.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    skipped: usize,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            skipped: 0,
        }
    }

    /// Read a batch of transfer records
    ///
    /// Reads until `batch_size` valid records are collected or the input is
    /// exhausted. Returns an empty vector at end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<TransferRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => match convert_csv_record(csv_record) {
                    Ok(transfer) => batch.push(transfer),
                    Err(e) => {
                        warn!(error = %e, "Record conversion error");
                        self.skipped += 1;
                    }
                },
                Some(Err(e)) => {
                    warn!(error = %e, "CSV parse error");
                    self.skipped += 1;
                }
                None => break,
            }
        }

        batch
    }

    /// Number of records skipped because they could not be parsed
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
