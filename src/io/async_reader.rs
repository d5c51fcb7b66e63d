//! Asynchronous CSV reader with batch interface
//!
//! Provides batched reading of domain records from any `AsyncRead` source.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader<R, T> → Batches of T
//!                  ↓
//!           csv_format module
//!           (FromCsvRecord)
//! ```

use crate::io::csv_format::FromCsvRecord;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::marker::PhantomData;

/// Asynchronous CSV reader yielding batches of `T`
pub struct AsyncReader<R: AsyncRead + Unpin, T> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    _record: PhantomData<T>,
}

impl<R, T> AsyncReader<R, T>
where
    R: AsyncRead + Unpin + Send + 'static,
    T: FromCsvRecord + Send + 'static,
    T::Record: Send + 'static,
{
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            _record: PhantomData,
        }
    }

    /// Read up to `batch_size` records
    ///
    /// Rows that fail to parse or convert are logged and skipped.
    /// Returns an empty vector once the input is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<T> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<T::Record>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(raw)) => match T::from_csv_record(raw) {
                    Ok(record) => batch.push(record),
                    Err(e) => tracing::warn!(error = %e, "record conversion error"),
                },
                Some(Err(e)) => tracing::warn!(error = %e, "CSV parse error"),
                None => break,
            }
        }

        batch
    }
}
