//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over domain records (customers or transfer
//! requests) from a CSV file. Delegates CSV format concerns to the
//! csv_format module.
//!
//! ```no_run
//! use rust_ledger_service::io::sync_reader::SyncReader;
//! use rust_ledger_service::types::TransferRequest;
//! use std::path::Path;
//!
//! let reader = SyncReader::<TransferRequest>::new(Path::new("transfers.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(request) => println!("Transfer: {:?}", request),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record errors are yielded as Err variants with line numbers

use crate::io::csv_format::FromCsvRecord;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;

/// Synchronous CSV reader yielding `T` per row
#[derive(Debug)]
pub struct SyncReader<T> {
    reader: csv::Reader<File>,
    line_num: usize,
    _record: PhantomData<T>,
}

impl<T: FromCsvRecord> SyncReader<T> {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (for optional trailing columns)
    /// - Use an 8KB buffer for efficient I/O
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
            _record: PhantomData,
        })
    }
}

impl<T: FromCsvRecord> Iterator for SyncReader<T> {
    type Item = Result<T, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<T::Record>();

        match deserializer.next()? {
            Ok(raw) => {
                self.line_num += 1;
                Some(
                    T::from_csv_record(raw)
                        .map_err(|e| format!("Line {}: {}", self.line_num + 1, e)),
                )
            }
            Err(e) => {
                self.line_num += 1;
                Some(Err(format!("Line {}: CSV parse error: {}", self.line_num + 1, e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewCustomer, TransferRequest};
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_reads_transfer_requests() {
        let file = create_temp_csv("sender,receiver,amount\nA,B,30\nB,A,12.5\n");

        let requests: Vec<TransferRequest> = SyncReader::new(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], TransferRequest::new("A", "B", Decimal::new(30, 0)));
        assert_eq!(requests[1], TransferRequest::new("B", "A", Decimal::new(125, 1)));
    }

    #[test]
    fn test_missing_trailing_amount_is_none() {
        let file = create_temp_csv("sender,receiver,amount\nA,B\nA,B,\n");

        let requests: Vec<TransferRequest> = SyncReader::new(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert!(requests.iter().all(|r| r.amount.is_none()));
    }

    #[test]
    fn test_reads_customers_with_whitespace() {
        let file = create_temp_csv(
            "first_name,last_name,account_number,balance\n Ana , Gomez , A , 100.00 \n",
        );

        let customers: Vec<NewCustomer> = SyncReader::new(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            customers,
            vec![NewCustomer::new("Ana", "Gomez", "A", Decimal::new(10000, 2))]
        );
    }

    #[test]
    fn test_bad_row_reports_line_and_continues() {
        let file = create_temp_csv("sender,receiver,amount\nA,B,ten\nA,B,1\n");

        let results: Vec<Result<TransferRequest, String>> =
            SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(results.len(), 2);
        assert!(results[0].as_ref().unwrap_err().starts_with("Line 2:"));
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_missing_file() {
        let result = SyncReader::<TransferRequest>::new(Path::new("does-not-exist.csv"));

        assert!(result.unwrap_err().contains("Failed to open file"));
    }
}
