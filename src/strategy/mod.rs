//! Processing strategy module for replaying transfer files
//!
//! This module defines the Strategy pattern for the CLI pipeline: load
//! customers, run every transfer request through the ledger, and write a
//! report. Strategies differ only in how transfers are executed
//! (sequentially or concurrently), so they can be selected at runtime.

use crate::cli::StrategyType;
use crate::core::{EngineConfig, InMemoryLedger};
use crate::io::csv_format::{write_accounts_csv, write_history_csv};
use crate::io::SyncReader;
use crate::types::{NewCustomer, TransferError, TransferRecord};
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// What to write once all transfers have been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Final balance of every account
    Balances,
    /// Transfer history of one account
    History(String),
}

/// Outcome counts for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferSummary {
    pub committed: usize,
    pub rejected: usize,
    pub aborted: usize,
}

impl TransferSummary {
    /// Count one transfer outcome
    pub fn record(&mut self, result: &Result<TransferRecord, TransferError>) {
        match result {
            Ok(_) => self.committed += 1,
            Err(e) if e.is_retryable() => self.aborted += 1,
            Err(_) => self.rejected += 1,
        }
    }
}

/// Processing strategy trait for the complete CLI pipeline
pub trait ProcessingStrategy: Send + Sync {
    /// Engine configuration the ledger is built with
    fn engine_config(&self) -> &EngineConfig;

    /// Run every transfer request in `transfers_path` through the ledger
    ///
    /// Individual transfer failures are logged and counted; only fatal
    /// errors (unreadable input, runtime failure) are returned.
    fn apply_transfers(
        &self,
        ledger: &InMemoryLedger,
        transfers_path: &Path,
    ) -> Result<TransferSummary, String>;

    /// Load customers, apply transfers, and write the report to `output`
    fn process(
        &self,
        customers_path: &Path,
        transfers_path: &Path,
        report: &Report,
        output: &mut dyn Write,
    ) -> Result<TransferSummary, String> {
        let ledger = InMemoryLedger::in_memory(self.engine_config().clone());

        let loaded = load_customers(&ledger, customers_path)?;
        tracing::info!(customers = loaded, "customers loaded");

        let summary = self.apply_transfers(&ledger, transfers_path)?;
        tracing::info!(
            committed = summary.committed,
            rejected = summary.rejected,
            aborted = summary.aborted,
            "transfers applied"
        );

        write_report(&ledger, report, self.engine_config().currency_scale, output)?;
        Ok(summary)
    }
}

/// Create customers from a CSV file, returning how many were created
///
/// Rows that fail to parse or are rejected by the store are logged and
/// skipped.
pub fn load_customers(ledger: &InMemoryLedger, path: &Path) -> Result<usize, String> {
    let mut created = 0;

    for result in SyncReader::<NewCustomer>::new(path)? {
        match result.map_err(|e| e.to_string()).and_then(|customer| {
            ledger
                .create_customer(customer)
                .map_err(|e| e.to_string())
        }) {
            Ok(_) => created += 1,
            Err(e) => tracing::warn!(error = %e, "customer skipped"),
        }
    }

    Ok(created)
}

/// Write the requested report
pub fn write_report(
    ledger: &InMemoryLedger,
    report: &Report,
    scale: u32,
    output: &mut dyn Write,
) -> Result<(), String> {
    match report {
        Report::Balances => {
            let accounts = ledger.list_customers().map_err(|e| e.to_string())?;
            write_accounts_csv(&accounts, scale, output)
        }
        Report::History(account_number) => {
            let records = ledger.history(account_number).map_err(|e| e.to_string())?;
            write_history_csv(&records, scale, output)
        }
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// `batch` is only used by the async strategy and defaults when absent.
pub fn create_strategy(
    strategy_type: StrategyType,
    engine: EngineConfig,
    batch: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(engine)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            engine,
            batch.unwrap_or_default(),
        )),
    }
}
