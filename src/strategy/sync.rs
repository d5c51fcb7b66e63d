//! Synchronous processing strategy
//!
//! Replays transfer requests one at a time, in file order, on the calling
//! thread. Outcomes are fully deterministic, which makes this the reference
//! strategy for fixtures.

use crate::core::{EngineConfig, InMemoryLedger};
use crate::io::SyncReader;
use crate::strategy::{ProcessingStrategy, TransferSummary};
use crate::types::TransferRequest;
use std::path::Path;

/// Synchronous processing strategy
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    engine: EngineConfig,
}

impl SyncProcessingStrategy {
    /// Create a new SyncProcessingStrategy
    pub fn new(engine: EngineConfig) -> Self {
        Self { engine }
    }
}

impl Default for SyncProcessingStrategy {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn engine_config(&self) -> &EngineConfig {
        &self.engine
    }

    fn apply_transfers(
        &self,
        ledger: &InMemoryLedger,
        transfers_path: &Path,
    ) -> Result<TransferSummary, String> {
        let mut summary = TransferSummary::default();

        for result in SyncReader::<TransferRequest>::new(transfers_path)? {
            match result {
                Ok(request) => summary.record(&ledger.transfer(&request)),
                Err(e) => tracing::warn!(error = %e, "transfer request skipped"),
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Report;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    const CUSTOMERS: &str = "first_name,last_name,account_number,balance\n\
                             Ana,Gomez,A,100\n\
                             Luis,Perez,B,50\n";

    #[test]
    fn test_sync_strategy_applies_transfers_in_order() {
        let customers = create_temp_csv(CUSTOMERS);
        let transfers = create_temp_csv(
            "sender,receiver,amount\n\
             A,B,30\n\
             A,B,1000\n\
             B,A,80\n",
        );

        let strategy = SyncProcessingStrategy::default();
        let mut output = Vec::new();

        let summary = strategy
            .process(customers.path(), transfers.path(), &Report::Balances, &mut output)
            .unwrap();

        assert_eq!(summary.committed, 2);
        assert_eq!(summary.rejected, 1);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,first_name,last_name,account_number,balance\n\
             1,Ana,Gomez,A,150.00\n\
             2,Luis,Perez,B,0.00\n"
        );
    }

    #[test]
    fn test_sync_strategy_continues_on_malformed_record() {
        let customers = create_temp_csv(CUSTOMERS);
        let transfers = create_temp_csv(
            "sender,receiver,amount\n\
             A,B,abc\n\
             A,B,10\n",
        );

        let strategy = SyncProcessingStrategy::default();
        let mut output = Vec::new();

        let summary = strategy
            .process(customers.path(), transfers.path(), &Report::Balances, &mut output)
            .unwrap();

        assert_eq!(summary.committed, 1);
        assert_eq!(summary.rejected, 0);
    }

    #[test]
    fn test_sync_strategy_rejects_opening_balance_finer_than_scale() {
        let customers = create_temp_csv(
            "first_name,last_name,account_number,balance\n\
             Ana,Gomez,A,10.005\n\
             Luis,Perez,B,0\n",
        );
        let transfers = create_temp_csv("sender,receiver,amount\nA,B,10.00\n");

        let strategy = SyncProcessingStrategy::default();
        let mut output = Vec::new();

        let summary = strategy
            .process(customers.path(), transfers.path(), &Report::Balances, &mut output)
            .unwrap();

        assert_eq!(summary.committed, 0);
        assert_eq!(summary.rejected, 1);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,first_name,last_name,account_number,balance\n\
             1,Luis,Perez,B,0.00\n"
        );
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let customers = create_temp_csv(CUSTOMERS);
        let strategy = SyncProcessingStrategy::default();
        let mut output = Vec::new();

        let result = strategy.process(
            customers.path(),
            Path::new("nonexistent.csv"),
            &Report::Balances,
            &mut output,
        );

        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }
}
