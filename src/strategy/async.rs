//! Asynchronous batch processing strategy
//!
//! Replays transfer requests concurrently on a tokio multi-threaded runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── Ledger (shared by every task)
//!         └── TransferEngine (ordered per-account locking)
//! ```
//!
//! # Parallelism
//!
//! - Batches are processed one after another; a batch finishes before the
//!   next one is read
//! - Within a batch, up to `max_concurrent_batches` transfers run at once,
//!   each on a blocking task since the engine waits on account locks
//! - Transfers touching disjoint accounts never wait on each other
//!
//! Within a batch the commit order of transfers that share an account is not
//! defined, so a transfer that depends on an earlier credit in the same batch
//! may be rejected for insufficient funds.

use crate::core::{EngineConfig, InMemoryLedger};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{ProcessingStrategy, TransferSummary};
use crate::types::{TransferError, TransferRequest};
use futures::stream::{self, StreamExt};
use std::path::Path;

/// Configuration for batch processing
///
/// Controls how many requests are read per batch and how many transfers
/// run concurrently.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of transfer requests per batch
    pub batch_size: usize,
    /// Maximum number of transfers executing concurrently
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "Invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "Invalid max_concurrent_batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    engine: EngineConfig,
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy
    pub fn new(engine: EngineConfig, config: BatchConfig) -> Self {
        Self { engine, config }
    }

    /// Run one batch with bounded concurrency
    async fn run_batch(&self, ledger: &InMemoryLedger, batch: Vec<TransferRequest>) -> TransferSummary {
        let results: Vec<_> = stream::iter(batch)
            .map(|request| {
                let ledger = ledger.clone();
                tokio::task::spawn_blocking(move || ledger.transfer(&request))
            })
            .buffer_unordered(self.config.max_concurrent_batches)
            .collect()
            .await;

        let mut summary = TransferSummary::default();
        for joined in results {
            let result = joined.unwrap_or_else(|e| Err(TransferError::aborted(e)));
            summary.record(&result);
        }
        summary
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn engine_config(&self) -> &EngineConfig {
        &self.engine
    }

    fn apply_transfers(
        &self,
        ledger: &InMemoryLedger,
        transfers_path: &Path,
    ) -> Result<TransferSummary, String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let file = tokio::fs::File::open(transfers_path).await.map_err(|e| {
                format!(
                    "Failed to open file '{}': {}",
                    transfers_path.display(),
                    e
                )
            })?;

            // csv-async reads through the futures AsyncRead traits.
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader: AsyncReader<_, TransferRequest> = AsyncReader::new(compat_file);

            let mut summary = TransferSummary::default();
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                let batch_summary = self.run_batch(ledger, batch).await;
                summary.committed += batch_summary.committed;
                summary.rejected += batch_summary.rejected;
                summary.aborted += batch_summary.aborted;
            }

            Ok(summary)
        })
    }
}
