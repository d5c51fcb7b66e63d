//! Thread-safe append-only transaction log
//!
//! This module provides the `InMemoryTransactionLog` struct, which records
//! every committed transfer and answers history queries per account.
//!
//! # Design
//!
//! ```text
//! InMemoryTransactionLog
//!     ├── Mutex<Sequence>                          (id + timestamp allocation)
//!     ├── DashMap<TransferId, TransferRecord>      (records)
//!     └── DashMap<AccountNumber, Vec<TransferId>>  (per-account index)
//! ```
//!
//! Appends allocate the id and timestamp and update the index while holding
//! the sequence lock, so ids and timestamps are strictly increasing and each
//! account's index is in commit order. History is returned chronologically
//! (oldest first).

use crate::core::engine::DEFAULT_LOCK_TIMEOUT;
use crate::core::traits::TransactionLog;
use crate::types::{AccountNumber, PendingTransfer, StoreError, TransferId, TransferRecord};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::time::Duration;

/// Next id and last handed-out timestamp
#[derive(Debug)]
struct Sequence {
    next_id: TransferId,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Sequence {
    /// Allocate the next id and a timestamp strictly after the previous one
    fn allocate(&mut self) -> (TransferId, DateTime<Utc>) {
        let now = Utc::now();
        let timestamp = match self.last_timestamp {
            Some(last) if now <= last => last + ChronoDuration::microseconds(1),
            _ => now,
        };
        let id = self.next_id;
        self.next_id += 1;
        self.last_timestamp = Some(timestamp);
        (id, timestamp)
    }
}

/// Thread-safe, append-only transfer log
#[derive(Debug)]
pub struct InMemoryTransactionLog {
    sequence: Mutex<Sequence>,
    records: DashMap<TransferId, TransferRecord>,
    by_account: DashMap<AccountNumber, Vec<TransferId>>,
    timeout: Duration,
}

impl InMemoryTransactionLog {
    /// Create an empty log using the default lock timeout
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    /// Create an empty log with a custom lock timeout for appends
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            sequence: Mutex::new(Sequence {
                next_id: 1,
                last_timestamp: None,
            }),
            records: DashMap::new(),
            by_account: DashMap::new(),
            timeout,
        }
    }

    /// Every record in commit order
    pub fn all(&self) -> Vec<TransferRecord> {
        let mut records: Vec<TransferRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|record| record.id);
        records
    }
}

impl Default for InMemoryTransactionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionLog for InMemoryTransactionLog {
    fn append(&self, transfer: PendingTransfer) -> Result<TransferRecord, StoreError> {
        let mut sequence = self
            .sequence
            .try_lock_for(self.timeout)
            .ok_or_else(|| StoreError::unavailable("timed out waiting for the transaction log"))?;

        let (id, timestamp) = sequence.allocate();
        let record = TransferRecord {
            id,
            sender_account_number: transfer.sender_account_number,
            receiver_account_number: transfer.receiver_account_number,
            amount: transfer.amount,
            timestamp,
        };

        self.records.insert(id, record.clone());
        for account in [
            &record.sender_account_number,
            &record.receiver_account_number,
        ] {
            self.by_account.entry(account.clone()).or_default().push(id);
        }

        Ok(record)
    }

    fn find_by_account(&self, account_number: &str) -> Result<Vec<TransferRecord>, StoreError> {
        let ids = self
            .by_account
            .get(account_number)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();

        Ok(ids
            .into_iter()
            .filter_map(|id| self.records.get(&id).map(|entry| entry.value().clone()))
            .collect())
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}
