//! Rust Ledger Service Library
//! # Overview
//!
//! A minimal ledger of customer accounts whose core is an atomic fund-transfer
//! engine. Transfers can be replayed from CSV files sequentially or
//! concurrently.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, TransferRequest, TransferRecord, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::traits`] - Account store and transaction log contracts
//!   - [`core::engine`] - Transfer validation and atomic execution
//!   - [`core::account_store`] - In-memory account store with per-account locks
//!   - [`core::transaction_log`] - In-memory append-only transfer log
//!   - [`core::ledger`] - Request façade over the engine and its collaborators
//! - [`io`] - CSV readers and report writers
//! - [`strategy`] - Sync and async replay of transfer files
//! - [`logging`] - tracing subscriber setup
//!
//! # Transfer Semantics
//!
//! A transfer moves a positive amount from a sender account to a different
//! receiver account. Either both balances change and exactly one
//! [`TransferRecord`] is appended to the log, or nothing changes at all.
//!
//! Outcomes are reported as [`TransferError`]:
//!
//! - **InvalidAmount**: amount missing, not positive, or finer than the currency scale
//! - **AccountNotFound**: sender or receiver does not exist
//! - **SameAccountTransfer**: sender and receiver are the same account
//! - **InsufficientFunds**: sender balance is below the amount
//! - **TransferAborted**: an infrastructure failure rolled the transfer back
//!
//! # Concurrency
//!
//! Account locks are always taken in ascending account-number order, so two
//! transfers in opposite directions between the same accounts can not
//! deadlock. Transfers on disjoint accounts run in parallel.

pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{
    AccountGuard, AccountStore, EngineConfig, InMemoryAccountStore, InMemoryLedger,
    InMemoryTransactionLog, Ledger, TransactionLog, TransferEngine,
};
pub use io::{write_accounts_csv, write_history_csv};
pub use types::{
    Account, AccountNumber, CustomerId, NewCustomer, Party, PendingTransfer, StoreError,
    TransferError, TransferId, TransferRecord, TransferRequest,
};
