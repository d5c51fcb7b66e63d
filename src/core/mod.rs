//! Core business logic module
//!
//! This module contains the fund-transfer components:
//! - `traits` - Collaborator contracts consumed by the engine
//! - `engine` - Transfer validation and atomic execution
//! - `account_store` - In-memory customer/account store
//! - `transaction_log` - In-memory append-only transfer log
//! - `ledger` - Façade combining the three for callers

pub mod account_store;
pub mod engine;
pub mod ledger;
pub mod traits;
pub mod transaction_log;

pub use account_store::{InMemoryAccountGuard, InMemoryAccountStore};
pub use engine::{EngineConfig, TransferEngine};
pub use ledger::{InMemoryLedger, Ledger};
pub use traits::{AccountGuard, AccountStore, TransactionLog};
pub use transaction_log::InMemoryTransactionLog;
