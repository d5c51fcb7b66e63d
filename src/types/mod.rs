//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Customer account types
//! - `transfer`: Transfer requests and committed transfer records
//! - `error`: Error types for the transfer engine and its collaborators

pub mod account;
pub mod error;
pub mod transfer;

pub use account::{Account, AccountNumber, CustomerId, NewCustomer};
pub use error::{Party, StoreError, TransferError};
pub use transfer::{PendingTransfer, TransferId, TransferRecord, TransferRequest};
