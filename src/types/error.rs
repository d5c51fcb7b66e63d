//! Error types for the ledger
//!
//! This module defines the errors returned by the transfer engine and by its
//! storage collaborators.
//!
//! # Error Categories
//!
//! - **Transfer Errors** (`TransferError`): the five outcomes a caller of
//!   `transfer` can observe. Validation kinds leave state untouched; only
//!   `TransferAborted` is retryable.
//! - **Store Errors** (`StoreError`): failures reported by the account store
//!   and the transaction log. The engine classifies each of these into exactly
//!   one `TransferError`.

use rust_decimal::Decimal;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which side of a transfer an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Sender,
    Receiver,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Sender => write!(f, "sender"),
            Party::Receiver => write!(f, "receiver"),
        }
    }
}

/// Errors returned by the transfer engine
///
/// Every failed transfer is reported as exactly one of these variants.
/// None of them is fatal to the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransferError {
    /// Amount missing, zero, negative, or finer than the currency unit
    ///
    /// Rejected before any account is looked up.
    #[error("Invalid transfer amount: {}", amount.map(|a| a.to_string()).unwrap_or_else(|| "missing".to_string()))]
    InvalidAmount {
        /// The rejected amount (None when it was missing)
        amount: Option<Decimal>,
    },

    /// Sender or receiver account does not resolve
    #[error("{side} account '{account_number}' not found")]
    AccountNotFound {
        /// Which side failed to resolve
        side: Party,
        /// The account number that was looked up
        account_number: String,
    },

    /// Sender and receiver are the same account
    #[error("Cannot transfer from account '{account_number}' to itself")]
    SameAccountTransfer {
        /// The account number used on both sides
        account_number: String,
    },

    /// Sender balance is below the requested amount
    ///
    /// The caller may retry once the balance has changed.
    #[error("Insufficient funds in account '{account_number}': balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Sender account number
        account_number: String,
        /// Sender balance at the time of the check
        balance: Decimal,
        /// Requested amount
        requested: Decimal,
    },

    /// Storage-layer failure; nothing was committed
    ///
    /// Retrying is always safe.
    #[error("Transfer aborted: {reason}")]
    TransferAborted {
        /// Internal description of the failure (not for clients)
        reason: String,
    },
}

impl TransferError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Option<Decimal>) -> Self {
        TransferError::InvalidAmount { amount }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(side: Party, account_number: &str) -> Self {
        TransferError::AccountNotFound {
            side,
            account_number: account_number.to_string(),
        }
    }

    /// Create a SameAccountTransfer error
    pub fn same_account(account_number: &str) -> Self {
        TransferError::SameAccountTransfer {
            account_number: account_number.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account_number: &str, balance: Decimal, requested: Decimal) -> Self {
        TransferError::InsufficientFunds {
            account_number: account_number.to_string(),
            balance,
            requested,
        }
    }

    /// Create a TransferAborted error from any storage failure
    pub fn aborted(reason: impl fmt::Display) -> Self {
        TransferError::TransferAborted {
            reason: reason.to_string(),
        }
    }

    /// Whether the caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransferError::TransferAborted { .. })
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            TransferError::InvalidAmount { .. } => "invalid_amount",
            TransferError::AccountNotFound { .. } => "account_not_found",
            TransferError::SameAccountTransfer { .. } => "same_account_transfer",
            TransferError::InsufficientFunds { .. } => "insufficient_funds",
            TransferError::TransferAborted { .. } => "transfer_aborted",
        }
    }

    /// Message safe to show to a client
    ///
    /// Storage details carried by `TransferAborted` are never included.
    pub fn client_message(&self) -> String {
        match self {
            TransferError::InvalidAmount { .. } => {
                "The transfer amount must be a positive value in the ledger currency".to_string()
            }
            TransferError::AccountNotFound {
                side,
                account_number,
            } => format!("The {} account '{}' does not exist", side, account_number),
            TransferError::SameAccountTransfer { .. } => {
                "Sender and receiver accounts must be different".to_string()
            }
            TransferError::InsufficientFunds { .. } => {
                "The sender account does not have enough funds".to_string()
            }
            TransferError::TransferAborted { .. } => {
                "The transfer could not be completed, please try again".to_string()
            }
        }
    }
}

/// Errors reported by the account store and the transaction log
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// No account with this account number
    #[error("Account '{account_number}' not found")]
    NotFound { account_number: String },

    /// No customer with this ID
    #[error("Customer {id} not found")]
    CustomerNotFound { id: u64 },

    /// Balance adjustment would leave the account negative
    #[error("Adjusting account '{account_number}' by {delta} would leave balance {balance} negative")]
    ConstraintViolation {
        account_number: String,
        balance: Decimal,
        delta: Decimal,
    },

    /// Account number already taken
    #[error("Account '{account_number}' already exists")]
    DuplicateAccount { account_number: String },

    /// Customer data rejected on creation
    #[error("Invalid customer: {message}")]
    InvalidCustomer { message: String },

    /// Exclusive access not obtained within the timeout
    #[error("Timed out after {timeout:?} waiting for account '{account_number}'")]
    LockTimeout {
        account_number: String,
        timeout: Duration,
    },

    /// Decimal arithmetic overflowed
    #[error("Arithmetic overflow adjusting account '{account_number}'")]
    Overflow { account_number: String },

    /// Backing store could not serve the request
    #[error("Store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    /// Create a NotFound error
    pub fn not_found(account_number: &str) -> Self {
        StoreError::NotFound {
            account_number: account_number.to_string(),
        }
    }

    /// Create an InvalidCustomer error
    pub fn invalid_customer(message: impl Into<String>) -> Self {
        StoreError::InvalidCustomer {
            message: message.into(),
        }
    }

    /// Create a LockTimeout error
    pub fn lock_timeout(account_number: &str, timeout: Duration) -> Self {
        StoreError::LockTimeout {
            account_number: account_number.to_string(),
            timeout,
        }
    }

    /// Create an Unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_amount_missing(
        TransferError::InvalidAmount { amount: None },
        "Invalid transfer amount: missing"
    )]
    #[case::invalid_amount_negative(
        TransferError::InvalidAmount { amount: Some(Decimal::new(-500, 2)) },
        "Invalid transfer amount: -5.00"
    )]
    #[case::account_not_found(
        TransferError::AccountNotFound { side: Party::Receiver, account_number: "ACC-9".to_string() },
        "receiver account 'ACC-9' not found"
    )]
    #[case::same_account(
        TransferError::SameAccountTransfer { account_number: "ACC-1".to_string() },
        "Cannot transfer from account 'ACC-1' to itself"
    )]
    #[case::insufficient_funds(
        TransferError::InsufficientFunds { account_number: "ACC-1".to_string(), balance: Decimal::new(7000, 2), requested: Decimal::new(100000, 2) },
        "Insufficient funds in account 'ACC-1': balance 70.00, requested 1000.00"
    )]
    #[case::aborted(
        TransferError::TransferAborted { reason: "disk on fire".to_string() },
        "Transfer aborted: disk on fire"
    )]
    fn test_transfer_error_display(#[case] error: TransferError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::not_found(
        StoreError::not_found("ACC-1"),
        "Account 'ACC-1' not found"
    )]
    #[case::constraint(
        StoreError::ConstraintViolation { account_number: "ACC-1".to_string(), balance: Decimal::new(10, 0), delta: Decimal::new(-20, 0) },
        "Adjusting account 'ACC-1' by -20 would leave balance 10 negative"
    )]
    #[case::duplicate(
        StoreError::DuplicateAccount { account_number: "ACC-1".to_string() },
        "Account 'ACC-1' already exists"
    )]
    #[case::lock_timeout(
        StoreError::lock_timeout("ACC-1", Duration::from_millis(50)),
        "Timed out after 50ms waiting for account 'ACC-1'"
    )]
    fn test_store_error_display(#[case] error: StoreError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::invalid_amount(TransferError::invalid_amount(None), false)]
    #[case::not_found(TransferError::account_not_found(Party::Sender, "A"), false)]
    #[case::same_account(TransferError::same_account("A"), false)]
    #[case::insufficient(TransferError::insufficient_funds("A", Decimal::ONE, Decimal::TEN), false)]
    #[case::aborted(TransferError::aborted("conflict"), true)]
    fn test_is_retryable(#[case] error: TransferError, #[case] expected: bool) {
        assert_eq!(error.is_retryable(), expected);
    }

    #[test]
    fn test_client_message_hides_storage_details() {
        let error = TransferError::aborted(StoreError::unavailable("pool exhausted at 10.0.0.3"));

        let message = error.client_message();
        assert!(!message.contains("10.0.0.3"));
        assert!(!message.contains("pool"));
        assert!(error.to_string().contains("pool exhausted"));
    }

    #[test]
    fn test_client_message_names_missing_side() {
        let error = TransferError::account_not_found(Party::Sender, "ACC-404");

        assert_eq!(
            error.client_message(),
            "The sender account 'ACC-404' does not exist"
        );
        assert_eq!(error.kind(), "account_not_found");
    }
}
