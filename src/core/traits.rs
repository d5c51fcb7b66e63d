//! Collaborator traits consumed by the transfer engine
//!
//! The engine receives its account store and transaction log as constructor
//! arguments typed by these traits, so the in-memory implementations in this
//! crate can be swapped for any backend that honours the same contracts.

use crate::types::{
    Account, CustomerId, NewCustomer, PendingTransfer, StoreError, TransferRecord,
};
use rust_decimal::Decimal;
use std::time::Duration;

/// Exclusive, staged access to a single account
///
/// Changes made through `adjust_balance` are private to the guard until
/// `commit` publishes them. Dropping an uncommitted guard discards them, which
/// is how a failed transfer rolls back.
pub trait AccountGuard {
    /// Account number this guard holds
    fn account_number(&self) -> &str;

    /// Balance including any staged adjustment
    fn balance(&self) -> Decimal;

    /// Stage `delta` on the balance and return the staged result
    ///
    /// Fails with `ConstraintViolation` if the result would be negative and
    /// with `Overflow` if the decimal arithmetic overflows. A failed call
    /// leaves the staged balance as it was.
    fn adjust_balance(&mut self, delta: Decimal) -> Result<Decimal, StoreError>;

    /// Publish the staged balance and release the account
    fn commit(self);
}

/// Trait for the customer/account store
///
/// Implementations must be safe to share across threads. Reads of an account
/// that is held by a guard wait for the guard to be released.
pub trait AccountStore: Send + Sync {
    /// Guard type returned by `lock`
    type Guard: AccountGuard;

    /// Look up an account by account number
    fn get(&self, account_number: &str) -> Result<Account, StoreError>;

    /// Look up an account by customer ID
    fn get_by_id(&self, id: CustomerId) -> Result<Account, StoreError>;

    /// Open a new account
    fn create(&self, customer: NewCustomer) -> Result<Account, StoreError>;

    /// Snapshot of every account, ordered by customer ID
    fn list(&self) -> Result<Vec<Account>, StoreError>;

    /// Acquire exclusive access to one account, waiting at most `timeout`
    fn lock(&self, account_number: &str, timeout: Duration) -> Result<Self::Guard, StoreError>;

    /// Timeout applied by the convenience operations of this store
    fn default_timeout(&self) -> Duration;

    /// Atomically adjust one account's balance
    ///
    /// Returns the new balance, or `ConstraintViolation` if it would go
    /// negative.
    fn adjust_balance(&self, account_number: &str, delta: Decimal) -> Result<Decimal, StoreError> {
        let mut guard = self.lock(account_number, self.default_timeout())?;
        let balance = guard.adjust_balance(delta)?;
        guard.commit();
        Ok(balance)
    }
}

/// Trait for the append-only transaction log
pub trait TransactionLog: Send + Sync {
    /// Append a transfer, assigning its id and timestamp
    ///
    /// Ids and timestamps are strictly increasing across appended records.
    fn append(&self, transfer: PendingTransfer) -> Result<TransferRecord, StoreError>;

    /// Every record where the account is sender or receiver, oldest first
    fn find_by_account(&self, account_number: &str) -> Result<Vec<TransferRecord>, StoreError>;

    /// Number of committed records
    fn len(&self) -> usize;

    /// Whether no record has been committed yet
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
