//! Thread-safe in-memory account store
//!
//! This module provides the `InMemoryAccountStore` struct, which keeps customer
//! accounts in concurrent data structures so that transfers on different
//! accounts can proceed in parallel.
//!
//! # Design
//!
//! ```text
//! InMemoryAccountStore
//!     ├── DashMap<AccountNumber, Arc<RwLock<Account>>>  (account cells)
//!     └── DashMap<CustomerId, AccountNumber>            (id index)
//! ```
//!
//! The `DashMap` only guards the index. Each account lives in its own
//! `parking_lot::RwLock` cell, cloned out of the map before it is locked, so
//! no shard lock is ever held while waiting on an account. Exclusive access
//! is handed out as an `InMemoryAccountGuard` that owns the write lock and
//! stages balance changes until `commit`.
//!
//! # Thread Safety
//!
//! Every lock acquisition is bounded by a timeout. A reader of an account that
//! is currently held by a guard waits for the guard, so it observes either the
//! balance before the transfer or the balance after it, never in between.
//!
//! `list` read-locks every account in ascending account-number order, the
//! same order transfers take their write locks, and clones only once all read
//! guards are held. A listing therefore never shows one side of a transfer
//! without the other.

use crate::core::engine::{DEFAULT_CURRENCY_SCALE, DEFAULT_LOCK_TIMEOUT};
use crate::core::traits::{AccountGuard, AccountStore};
use crate::types::{Account, AccountNumber, CustomerId, NewCustomer, StoreError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{ArcRwLockReadGuard, ArcRwLockWriteGuard, RawRwLock, RwLock};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

type AccountCell = Arc<RwLock<Account>>;
type AccountWriteGuard = ArcRwLockWriteGuard<RawRwLock, Account>;
type AccountReadGuard = ArcRwLockReadGuard<RawRwLock, Account>;

/// Thread-safe account store backed by `DashMap` and per-account `RwLock`s
#[derive(Debug)]
pub struct InMemoryAccountStore {
    /// Account cells by account number
    accounts: DashMap<AccountNumber, AccountCell>,

    /// Account number by customer ID
    ids: DashMap<CustomerId, AccountNumber>,

    /// Next customer ID to hand out
    next_id: AtomicU64,

    /// Timeout for reads and for `adjust_balance`
    timeout: Duration,

    /// Fractional digits an opening balance may carry
    currency_scale: u32,
}

impl InMemoryAccountStore {
    /// Create an empty store using the default lock timeout
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    /// Create an empty store with a custom lock timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            accounts: DashMap::new(),
            ids: DashMap::new(),
            next_id: AtomicU64::new(1),
            timeout,
            currency_scale: DEFAULT_CURRENCY_SCALE,
        }
    }

    /// Reject opening balances with more than `currency_scale` fractional digits
    pub fn with_currency_scale(mut self, currency_scale: u32) -> Self {
        self.currency_scale = currency_scale;
        self
    }

    fn cell(&self, account_number: &str) -> Result<AccountCell, StoreError> {
        self.accounts
            .get(account_number)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| StoreError::not_found(account_number))
    }

    fn read(&self, account_number: &str, cell: &AccountCell) -> Result<Account, StoreError> {
        cell.try_read_for(self.timeout)
            .map(|account| (*account).clone())
            .ok_or_else(|| StoreError::lock_timeout(account_number, self.timeout))
    }

    /// Check the fields of a new customer and return its opening balance
    fn validate(&self, customer: &NewCustomer) -> Result<Decimal, StoreError> {
        if customer.account_number.trim().is_empty() {
            return Err(StoreError::invalid_customer("the account number can not be empty"));
        }
        if customer.first_name.trim().is_empty() || customer.last_name.trim().is_empty() {
            return Err(StoreError::invalid_customer("the customer name can not be empty"));
        }
        match customer.balance {
            None => Err(StoreError::invalid_customer("the balance can not be null")),
            Some(balance) if balance < Decimal::ZERO => Err(StoreError::invalid_customer(
                format!("the balance can not be negative ({})", balance),
            )),
            Some(balance) if balance.normalize().scale() > self.currency_scale => {
                Err(StoreError::invalid_customer(format!(
                    "the balance can not have more than {} decimal places ({})",
                    self.currency_scale, balance
                )))
            }
            Some(balance) => Ok(balance),
        }
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for InMemoryAccountStore {
    type Guard = InMemoryAccountGuard;

    fn get(&self, account_number: &str) -> Result<Account, StoreError> {
        let cell = self.cell(account_number)?;
        self.read(account_number, &cell)
    }

    fn get_by_id(&self, id: CustomerId) -> Result<Account, StoreError> {
        let account_number = self
            .ids
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::CustomerNotFound { id })?;
        self.get(&account_number)
    }

    fn create(&self, customer: NewCustomer) -> Result<Account, StoreError> {
        let balance = self.validate(&customer)?;

        let account = match self.accounts.entry(customer.account_number.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::DuplicateAccount {
                    account_number: customer.account_number,
                })
            }
            Entry::Vacant(vacant) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let account = customer.into_account(id, balance);
                vacant.insert(Arc::new(RwLock::new(account.clone())));
                account
            }
        };

        self.ids.insert(account.id, account.account_number.clone());
        tracing::debug!(
            id = account.id,
            account_number = %account.account_number,
            balance = %account.balance,
            "account created"
        );
        Ok(account)
    }

    fn list(&self) -> Result<Vec<Account>, StoreError> {
        let mut cells: Vec<(AccountNumber, AccountCell)> = self
            .accounts
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        cells.sort_by(|(a, _), (b, _)| a.cmp(b));

        // Same order as transfer locking; all guards stay held until cloned.
        let guards = cells
            .iter()
            .map(|(account_number, cell)| {
                cell.try_read_arc_for(self.timeout)
                    .ok_or_else(|| StoreError::lock_timeout(account_number, self.timeout))
            })
            .collect::<Result<Vec<AccountReadGuard>, _>>()?;

        let mut accounts: Vec<Account> = guards.iter().map(|guard| (**guard).clone()).collect();
        drop(guards);

        accounts.sort_by_key(|account| account.id);
        Ok(accounts)
    }

    fn lock(&self, account_number: &str, timeout: Duration) -> Result<Self::Guard, StoreError> {
        let cell = self.cell(account_number)?;
        let guard = cell
            .try_write_arc_for(timeout)
            .ok_or_else(|| StoreError::lock_timeout(account_number, timeout))?;
        let staged = guard.balance;
        Ok(InMemoryAccountGuard { guard, staged })
    }

    fn default_timeout(&self) -> Duration {
        self.timeout
    }
}

/// Exclusive access to one account of an `InMemoryAccountStore`
///
/// Holds the account's write lock for its whole lifetime.
pub struct InMemoryAccountGuard {
    guard: AccountWriteGuard,
    staged: Decimal,
}

impl AccountGuard for InMemoryAccountGuard {
    fn account_number(&self) -> &str {
        &self.guard.account_number
    }

    fn balance(&self) -> Decimal {
        self.staged
    }

    fn adjust_balance(&mut self, delta: Decimal) -> Result<Decimal, StoreError> {
        let next = self
            .staged
            .checked_add(delta)
            .ok_or_else(|| StoreError::Overflow {
                account_number: self.guard.account_number.clone(),
            })?;

        if next < Decimal::ZERO {
            return Err(StoreError::ConstraintViolation {
                account_number: self.guard.account_number.clone(),
                balance: self.staged,
                delta,
            });
        }

        self.staged = next;
        Ok(next)
    }

    fn commit(mut self) {
        self.guard.balance = self.staged;
    }
}
