//! Transfer execution against an account store and a transaction log
//!
//! This module provides the `TransferEngine` struct, which validates a
//! transfer request and applies it as one atomic unit.
//!
//! # Architecture
//!
//! ```text
//! TransferEngine
//!     ├── Arc<S: AccountStore>    (balances, per-account exclusive access)
//!     ├── Arc<L: TransactionLog>  (append-only transfer records)
//!     └── EngineConfig            (lock timeout, currency scale)
//! ```
//!
//! # Atomic Unit
//!
//! Both accounts are locked in ascending account-number order, whichever side
//! is the sender. With both guards held the engine re-checks the sender
//! balance, stages the debit and the credit, appends the record, and only then
//! commits the two guards. Any failure before the commit drops the guards,
//! which discards the staged balances, so a rejected or aborted transfer
//! leaves no trace.
//!
//! The record is published to the log before the guards commit, so a history
//! query can return it while both accounts are still locked. Balance reads of
//! either account wait for the guards, so once a record is visible the
//! balances read next already include it.

use crate::core::traits::{AccountGuard, AccountStore, TransactionLog};
use crate::types::{
    Account, Party, PendingTransfer, StoreError, TransferError, TransferRecord, TransferRequest,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

/// Default time to wait for exclusive access to an account
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of fractional digits in the ledger currency
pub const DEFAULT_CURRENCY_SCALE: u32 = 2;

/// Largest scale a `Decimal` can carry
const MAX_CURRENCY_SCALE: u32 = 28;

/// Configuration for the transfer engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum wait for each account lock
    pub lock_timeout: Duration,
    /// Fractional digits an amount may carry
    pub currency_scale: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            currency_scale: DEFAULT_CURRENCY_SCALE,
        }
    }
}

impl EngineConfig {
    /// Create an EngineConfig, falling back to defaults for invalid values
    pub fn new(lock_timeout: Duration, currency_scale: u32) -> Self {
        let default = Self::default();

        let lock_timeout = if lock_timeout.is_zero() {
            tracing::warn!(
                default = ?default.lock_timeout,
                "Invalid lock_timeout (0), using default"
            );
            default.lock_timeout
        } else {
            lock_timeout
        };

        let currency_scale = if currency_scale > MAX_CURRENCY_SCALE {
            tracing::warn!(
                currency_scale,
                default = default.currency_scale,
                "Invalid currency_scale, using default"
            );
            default.currency_scale
        } else {
            currency_scale
        };

        Self {
            lock_timeout,
            currency_scale,
        }
    }
}

/// Executes transfers between accounts
///
/// Cheap to clone; clones share the same store and log and can be used from
/// many threads at once.
#[derive(Debug)]
pub struct TransferEngine<S, L> {
    accounts: Arc<S>,
    log: Arc<L>,
    config: EngineConfig,
}

impl<S, L> Clone for TransferEngine<S, L> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            log: Arc::clone(&self.log),
            config: self.config.clone(),
        }
    }
}

impl<S: AccountStore, L: TransactionLog> TransferEngine<S, L> {
    /// Create a new TransferEngine over the given collaborators
    pub fn new(accounts: Arc<S>, log: Arc<L>, config: EngineConfig) -> Self {
        Self {
            accounts,
            log,
            config,
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Move `request.amount` from the sender to the receiver
    ///
    /// Checks run in a fixed order and the first failure wins:
    /// 1. amount missing, not positive, or finer than the currency scale
    /// 2. sender does not resolve
    /// 3. receiver does not resolve
    /// 4. sender and receiver are the same account
    /// 5. sender balance below the amount
    ///
    /// # Returns
    ///
    /// * `Ok(TransferRecord)` - debit, credit and record are all committed
    /// * `Err(TransferError)` - nothing was changed
    pub fn transfer(&self, request: &TransferRequest) -> Result<TransferRecord, TransferError> {
        let result = self.try_transfer(request);

        match &result {
            Ok(record) => tracing::info!(
                id = record.id,
                sender = %record.sender_account_number,
                receiver = %record.receiver_account_number,
                amount = %record.amount,
                "transfer committed"
            ),
            Err(e @ TransferError::TransferAborted { .. }) => tracing::error!(
                sender = %request.sender_account_number,
                receiver = %request.receiver_account_number,
                error = %e,
                "transfer aborted"
            ),
            Err(e) => tracing::warn!(
                sender = %request.sender_account_number,
                receiver = %request.receiver_account_number,
                kind = e.kind(),
                error = %e,
                "transfer rejected"
            ),
        }

        result
    }

    fn try_transfer(&self, request: &TransferRequest) -> Result<TransferRecord, TransferError> {
        let amount = self.validate_amount(request.amount)?;
        let sender = self.resolve(Party::Sender, &request.sender_account_number)?;
        let receiver = self.resolve(Party::Receiver, &request.receiver_account_number)?;

        if sender.account_number == receiver.account_number {
            return Err(TransferError::same_account(&sender.account_number));
        }

        if sender.balance < amount {
            return Err(TransferError::insufficient_funds(
                &sender.account_number,
                sender.balance,
                amount,
            ));
        }

        self.execute(&sender.account_number, &receiver.account_number, amount)
    }

    /// Reject missing, non-positive, or over-precise amounts
    fn validate_amount(&self, amount: Option<Decimal>) -> Result<Decimal, TransferError> {
        match amount {
            Some(value)
                if value > Decimal::ZERO
                    && value.normalize().scale() <= self.config.currency_scale =>
            {
                Ok(value)
            }
            other => Err(TransferError::invalid_amount(other)),
        }
    }

    fn resolve(&self, side: Party, account_number: &str) -> Result<Account, TransferError> {
        if account_number.trim().is_empty() {
            return Err(TransferError::account_not_found(side, account_number));
        }

        self.accounts.get(account_number).map_err(|e| match e {
            StoreError::NotFound { .. } => TransferError::account_not_found(side, account_number),
            other => TransferError::aborted(other),
        })
    }

    /// Apply a validated transfer as one atomic unit
    fn execute(
        &self,
        sender: &str,
        receiver: &str,
        amount: Decimal,
    ) -> Result<TransferRecord, TransferError> {
        let timeout = self.config.lock_timeout;

        // Fixed global order, independent of direction.
        let (first, second) = if sender < receiver {
            (sender, receiver)
        } else {
            (receiver, sender)
        };
        let first_guard = self.lock(first, timeout)?;
        let second_guard = self.lock(second, timeout)?;
        let (mut debit, mut credit) = if first == sender {
            (first_guard, second_guard)
        } else {
            (second_guard, first_guard)
        };

        // The balance may have moved between validation and locking.
        if debit.balance() < amount {
            return Err(TransferError::insufficient_funds(
                sender,
                debit.balance(),
                amount,
            ));
        }

        debit
            .adjust_balance(-amount)
            .map_err(|e| Self::classify_adjustment(e, sender, amount))?;
        credit
            .adjust_balance(amount)
            .map_err(|e| Self::classify_adjustment(e, receiver, amount))?;

        // Commit is infallible, so the append is the last step that can fail.
        let record = self
            .log
            .append(PendingTransfer {
                sender_account_number: sender.to_string(),
                receiver_account_number: receiver.to_string(),
                amount,
            })
            .map_err(TransferError::aborted)?;

        debit.commit();
        credit.commit();

        Ok(record)
    }

    fn lock(&self, account_number: &str, timeout: Duration) -> Result<S::Guard, TransferError> {
        self.accounts
            .lock(account_number, timeout)
            .map_err(TransferError::aborted)
    }

    fn classify_adjustment(error: StoreError, account_number: &str, amount: Decimal) -> TransferError {
        match error {
            StoreError::ConstraintViolation { balance, .. } => {
                TransferError::insufficient_funds(account_number, balance, amount)
            }
            other => TransferError::aborted(other),
        }
    }
}
