//! Request façade over the transfer engine and its collaborators
//!
//! `Ledger` is the entry point used by the processing strategies. Customer
//! operations go straight to the account store, history queries go to the
//! transaction log, and transfers run through the `TransferEngine`.

use std::sync::Arc;

use crate::core::engine::{EngineConfig, TransferEngine};
use crate::core::traits::{AccountStore, TransactionLog};
use crate::core::{InMemoryAccountStore, InMemoryTransactionLog};
use crate::types::{
    Account, CustomerId, NewCustomer, StoreError, TransferError, TransferRecord, TransferRequest,
};

/// Ledger over the in-memory store and log
pub type InMemoryLedger = Ledger<InMemoryAccountStore, InMemoryTransactionLog>;

/// Customer, transfer and history operations over one store and one log
#[derive(Debug)]
pub struct Ledger<S, L> {
    accounts: Arc<S>,
    log: Arc<L>,
    engine: TransferEngine<S, L>,
}

impl<S, L> Clone for Ledger<S, L> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            log: Arc::clone(&self.log),
            engine: self.engine.clone(),
        }
    }
}

impl InMemoryLedger {
    /// Create a ledger over fresh in-memory collaborators
    pub fn in_memory(config: EngineConfig) -> Self {
        let accounts = Arc::new(
            InMemoryAccountStore::with_timeout(config.lock_timeout)
                .with_currency_scale(config.currency_scale),
        );
        let log = Arc::new(InMemoryTransactionLog::with_timeout(config.lock_timeout));
        Self::new(accounts, log, config)
    }
}

impl<S: AccountStore, L: TransactionLog> Ledger<S, L> {
    /// Create a ledger over the given collaborators
    pub fn new(accounts: Arc<S>, log: Arc<L>, config: EngineConfig) -> Self {
        let engine = TransferEngine::new(Arc::clone(&accounts), Arc::clone(&log), config);
        Self {
            accounts,
            log,
            engine,
        }
    }

    /// Open a new customer account
    pub fn create_customer(&self, customer: NewCustomer) -> Result<Account, StoreError> {
        self.accounts.create(customer)
    }

    /// Look up a customer by ID
    pub fn get_customer(&self, id: CustomerId) -> Result<Account, StoreError> {
        self.accounts.get_by_id(id)
    }

    /// Look up a customer by account number
    pub fn get_customer_by_account(&self, account_number: &str) -> Result<Account, StoreError> {
        self.accounts.get(account_number)
    }

    /// Every customer, ordered by ID
    pub fn list_customers(&self) -> Result<Vec<Account>, StoreError> {
        self.accounts.list()
    }

    /// Execute a transfer
    pub fn transfer(&self, request: &TransferRequest) -> Result<TransferRecord, TransferError> {
        self.engine.transfer(request)
    }

    /// Transfers involving the account, oldest first
    ///
    /// Unknown accounts have an empty history.
    pub fn history(&self, account_number: &str) -> Result<Vec<TransferRecord>, StoreError> {
        self.log.find_by_account(account_number)
    }

    /// Underlying transfer engine
    pub fn engine(&self) -> &TransferEngine<S, L> {
        &self.engine
    }
}
