//! Account-related types for the ledger
//!
//! This module defines the customer Account structure and the input used
//! to open a new one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Customer identifier, assigned by the account store on creation
pub type CustomerId = u64;

/// Account number, unique per customer
pub type AccountNumber = String;

/// Customer account state
///
/// Represents a customer's identity together with the current balance.
/// The balance is only ever changed by the transfer engine through the
/// account store's `adjust_balance` path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned customer ID
    pub id: CustomerId,

    /// Customer first name
    pub first_name: String,

    /// Customer last name
    pub last_name: String,

    /// Unique account number used to address transfers
    pub account_number: AccountNumber,

    /// Current balance
    ///
    /// Never negative once a transfer has been committed.
    pub balance: Decimal,
}

/// Data needed to open a customer account
///
/// The opening balance is optional here so that a missing value can be
/// rejected explicitly by the store rather than defaulted to zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub account_number: AccountNumber,
    pub balance: Option<Decimal>,
}

impl NewCustomer {
    /// Create a new customer with an opening balance
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        account_number: impl Into<AccountNumber>,
        balance: Decimal,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            account_number: account_number.into(),
            balance: Some(balance),
        }
    }

    /// Attach the store-assigned ID, producing the stored account
    pub(crate) fn into_account(self, id: CustomerId, balance: Decimal) -> Account {
        Account {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            account_number: self.account_number,
            balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_customer_into_account() {
        let customer = NewCustomer::new("Ada", "Lovelace", "ACC-1", Decimal::new(10000, 2));

        let account = customer.into_account(7, Decimal::new(10000, 2));

        assert_eq!(account.id, 7);
        assert_eq!(account.first_name, "Ada");
        assert_eq!(account.last_name, "Lovelace");
        assert_eq!(account.account_number, "ACC-1");
        assert_eq!(account.balance, Decimal::new(10000, 2));
    }
}
