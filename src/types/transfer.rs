//! Transfer-related types for the ledger
//!
//! This module defines the inbound transfer request, the validated transfer
//! handed to the transaction log, and the immutable record the log returns.

use super::account::AccountNumber;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transfer record identifier
///
/// Assigned by the transaction log, strictly increasing in commit order.
pub type TransferId = u64;

/// Inbound request to move money between two accounts
///
/// The amount is optional so that a missing amount can be reported as
/// `InvalidAmount` instead of failing earlier during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Account number to debit
    pub sender_account_number: AccountNumber,

    /// Account number to credit
    pub receiver_account_number: AccountNumber,

    /// Amount to move, exact at the ledger's currency scale
    pub amount: Option<Decimal>,
}

impl TransferRequest {
    /// Create a request with an amount
    pub fn new(
        sender: impl Into<AccountNumber>,
        receiver: impl Into<AccountNumber>,
        amount: Decimal,
    ) -> Self {
        Self {
            sender_account_number: sender.into(),
            receiver_account_number: receiver.into(),
            amount: Some(amount),
        }
    }
}

/// A validated transfer about to be appended to the transaction log
///
/// Carries everything except the log-assigned id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransfer {
    pub sender_account_number: AccountNumber,
    pub receiver_account_number: AccountNumber,
    pub amount: Decimal,
}

/// Immutable proof of a committed transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Log-assigned id
    pub id: TransferId,

    /// Debited account
    pub sender_account_number: AccountNumber,

    /// Credited account
    pub receiver_account_number: AccountNumber,

    /// Amount moved (always positive)
    pub amount: Decimal,

    /// Commit time, strictly increasing across records
    pub timestamp: DateTime<Utc>,
}

impl TransferRecord {
    /// Whether the given account took part in this transfer
    pub fn involves(&self, account_number: &str) -> bool {
        self.sender_account_number == account_number
            || self.receiver_account_number == account_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::sender("A", true)]
    #[case::receiver("B", true)]
    #[case::unrelated("C", false)]
    fn test_record_involves(#[case] account: &str, #[case] expected: bool) {
        let record = TransferRecord {
            id: 1,
            sender_account_number: "A".to_string(),
            receiver_account_number: "B".to_string(),
            amount: Decimal::new(3000, 2),
            timestamp: Utc::now(),
        };

        assert_eq!(record.involves(account), expected);
    }

    #[test]
    fn test_request_new_sets_amount() {
        let request = TransferRequest::new("A", "B", Decimal::new(10, 0));

        assert_eq!(request.sender_account_number, "A");
        assert_eq!(request.receiver_account_number, "B");
        assert_eq!(request.amount, Some(Decimal::new(10, 0)));
    }
}
