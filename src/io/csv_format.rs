//! CSV format handling for customers, transfer requests and ledger output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Raw record structures for deserialization
//! - Conversion from raw records to domain types (`FromCsvRecord`)
//! - Account and history output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{Account, NewCustomer, TransferRecord, TransferRequest};
use chrono::SecondsFormat;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// A domain type that can be built from one CSV row
pub trait FromCsvRecord: Sized {
    /// Raw row as deserialized by the csv crate
    type Record: DeserializeOwned;

    /// Convert a raw row, describing the problem on failure
    fn from_csv_record(record: Self::Record) -> Result<Self, String>;
}

/// Customer row: `first_name,last_name,account_number,balance`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CustomerCsvRecord {
    pub first_name: String,
    pub last_name: String,
    pub account_number: String,
    pub balance: Option<String>,
}

/// Transfer row: `sender,receiver,amount`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransferCsvRecord {
    pub sender: String,
    pub receiver: String,
    pub amount: Option<String>,
}

/// Parse an optional decimal column
///
/// Empty or whitespace-only values are treated as missing.
fn parse_decimal(field: &str, value: Option<String>) -> Result<Option<Decimal>, String> {
    match value {
        Some(raw) if !raw.trim().is_empty() => Decimal::from_str(raw.trim())
            .map(Some)
            .map_err(|_| format!("Invalid {} '{}'", field, raw)),
        _ => Ok(None),
    }
}

impl FromCsvRecord for NewCustomer {
    type Record = CustomerCsvRecord;

    fn from_csv_record(record: CustomerCsvRecord) -> Result<Self, String> {
        let balance = parse_decimal("balance", record.balance)
            .map_err(|e| format!("{} for account {}", e, record.account_number))?;

        Ok(NewCustomer {
            first_name: record.first_name,
            last_name: record.last_name,
            account_number: record.account_number,
            balance,
        })
    }
}

impl FromCsvRecord for TransferRequest {
    type Record = TransferCsvRecord;

    fn from_csv_record(record: TransferCsvRecord) -> Result<Self, String> {
        let amount = parse_decimal("amount", record.amount).map_err(|e| {
            format!(
                "{} for transfer {} -> {}",
                e, record.sender, record.receiver
            )
        })?;

        Ok(TransferRequest {
            sender_account_number: record.sender,
            receiver_account_number: record.receiver,
            amount,
        })
    }
}

/// Render a decimal padded to `scale` fractional digits
///
/// Values carrying more digits than `scale` are printed in full, never
/// rounded.
fn format_amount(value: Decimal, scale: u32) -> String {
    let digits = scale.max(value.normalize().scale());
    format!("{:.*}", digits as usize, value)
}

/// Write account states to CSV format
///
/// Writes accounts with columns: id, first_name, last_name, account_number, balance.
/// Accounts are sorted by customer ID and balances are printed with
/// at least `scale` fractional digits.
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_accounts_csv(
    accounts: &[Account],
    scale: u32,
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["id", "first_name", "last_name", "account_number", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by_key(|account| account.id);

    for account in sorted_accounts {
        writer
            .write_record(&[
                account.id.to_string(),
                account.first_name,
                account.last_name,
                account.account_number,
                format_amount(account.balance, scale),
            ])
            .map_err(|e| format!("Failed to write account record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write transfer records to CSV format
///
/// Columns: id, sender, receiver, amount, timestamp (RFC 3339, microseconds).
/// Records are written in the order given.
pub fn write_history_csv(
    records: &[TransferRecord],
    scale: u32,
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["id", "sender", "receiver", "amount", "timestamp"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for record in records {
        writer
            .write_record(&[
                record.id.to_string(),
                record.sender_account_number.clone(),
                record.receiver_account_number.clone(),
                format_amount(record.amount, scale),
                record.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            ])
            .map_err(|e| format!("Failed to write transfer record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn transfer_row(amount: Option<&str>) -> TransferCsvRecord {
        TransferCsvRecord {
            sender: "A".to_string(),
            receiver: "B".to_string(),
            amount: amount.map(|s| s.to_string()),
        }
    }

    #[rstest]
    #[case::plain(Some("30"), Some(Decimal::new(30, 0)))]
    #[case::two_places(Some("12.50"), Some(Decimal::new(1250, 2)))]
    #[case::whitespace(Some("  7.5  "), Some(Decimal::new(75, 1)))]
    #[case::negative(Some("-3"), Some(Decimal::new(-3, 0)))]
    #[case::empty(Some(""), None)]
    #[case::missing(None, None)]
    fn test_transfer_row_amount_parsing(
        #[case] amount: Option<&str>,
        #[case] expected: Option<Decimal>,
    ) {
        let request = TransferRequest::from_csv_record(transfer_row(amount)).unwrap();

        assert_eq!(request.sender_account_number, "A");
        assert_eq!(request.receiver_account_number, "B");
        assert_eq!(request.amount, expected);
    }

    #[test]
    fn test_transfer_row_invalid_amount() {
        let result = TransferRequest::from_csv_record(transfer_row(Some("ten")));

        let error = result.unwrap_err();
        assert!(error.contains("Invalid amount 'ten'"));
        assert!(error.contains("A -> B"));
    }

    #[rstest]
    #[case::present(Some("100.00"), Some(Decimal::new(10000, 2)))]
    #[case::missing(None, None)]
    fn test_customer_row_conversion(
        #[case] balance: Option<&str>,
        #[case] expected: Option<Decimal>,
    ) {
        let row = CustomerCsvRecord {
            first_name: "Ana".to_string(),
            last_name: "Gomez".to_string(),
            account_number: "ACC-1".to_string(),
            balance: balance.map(|s| s.to_string()),
        };

        let customer = NewCustomer::from_csv_record(row).unwrap();

        assert_eq!(customer.first_name, "Ana");
        assert_eq!(customer.account_number, "ACC-1");
        assert_eq!(customer.balance, expected);
    }

    #[test]
    fn test_customer_row_invalid_balance() {
        let row = CustomerCsvRecord {
            first_name: "Ana".to_string(),
            last_name: "Gomez".to_string(),
            account_number: "ACC-1".to_string(),
            balance: Some("lots".to_string()),
        };

        let error = NewCustomer::from_csv_record(row).unwrap_err();
        assert!(error.contains("Invalid balance 'lots' for account ACC-1"));
    }

    fn account(id: u64, number: &str, balance: Decimal) -> Account {
        Account {
            id,
            first_name: "Ana".to_string(),
            last_name: "Gomez".to_string(),
            account_number: number.to_string(),
            balance,
        }
    }

    #[rstest]
    #[case::single_account(
        vec![account(1, "A", Decimal::new(70, 0))],
        "id,first_name,last_name,account_number,balance\n1,Ana,Gomez,A,70.00\n"
    )]
    #[case::sorted_by_id(
        vec![account(2, "B", Decimal::new(805, 1)), account(1, "A", Decimal::ZERO)],
        "id,first_name,last_name,account_number,balance\n1,Ana,Gomez,A,0.00\n2,Ana,Gomez,B,80.50\n"
    )]
    #[case::finer_than_scale_is_not_rounded(
        vec![account(1, "A", Decimal::new(5, 3))],
        "id,first_name,last_name,account_number,balance\n1,Ana,Gomez,A,0.005\n"
    )]
    #[case::trailing_zeros_trimmed_to_scale(
        vec![account(1, "A", Decimal::new(70_000, 3))],
        "id,first_name,last_name,account_number,balance\n1,Ana,Gomez,A,70.00\n"
    )]
    #[case::empty_accounts(
        vec![],
        "id,first_name,last_name,account_number,balance\n"
    )]
    fn test_write_accounts_csv(#[case] accounts: Vec<Account>, #[case] expected_output: &str) {
        let mut output = Vec::new();
        let result = write_accounts_csv(&accounts, 2, &mut output);
        assert!(result.is_ok());

        let output_str = String::from_utf8(output).unwrap();
        assert_eq!(output_str, expected_output);
    }

    #[test]
    fn test_write_history_csv() {
        let records = vec![TransferRecord {
            id: 1,
            sender_account_number: "A".to_string(),
            receiver_account_number: "B".to_string(),
            amount: Decimal::new(30, 0),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }];

        let mut output = Vec::new();
        write_history_csv(&records, 2, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,sender,receiver,amount,timestamp\n1,A,B,30.00,2024-05-01T12:00:00.000000Z\n"
        );
    }
}
