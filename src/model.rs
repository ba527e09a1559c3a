//! Decoded statement records.
//!
//! Codes (bank, branch, account number, currency) are kept as strings because
//! their leading zeros are significant.

use crate::account::Account;
use crate::amount::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A decoded Norma 43 file: one or more account statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Accounts in the order their header lines appeared
    pub accounts: Vec<Account>,

    /// Record count declared by the end-of-file line (`None` if the input
    /// ended without one)
    pub reported_entries: Option<u64>,
}

impl Document {
    /// Total number of retained movements across all accounts.
    pub fn movement_count(&self) -> usize {
        self.accounts.iter().map(|a| a.movements.len()).sum()
    }
}

/// Record 11: opens an account statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub bank_code: String,
    pub branch_code: String,
    pub account_number: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_balance: Amount,
    pub currency: String,
    pub information_mode: String,
    pub account_name: String,
}

/// Record 22 plus its record 23 continuation lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub branch_code: String,
    pub transaction_date: NaiveDate,
    pub value_date: NaiveDate,

    /// Signed amount: credits positive, debits negative
    pub amount: Amount,

    /// Account balance after this movement. Not present in the file; computed
    /// from the header's initial balance and the preceding retained movements.
    pub balance: Amount,

    pub description: String,

    /// Continuation-line payloads, in input order
    pub extra_information: Vec<String>,
}

/// Record 33: closes an account statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footer {
    pub bank_code: String,
    pub branch_code: String,
    pub account_number: String,
    pub debit_entries: u32,
    pub debit_amount: Amount,
    pub credit_entries: u32,

    /// Read as whole units, unlike every other amount in the file
    pub credit_amount: Amount,

    pub final_balance: Amount,
    pub currency: String,
}
