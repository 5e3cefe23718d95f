//! Canonical transaction records produced by an import

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::mode::ImportMode;

/// Placeholder used when a row carries no usable description.
pub const DEFAULT_DESCRIPTION: &str = "Imported transaction";

/// Import channel a transaction came through
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum AccountSource {
    #[default]
    #[serde(rename = "mae-pdf")]
    MaePdf,
}

impl AccountSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountSource::MaePdf => "mae-pdf",
        }
    }
}

/// A normalized statement line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Calendar day in UTC
    pub date: NaiveDate,
    /// Never empty
    pub description: String,
    /// Magnitude only; always >= 0
    pub amount: f64,
    /// Direction of the movement
    pub is_credit: bool,
    pub account_source: AccountSource,
    pub reference: Option<String>,
}

impl Transaction {
    /// Build a transaction, normalizing amount to its magnitude and
    /// substituting the placeholder for a blank description.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        is_credit: bool,
        reference: Option<String>,
    ) -> Self {
        let description = description.into();
        let description = if description.trim().is_empty() {
            DEFAULT_DESCRIPTION.to_string()
        } else {
            description
        };
        Self {
            date,
            description,
            amount: amount.abs(),
            is_credit,
            account_source: AccountSource::MaePdf,
            reference,
        }
    }

    /// Amount with direction folded into the sign: credit positive, debit negative.
    pub fn signed_amount(&self) -> f64 {
        if self.is_credit { self.amount } else { -self.amount }
    }
}

/// Per-file problem the service reported alongside a successful response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialError {
    pub file: String,
    pub error: String,
}

/// Outcome of a successful import
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportResult {
    /// In the order the service returned the rows
    pub transactions: Vec<Transaction>,
    /// Mode that produced the transactions
    pub mode: ImportMode,
    pub import_id: Option<String>,
    /// Rows the mapper could not resolve
    pub skipped_rows: usize,
    pub partial_errors: Vec<PartialError>,
}

impl ImportResult {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn total_credits(&self) -> f64 {
        self.transactions.iter().filter(|t| t.is_credit).map(|t| t.amount).sum()
    }

    pub fn total_debits(&self) -> f64 {
        self.transactions.iter().filter(|t| !t.is_credit).map(|t| t.amount).sum()
    }
}
