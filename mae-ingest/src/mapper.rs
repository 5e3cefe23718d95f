//! Row mapper: one loosely-typed service row in, at most one transaction out.
//!
//! Steps run in a fixed order (date, amount/direction, description,
//! reference); a row is dropped at the first required field that cannot be
//! resolved. Mapping never fails loudly and holds no state between rows.

use mae_core::Transaction;
use mae_core::transaction::DEFAULT_DESCRIPTION;

use crate::rules::{resolve_amount, resolve_date};
use crate::types::RawRow;

pub const DATE_ALIASES: &[&str] = &[
    "date",
    "Date",
    "Entry Date",
    "Transaction Date",
    "Posting Date",
];

pub const DESCRIPTION_ALIASES: &[&str] = &[
    "Transaction Description",
    "description",
    "Description",
    "Transaction Description2",
    "Transaction Type/Description",
    "Transaction Type",
];

pub const REFERENCE_ALIASES: &[&str] = &["Recipient Reference", "reference", "RefNum"];

/// Transactions mapped from a batch of rows, plus how many rows were dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappedRows {
    pub transactions: Vec<Transaction>,
    pub skipped: usize,
}

/// Map one row, or `None` when a required field can't be resolved.
pub fn map_row(row: &RawRow) -> Option<Transaction> {
    let raw_date = row.text(DATE_ALIASES)?;
    if raw_date.trim().is_empty() {
        return None;
    }
    let date = resolve_date(row, &raw_date)?;

    let money = resolve_amount(row)?;

    let description = row
        .non_blank_text(DESCRIPTION_ALIASES)
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

    let reference = row.non_blank_text(REFERENCE_ALIASES);

    Some(Transaction::new(
        date,
        description,
        money.amount,
        money.is_credit,
        reference,
    ))
}

/// Map rows in order, dropping the ones that don't resolve.
pub fn map_rows<'a>(rows: impl IntoIterator<Item = &'a RawRow>) -> MappedRows {
    let mut out = MappedRows::default();
    for (index, row) in rows.into_iter().enumerate() {
        match map_row(row) {
            Some(txn) => out.transactions.push(txn),
            None => {
                tracing::debug!(index, fields = row.len(), "dropping unmappable row");
                out.skipped += 1;
            }
        }
    }
    out
}
