//! Amount and direction rules.
//!
//! Rules run in order. A rule either resolves the row, declares itself not
//! applicable (next rule runs), or rejects the row outright.

use crate::lookup::parse_decimal;
use crate::types::RawRow;

pub const AMOUNT_ALIASES: &[&str] = &["Transaction Amount", "Amount", "amount"];
pub const FLOW_ALIASES: &[&str] = &["flow", "output"];
pub const CREDIT_FLAG_ALIASES: &[&str] = &["isCredit"];
pub const LOWERCASE_AMOUNT_ALIASES: &[&str] = &["amount"];
pub const CREDIT_COLUMN_ALIASES: &[&str] = &["Amount (CR)"];
pub const DEBIT_COLUMN_ALIASES: &[&str] = &["Amount (DR)"];

const CREDIT_WORDS: &[&str] = &["inflow", "deposit", "credit"];
const DEBIT_WORDS: &[&str] = &["outflow", "withdrawal", "debit"];

/// A resolved amount. `amount` is a magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Money {
    pub amount: f64,
    pub is_credit: bool,
}

impl Money {
    fn new(amount: f64, is_credit: bool) -> Self {
        Self {
            amount: amount.abs(),
            is_credit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleOutcome {
    Resolved(Money),
    NotApplicable,
    Reject,
}

pub struct AmountRule {
    pub name: &'static str,
    pub apply: fn(&RawRow) -> RuleOutcome,
}

pub const AMOUNT_RULES: &[AmountRule] = &[
    AmountRule { name: "positive-number", apply: positive_number },
    AmountRule { name: "signed-text", apply: signed_text },
    AmountRule { name: "amount-with-flag", apply: amount_with_flag },
    AmountRule { name: "cr-dr-columns", apply: cr_dr_columns },
];

/// Run the rule chain. `None` means the row must be dropped.
pub fn resolve_amount(row: &RawRow) -> Option<Money> {
    for rule in AMOUNT_RULES {
        match (rule.apply)(row) {
            RuleOutcome::Resolved(money) => return Some(money),
            RuleOutcome::Reject => {
                tracing::trace!(rule = rule.name, "amount rule rejected row");
                return None;
            }
            RuleOutcome::NotApplicable => {}
        }
    }
    None
}

/// Direction from a textual flow hint. Unrecognised hints give `None`.
pub fn flow_direction(row: &RawRow) -> Option<bool> {
    let hint = row.text(FLOW_ALIASES)?.to_lowercase();
    if CREDIT_WORDS.iter().any(|w| hint.contains(w)) {
        Some(true)
    } else if DEBIT_WORDS.iter().any(|w| hint.contains(w)) {
        Some(false)
    } else {
        None
    }
}

pub fn credit_flag(row: &RawRow) -> Option<bool> {
    row.flag(CREDIT_FLAG_ALIASES)
}

/// Flow hint, then the boolean flag, then debit.
fn row_direction(row: &RawRow) -> bool {
    flow_direction(row)
        .or_else(|| credit_flag(row))
        .unwrap_or(false)
}

fn positive_number(row: &RawRow) -> RuleOutcome {
    match row.number(AMOUNT_ALIASES) {
        Some(n) if n > 0.0 => RuleOutcome::Resolved(Money::new(n, row_direction(row))),
        _ => RuleOutcome::NotApplicable,
    }
}

/// Amount printed as text with an optional trailing `+`/`-`, e.g. `1,234.50-`.
/// The trailing sign beats every other direction hint.
fn signed_text(row: &RawRow) -> RuleOutcome {
    let Some(raw) = row.text(AMOUNT_ALIASES) else {
        return RuleOutcome::NotApplicable;
    };
    let trimmed = raw.trim();
    let sign = match trimmed.chars().last() {
        Some('+') => Some(true),
        Some('-') => Some(false),
        _ => None,
    };
    let digits = trimmed.trim_end_matches(['+', '-']);
    let Some(value) = parse_decimal(digits) else {
        return RuleOutcome::Reject;
    };
    let is_credit = sign.unwrap_or_else(|| row_direction(row));
    RuleOutcome::Resolved(Money::new(value, is_credit))
}

fn amount_with_flag(row: &RawRow) -> RuleOutcome {
    match (row.number(LOWERCASE_AMOUNT_ALIASES), credit_flag(row)) {
        (Some(n), Some(is_credit)) => RuleOutcome::Resolved(Money::new(n, is_credit)),
        _ => RuleOutcome::NotApplicable,
    }
}

fn cr_dr_columns(row: &RawRow) -> RuleOutcome {
    if let Some(n) = row.number(CREDIT_COLUMN_ALIASES).filter(|n| *n > 0.0) {
        return RuleOutcome::Resolved(Money::new(n, true));
    }
    if let Some(n) = row.number(DEBIT_COLUMN_ALIASES).filter(|n| *n > 0.0) {
        return RuleOutcome::Resolved(Money::new(n, false));
    }
    RuleOutcome::NotApplicable
}
