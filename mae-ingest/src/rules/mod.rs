//! Field rules: ordered, individually testable steps the mapper runs.

pub mod amount;
pub mod date;

pub use amount::{AMOUNT_RULES, Money, resolve_amount};
pub use date::{DATE_RULES, parse_date, resolve_date};
