//! Alias lookup over untyped rows.
//!
//! Every field is located by trying a priority-ordered alias list against
//! the row's keys with exact matching first. Only when no alias yields a
//! usable value is a lower-cased view of the row built (last value wins on
//! key collision) and the same aliases retried lower-cased.

use std::collections::HashMap;

use crate::types::{RawRow, RawValue};

impl RawRow {
    /// First alias whose value `extract` accepts.
    pub fn find<T>(&self, aliases: &[&str], extract: impl Fn(&RawValue) -> Option<T>) -> Option<T> {
        let exact = aliases
            .iter()
            .find_map(|alias| self.get(alias).and_then(&extract));
        if exact.is_some() {
            return exact;
        }

        let folded = self.folded();
        aliases
            .iter()
            .find_map(|alias| folded.get(alias.to_lowercase().as_str()).and_then(|v| extract(*v)))
    }

    /// First string value across `aliases`.
    pub fn text(&self, aliases: &[&str]) -> Option<String> {
        self.find(aliases, as_text)
    }

    /// First string value that is not blank, returned trimmed.
    pub fn non_blank_text(&self, aliases: &[&str]) -> Option<String> {
        self.find(aliases, |v| {
            as_text(v)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
    }

    /// First numeric value: integers, floats, or strings that parse once
    /// thousands separators are removed.
    pub fn number(&self, aliases: &[&str]) -> Option<f64> {
        self.find(aliases, as_number)
    }

    /// First boolean value.
    pub fn flag(&self, aliases: &[&str]) -> Option<bool> {
        self.find(aliases, |v| match v {
            RawValue::Bool(b) => Some(*b),
            _ => None,
        })
    }

    fn folded(&self) -> HashMap<String, &RawValue> {
        let mut out = HashMap::with_capacity(self.len());
        for (key, value) in self.iter() {
            out.insert(key.to_lowercase(), value);
        }
        out
    }
}

fn as_text(value: &RawValue) -> Option<String> {
    match value {
        RawValue::Text(s) => Some(s.clone()),
        _ => None,
    }
}

fn as_number(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Integer(i) => Some(*i as f64),
        RawValue::Float(f) if f.is_finite() => Some(*f),
        RawValue::Text(s) => parse_decimal(s),
        _ => None,
    }
}

/// Parse a decimal string after stripping thousands separators.
/// Rejects NaN and infinities, which `f64::from_str` would otherwise accept.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let cleaned = s.replace(',', "");
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}
