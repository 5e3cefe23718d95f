//! Date rules, tried in order; the first that parses wins.
//!
//! Calendar patterns are shape-checked before parsing so that, for example,
//! `05-03-24` is never read as `yyyy-MM-dd` with year 5.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::RawRow;

pub struct DateRule {
    pub name: &'static str,
    pub parse: fn(&str) -> Option<NaiveDate>,
}

pub const DATE_RULES: &[DateRule] = &[
    DateRule { name: "iso8601-fractional", parse: iso8601_fractional },
    DateRule { name: "iso8601", parse: iso8601 },
    DateRule { name: "naive-timestamp", parse: naive_timestamp },
    DateRule { name: "yyyy-MM-dd", parse: year_month_day },
    DateRule { name: "dd/MM/yy", parse: day_month_short_year },
    DateRule { name: "dd/MM/yyyy", parse: day_month_year },
    DateRule { name: "dd-MM-yy", parse: dashed_day_month_short_year },
    DateRule { name: "dd-MM-yyyy", parse: dashed_day_month_year },
];

static YMD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").expect("yyyy-MM-dd shape pattern to compile")
});
static DMY_SLASH_SHORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}/\d{1,2}/\d{2}$").expect("dd/MM/yy shape pattern to compile")
});
static DMY_SLASH_LONG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").expect("dd/MM/yyyy shape pattern to compile")
});
static DMY_DASH_SHORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}-\d{1,2}-\d{2}$").expect("dd-MM-yy shape pattern to compile")
});
static DMY_DASH_LONG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}$").expect("dd-MM-yyyy shape pattern to compile")
});
static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})$").expect("dd/MM shape pattern to compile")
});

/// Parse a trimmed date string with the ordered rules.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DATE_RULES.iter().find_map(|rule| (rule.parse)(s))
}

/// Resolve a row's date, including `dd/MM` cells paired with a `Year`
/// column (credit card statements print the year once per statement).
pub fn resolve_date(row: &RawRow, raw: &str) -> Option<NaiveDate> {
    parse_date(raw).or_else(|| day_month_with_year(row, raw.trim()))
}

fn has_time_fraction(s: &str) -> bool {
    s.split_once(['T', 't', ' '])
        .map(|(_, time)| time.contains('.'))
        .unwrap_or(false)
}

fn rfc3339_day(s: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

fn iso8601_fractional(s: &str) -> Option<NaiveDate> {
    if !has_time_fraction(s) {
        return None;
    }
    rfc3339_day(s)
}

fn iso8601(s: &str) -> Option<NaiveDate> {
    if has_time_fraction(s) {
        return None;
    }
    rfc3339_day(s)
}

/// `2024-02-01T00:00:00[.fff]` with no offset, read as UTC.
fn naive_timestamp(s: &str) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

fn calendar(s: &str, shape: &Regex, format: &str) -> Option<NaiveDate> {
    if !shape.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, format).ok()
}

fn year_month_day(s: &str) -> Option<NaiveDate> {
    calendar(s, &YMD, "%Y-%m-%d")
}

fn day_month_short_year(s: &str) -> Option<NaiveDate> {
    calendar(s, &DMY_SLASH_SHORT, "%d/%m/%y")
}

fn day_month_year(s: &str) -> Option<NaiveDate> {
    calendar(s, &DMY_SLASH_LONG, "%d/%m/%Y")
}

fn dashed_day_month_short_year(s: &str) -> Option<NaiveDate> {
    calendar(s, &DMY_DASH_SHORT, "%d-%m-%y")
}

fn dashed_day_month_year(s: &str) -> Option<NaiveDate> {
    calendar(s, &DMY_DASH_LONG, "%d-%m-%Y")
}

fn day_month_with_year(row: &RawRow, s: &str) -> Option<NaiveDate> {
    let caps = DAY_MONTH.captures(s)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year = row.number(&["Year"])?;
    if year.fract() != 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year as i32, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawValue;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_variants() {
        assert_eq!(parse_date("2024-02-01T10:15:30.123Z"), Some(ymd(2024, 2, 1)));
        assert_eq!(parse_date("2024-02-01T10:15:30Z"), Some(ymd(2024, 2, 1)));
        // Offset pushes the instant into the previous UTC day
        assert_eq!(parse_date("2024-02-01T01:00:00+08:00"), Some(ymd(2024, 1, 31)));
    }

    #[test]
    fn test_naive_timestamp_from_service() {
        assert_eq!(parse_date("2024-03-05T00:00:00"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("2024-03-05T00:00:00.000"), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_calendar_patterns() {
        assert_eq!(parse_date("2024-02-01"), Some(ymd(2024, 2, 1)));
        assert_eq!(parse_date("01/02/24"), Some(ymd(2024, 2, 1)));
        assert_eq!(parse_date("01/02/2024"), Some(ymd(2024, 2, 1)));
        assert_eq!(parse_date("05-03-24"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("05-03-2024"), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("  05-03-2024 "), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("-"), None);
        assert_eq!(parse_date("31/02/2024"), None);
        assert_eq!(parse_date("Opening Balance"), None);
        assert_eq!(parse_date("07/03"), None);
    }

    #[test]
    fn test_day_month_uses_year_column() {
        let row = RawRow::new()
            .with("Transaction Date", RawValue::Text("07/03".into()))
            .with("Year", RawValue::Integer(2024));
        assert_eq!(resolve_date(&row, "07/03"), Some(ymd(2024, 3, 7)));

        let no_year = RawRow::new().with("Transaction Date", RawValue::Text("07/03".into()));
        assert_eq!(resolve_date(&no_year, "07/03"), None);
    }

    #[test]
    fn test_rule_order_is_stable() {
        let names: Vec<&str> = DATE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec![
                "iso8601-fractional",
                "iso8601",
                "naive-timestamp",
                "yyyy-MM-dd",
                "dd/MM/yy",
                "dd/MM/yyyy",
                "dd-MM-yy",
                "dd-MM-yyyy"
            ]
        );
    }
}
