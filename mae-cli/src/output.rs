//! Rendering an import result to stdout.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

use mae_core::{ImportResult, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
    Csv,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    description: &'a str,
    amount: String,
    direction: &'static str,
    account_source: &'static str,
    reference: &'a str,
}

impl<'a> From<&'a Transaction> for CsvRow<'a> {
    fn from(t: &'a Transaction) -> Self {
        Self {
            date: t.date.format("%Y-%m-%d").to_string(),
            description: &t.description,
            amount: format!("{:.2}", t.amount),
            direction: direction(t),
            account_source: t.account_source.as_str(),
            reference: t.reference.as_deref().unwrap_or(""),
        }
    }
}

fn direction(t: &Transaction) -> &'static str {
    if t.is_credit { "CR" } else { "DR" }
}

pub fn render(result: &ImportResult, format: Format, out: &mut impl Write) -> Result<()> {
    match format {
        Format::Table => render_table(result, out),
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, result).context("serialize result")?;
            writeln!(out)?;
            Ok(())
        }
        Format::Csv => render_csv(result, out),
    }
}

fn render_csv(result: &ImportResult, out: &mut impl Write) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    for t in &result.transactions {
        w.serialize(CsvRow::from(t)).context("write csv row")?;
    }
    w.flush()?;
    Ok(())
}

fn render_table(result: &ImportResult, out: &mut impl Write) -> Result<()> {
    let width = result
        .transactions
        .iter()
        .map(|t| t.description.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(11, 48);

    writeln!(out, "{:<10}  {:<width$}  {:>12}  {:<2}  REFERENCE", "DATE", "DESCRIPTION", "AMOUNT", "")?;
    for t in &result.transactions {
        writeln!(
            out,
            "{:<10}  {:<width$}  {:>12.2}  {:<2}  {}",
            t.date.format("%Y-%m-%d"),
            truncate(&t.description, width),
            t.amount,
            direction(t),
            t.reference.as_deref().unwrap_or("-"),
        )?;
    }

    writeln!(
        out,
        "\n{} transactions via {} (credits {:.2}, debits {:.2}, skipped rows {})",
        result.len(),
        result.mode,
        result.total_credits(),
        result.total_debits(),
        result.skipped_rows,
    )?;
    if let Some(id) = &result.import_id {
        writeln!(out, "import id: {id}")?;
    }
    for e in &result.partial_errors {
        writeln!(out, "warning: {}: {}", e.file, e.error)?;
    }
    Ok(())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
