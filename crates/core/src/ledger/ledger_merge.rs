//! Two-column `date,pnl` ledger reconciliation.
//!
//! A baseline ledger uploaded by the user is merged with the journal's per-day
//! values. Rows are keyed by date, so every date appears exactly once and the
//! emitted text is always sorted ascending. Only the first two columns of each
//! row survive a merge.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use log::warn;

use crate::constants::LEDGER_HEADER;
use crate::utils::time_utils::format_journal_date;

/// A parsed ledger: the header line plus one value per date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    header: String,
    rows: BTreeMap<String, String>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            header: LEDGER_HEADER.to_string(),
            rows: BTreeMap::new(),
        }
    }
}

impl Ledger {
    /// Parses ledger text.
    ///
    /// Blank lines are ignored. When the first line has both a `date` and a `pnl`
    /// field (case-insensitive) it is kept verbatim as the header; otherwise the
    /// header `date,pnl` is synthesized and every line is data. A later row for
    /// the same date replaces an earlier one.
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        let (header, data) = match lines.split_first() {
            Some((first, rest)) if is_ledger_header(first) => ((*first).to_string(), rest),
            _ => (LEDGER_HEADER.to_string(), lines.as_slice()),
        };
        Self {
            header,
            rows: parse_rows(data),
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    /// Value recorded for `date`, if any.
    pub fn get(&self, date: &str) -> Option<&str> {
        self.rows.get(date).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sets the value for `date`, overwriting whatever the ledger had.
    pub fn set(&mut self, date: NaiveDate, pnl: i64) {
        self.rows.insert(format_journal_date(date), pnl.to_string());
    }

    /// Header, then `date,value` rows sorted by date, newline-terminated.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.header.len() + 1 + self.rows.len() * 20);
        out.push_str(&self.header);
        out.push('\n');
        for (date, value) in &self.rows {
            out.push_str(date);
            out.push(',');
            out.push_str(value);
            out.push('\n');
        }
        out
    }
}

/// True when the comma-separated fields contain both `date` and `pnl`.
fn is_ledger_header(line: &str) -> bool {
    let fields: Vec<String> = line
        .split(',')
        .map(|f| f.trim().to_ascii_lowercase())
        .collect();
    fields.iter().any(|f| f == "date") && fields.iter().any(|f| f == "pnl")
}

fn parse_rows(lines: &[&str]) -> BTreeMap<String, String> {
    let mut rows = BTreeMap::new();
    if lines.is_empty() {
        return rows;
    }

    let joined = lines.join("\n");
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(joined.as_bytes());

    for (index, record) in reader.records().enumerate() {
        match record {
            Ok(record) => {
                let date = record.get(0).unwrap_or_default();
                if date.is_empty() {
                    continue;
                }
                let value = record.get(1).unwrap_or_default();
                rows.insert(date.to_string(), value.to_string());
            }
            Err(e) => warn!("Skipping unreadable ledger row {}: {}", index + 1, e),
        }
    }
    rows
}

/// Merges one day's PnL into ledger text and returns the updated text.
///
/// Empty or whitespace-only input yields a fresh `date,pnl` ledger with one row.
/// The given `(date, pnl)` always replaces any existing row for that date.
pub fn merge_daily_value(base_text: &str, date: NaiveDate, pnl: i64) -> String {
    let mut ledger = Ledger::parse(base_text);
    ledger.set(date, pnl);
    ledger.render()
}

/// `report.csv` becomes `report_updated.csv`; a name without an extension gets `.csv`.
pub fn build_export_file_name(base_name: &str) -> String {
    match base_name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => format!("{}_updated.{}", stem, ext),
        Some((stem, _)) => format!("{}_updated.csv", stem),
        None => format!("{}_updated.csv", base_name),
    }
}
