use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::constants::DATE_FORMAT;

/// Converts a UTC instant to a journal date in the given timezone.
///
/// Use this whenever a calendar day has to be derived from a timestamp, so that
/// "today" and the month/year boundaries agree with the journal owner's clock.
///
/// # Arguments
/// * `instant` - The UTC timestamp to convert
/// * `tz` - The timezone to use for the conversion, or `None` for the
///   process-local zone
pub fn journal_date_from_utc(instant: DateTime<Utc>, tz: Option<Tz>) -> NaiveDate {
    match tz {
        Some(tz) => instant.with_timezone(&tz).date_naive(),
        None => instant.with_timezone(&Local).date_naive(),
    }
}

/// Today's journal date in the given timezone (process-local when `None`).
pub fn journal_today(tz: Option<Tz>) -> NaiveDate {
    journal_date_from_utc(Utc::now(), tz)
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_journal_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
}

pub fn format_journal_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        if let Some(next) = current.succ_opt() {
            current = next;
        } else {
            break;
        }
    }
    days
}

/// All days of a calendar month, or empty for an invalid year/month.
pub fn days_of_month(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next_first.and_then(|d| d.pred_opt()) {
        Some(last) => get_days_between(first, last),
        None => Vec::new(),
    }
}
