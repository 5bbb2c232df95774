use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::debug;

use super::stats_model::{DashboardSummary, EquityPoint, Health, PeriodTotal};
use crate::journal::{DayRecord, DayTone};
use crate::utils::time_utils::{days_of_month, start_of_month, start_of_year};

/// Sums `pnl` over the given records. Callers filter by period first.
/// Saturates at the `i64` bounds instead of wrapping.
pub fn sum_pnl<'a, I>(records: I) -> i64
where
    I: IntoIterator<Item = &'a DayRecord>,
{
    records
        .into_iter()
        .fold(0i64, |acc, r| acc.saturating_add(r.pnl))
}

/// Running PnL total in ascending date order. The input is left untouched.
pub fn build_equity_series(records: &[DayRecord]) -> Vec<EquityPoint> {
    let mut ordered: Vec<&DayRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.date);

    let mut cumulative = 0i64;
    ordered
        .into_iter()
        .map(|r| {
            cumulative = cumulative.saturating_add(r.pnl);
            EquityPoint {
                date: r.date,
                cumulative,
            }
        })
        .collect()
}

fn period_total<F>(records: &[DayRecord], in_period: F) -> PeriodTotal
where
    F: Fn(NaiveDate) -> bool,
{
    let selected: Vec<&DayRecord> = records.iter().filter(|r| in_period(r.date)).collect();
    PeriodTotal {
        pnl: sum_pnl(selected.iter().copied()),
        days: selected.len(),
    }
}

/// Dashboard figures as of `today`.
///
/// Month and year periods start at the calendar boundary of `today` and are
/// open-ended, so records dated after `today` still count toward them.
pub fn summarize(records: &[DayRecord], today: NaiveDate) -> DashboardSummary {
    let month_start = start_of_month(today);
    let year_start = start_of_year(today);

    let today_total = period_total(records, |d| d == today);
    let month_to_date = period_total(records, |d| d >= month_start);
    let year_to_date = period_total(records, |d| d >= year_start);
    let total = build_equity_series(records)
        .last()
        .map(|p| p.cumulative)
        .unwrap_or(0);

    let health = if records.is_empty() {
        Health::NoData
    } else if today_total.pnl < 0 {
        Health::BeCalm
    } else {
        Health::GoodPace
    };

    debug!(
        "Summarized {} records as of {}: total {}",
        records.len(),
        today,
        total
    );

    DashboardSummary {
        as_of: today,
        today: today_total,
        month_to_date,
        year_to_date,
        total,
        health,
    }
}

/// Tone of every journaled day in one calendar month. Days without a record are absent.
pub fn tones_for_month(
    records: &[DayRecord],
    year: i32,
    month: u32,
) -> BTreeMap<NaiveDate, DayTone> {
    let days = days_of_month(year, month);
    let (Some(first), Some(last)) = (days.first(), days.last()) else {
        return BTreeMap::new();
    };
    records
        .iter()
        .filter(|r| r.date >= *first && r.date <= *last)
        .map(|r| (r.date, r.tone()))
        .collect()
}
