use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One point on the equity curve: the running PnL total through `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub cumulative: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotal {
    pub pnl: i64,
    /// Number of journaled days in the period
    pub days: usize,
}

/// Headline mood shown next to today's figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Health {
    NoData,
    BeCalm,
    GoodPace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub as_of: NaiveDate,
    pub today: PeriodTotal,
    pub month_to_date: PeriodTotal,
    pub year_to_date: PeriodTotal,
    /// Last value of the equity curve, 0 for an empty journal
    pub total: i64,
    pub health: Health,
}
