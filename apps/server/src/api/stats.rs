use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use dtjournal_core::journal::DayTone;
use dtjournal_core::stats::{
    build_equity_series, summarize, tones_for_month, DashboardSummary, EquityPoint,
};
use dtjournal_core::utils::time_utils::days_of_month;
use serde::Serialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalendarDay {
    date: NaiveDate,
    pnl: Option<i64>,
    tone: Option<DayTone>,
    screenshot_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalendarMonth {
    year: i32,
    month: u32,
    total: i64,
    days: Vec<CalendarDay>,
}

async fn get_summary(State(state): State<Arc<AppState>>) -> Json<DashboardSummary> {
    let records = state.journal_service.load_all();
    Json(summarize(&records, state.today()))
}

async fn get_equity(State(state): State<Arc<AppState>>) -> Json<Vec<EquityPoint>> {
    Json(build_equity_series(&state.journal_service.load_all()))
}

/// Every day of the month with its journaled result, for the calendar grid.
async fn get_calendar(
    Path((year, month)): Path<(i32, u32)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CalendarMonth>> {
    let dates = days_of_month(year, month);
    if dates.is_empty() {
        return Err(ApiError::BadRequest(format!(
            "Invalid month {}-{}",
            year, month
        )));
    }

    let records = state.journal_service.load_all();
    let tones = tones_for_month(&records, year, month);
    let days: Vec<CalendarDay> = dates
        .into_iter()
        .map(|date| {
            let record = records.iter().find(|r| r.date == date);
            CalendarDay {
                date,
                pnl: record.map(|r| r.pnl),
                tone: tones.get(&date).copied(),
                screenshot_count: record.map(|r| r.screenshots.len()).unwrap_or(0),
            }
        })
        .collect();
    let total = days
        .iter()
        .filter_map(|d| d.pnl)
        .fold(0i64, |acc, pnl| acc.saturating_add(pnl));

    Ok(Json(CalendarMonth {
        year,
        month,
        total,
        days,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/summary", get(get_summary))
        .route("/equity", get(get_equity))
        .route("/calendar/{year}/{month}", get(get_calendar))
}
