use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use dtjournal_core::codec::decode_data_url;
use dtjournal_core::journal::{DayEntryInput, DayRecord, DayRecordPatch};

use super::parse_date_param;
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn list_days(State(state): State<Arc<AppState>>) -> Json<Vec<DayRecord>> {
    Json(state.journal_service.load_all())
}

async fn upsert_day(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DayEntryInput>,
) -> ApiResult<Json<DayRecord>> {
    let patch = DayRecordPatch::try_from(payload)?;
    let saved = state.journal_service.upsert(patch).await?;
    Ok(Json(saved))
}

async fn get_day(
    Path(date): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DayRecord>> {
    let date = parse_date_param(&date)?;
    state
        .journal_service
        .find_by_date(date)
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn delete_day(
    Path(date): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let date = parse_date_param(&date)?;
    state.journal_service.delete_by_date(date).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Serves one attached screenshot as a binary image.
async fn get_screenshot(
    Path((date, index)): Path<(String, usize)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Response> {
    let date = parse_date_param(&date)?;
    let record = state
        .journal_service
        .find_by_date(date)
        .ok_or(ApiError::NotFound)?;
    let data_url = record.screenshots.get(index).ok_or(ApiError::NotFound)?;
    let (mime, bytes) = decode_data_url(data_url)?;
    Ok(([(header::CONTENT_TYPE, mime)], bytes).into_response())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/days", get(list_days).put(upsert_day))
        .route("/days/{date}", get(get_day).delete(delete_day))
        .route("/days/{date}/screenshots/{index}", get(get_screenshot))
}
