use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use dtjournal_core::journal::StorageUsage;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UsageResponse {
    #[serde(flatten)]
    usage: StorageUsage,
    used_bytes: u64,
    quota_bytes: u64,
}

#[derive(Deserialize)]
struct ClearQuery {
    #[serde(default)]
    confirm: bool,
}

async fn get_usage(State(state): State<Arc<AppState>>) -> ApiResult<Json<UsageResponse>> {
    Ok(Json(UsageResponse {
        usage: state.journal_service.storage_usage(),
        used_bytes: state.kv_repository.used_bytes()?,
        quota_bytes: state.kv_repository.quota_bytes(),
    }))
}

/// Erases every journal blob. Requires `?confirm=true`.
async fn clear_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ClearQuery>,
) -> ApiResult<StatusCode> {
    if !query.confirm {
        return Err(ApiError::BadRequest(
            "Refusing to erase journal data without confirm=true".to_string(),
        ));
    }
    state.journal_service.clear_all().await?;
    tracing::warn!("All journal data erased");
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/usage", get(get_usage))
        .route("/data", delete(clear_data))
}
