use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use dtjournal_core::journal::{CsvBaseline, CsvExport};

use super::parse_date_param;
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn get_csv_baseline(State(state): State<Arc<AppState>>) -> Json<Option<CsvBaseline>> {
    Json(state.journal_service.load_csv_baseline())
}

/// Stores an uploaded ledger file as the merge baseline.
async fn put_csv_baseline(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<CsvBaseline>> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("pnl.csv").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file content: {}", e)))?;
        upload = Some((name, bytes.to_vec()));
    }

    let (name, bytes) = upload
        .ok_or_else(|| ApiError::BadRequest("Missing file in multipart request".to_string()))?;
    let baseline = state
        .journal_service
        .import_csv_baseline(&name, &bytes)
        .await?;
    Ok(Json(baseline))
}

fn csv_download(export: CsvExport) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export.file_name.replace('"', "")
    );
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.text,
    )
        .into_response()
}

async fn export_day(
    Path(date): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Response> {
    let date = parse_date_param(&date)?;
    Ok(csv_download(state.journal_service.export_day(date)?))
}

async fn export_all(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    Ok(csv_download(state.journal_service.export_all()?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/csv-baseline", get(get_csv_baseline).put(put_csv_baseline))
        .route("/export", get(export_all))
        .route("/export/{date}", get(export_day))
}
