use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    routing::post,
    Json, Router,
};
use dtjournal_core::codec::{compress_image, estimate_encoded_size, CompressOptions};
use dtjournal_core::constants::SCREENSHOT_WARN_BYTES;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize, Default)]
struct CompressQuery {
    preset: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScreenshotResponse {
    data_url: String,
    width: u32,
    height: u32,
    approx_bytes: usize,
    /// Large enough to eat noticeably into the storage quota
    oversized: bool,
}

fn options_for(state: &AppState, preset: Option<&str>) -> ApiResult<CompressOptions> {
    match preset {
        None | Some("default") => Ok(state.image_options),
        Some("detail") => Ok(CompressOptions {
            quality: state.image_options.quality,
            ..CompressOptions::detail()
        }),
        Some(other) => Err(ApiError::BadRequest(format!(
            "Unknown image preset '{}'",
            other
        ))),
    }
}

/// Compresses one uploaded image into a JPEG data URL ready to attach to a day.
async fn compress_screenshot(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompressQuery>,
    mut multipart: Multipart,
) -> ApiResult<Json<ScreenshotResponse>> {
    let options = options_for(&state, query.preset.as_deref())?;

    let mut raw: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if matches!(field.name(), Some("file") | Some("image")) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;
            raw = Some(bytes.to_vec());
            break;
        }
    }
    let raw = raw.ok_or_else(|| {
        ApiError::BadRequest("Missing image in multipart request".to_string())
    })?;

    let compressed = tokio::task::spawn_blocking(move || compress_image(&raw, &options))
        .await
        .map_err(|e| ApiError::Internal(format!("Image worker failed: {}", e)))??;

    let approx_bytes = estimate_encoded_size(&compressed.data_url);
    Ok(Json(ScreenshotResponse {
        oversized: approx_bytes > SCREENSHOT_WARN_BYTES,
        approx_bytes,
        data_url: compressed.data_url,
        width: compressed.width,
        height: compressed.height,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/screenshots", post(compress_screenshot))
}
