use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dtjournal_core::errors::{DatabaseError, Error as CoreError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("Not Found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

fn core_status(err: &CoreError) -> (StatusCode, String) {
    match err {
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        CoreError::Decode(_) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        CoreError::Database(DatabaseError::NotFound(_)) => (StatusCode::NOT_FOUND, err.to_string()),
        CoreError::Database(DatabaseError::QuotaExceeded { .. }) => (
            StatusCode::INSUFFICIENT_STORAGE,
            format!(
                "{}. Remove or shrink attached screenshots, then save again.",
                err
            ),
        ),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => core_status(e),
            ApiError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::Internal(reason) => (StatusCode::INTERNAL_SERVER_ERROR, reason.clone()),
        };
        if status.is_server_error() {
            tracing::error!("{}", msg);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<dtjournal_core::errors::ValidationError> for ApiError {
    fn from(err: dtjournal_core::errors::ValidationError) -> Self {
        ApiError::Core(CoreError::Validation(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtjournal_core::errors::{DecodeError, ValidationError};

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_core_errors_map_to_status() {
        assert_eq!(
            status_of(ValidationError::MissingField("pnl".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoreError::Decode(DecodeError::Image("bad".into())).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(
                CoreError::Database(DatabaseError::QuotaExceeded {
                    required: 2,
                    quota: 1
                })
                .into()
            ),
            StatusCode::INSUFFICIENT_STORAGE
        );
        assert_eq!(
            status_of(CoreError::Database(DatabaseError::QueryFailed("x".into())).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status_of(ApiError::NotFound), StatusCode::NOT_FOUND);
    }
}
