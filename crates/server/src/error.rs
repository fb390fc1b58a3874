use api_types::ErrorResponse;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use otbp_core::GameError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Game(GameError),
}

impl From<GameError> for ApiError {
    fn from(error: GameError) -> Self {
        ApiError::Game(error)
    }
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Game(error) => match error {
                GameError::InvalidCoordinate { .. } => (StatusCode::BAD_REQUEST, "invalid_coordinate"),
                GameError::InvalidPage { .. } => (StatusCode::BAD_REQUEST, "invalid_page"),
                GameError::InvalidPost(_) => (StatusCode::BAD_REQUEST, "invalid_post"),
                GameError::ImageNotFound(_) => (StatusCode::BAD_REQUEST, "image_not_found"),
                GameError::TargetNotFound(_) => (StatusCode::NOT_FOUND, "target_not_found"),
                GameError::ImageUpload(_) => (StatusCode::BAD_GATEWAY, "image_upload_failed"),
                GameError::StoreUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
                }
                GameError::InvalidRange { .. } | GameError::InvalidConfig(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "server_error")
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let message = match &self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Game(error) => error.to_string(),
        };

        if status.is_server_error() {
            tracing::warn!(%status, error = %message, "request failed");
        } else {
            tracing::debug!(%status, error = %message, "request rejected");
        }

        let body = ErrorResponse {
            error: kind.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
