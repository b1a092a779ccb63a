use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// Plain-text body returned for unknown videos.
pub const NOT_FOUND_MESSAGE: &str = "Видео не найдено";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("video not found")]
    NotFound,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("multipart error: {0}")]
    Multipart(#[from] multer::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// An `AppError` together with whether the caller wants diagnostics in the body.
pub struct ErrorResponse {
    pub error: AppError,
    pub debug: bool,
}

impl AppError {
    pub fn with_debug(self, debug: bool) -> ErrorResponse {
        ErrorResponse { error: self, debug }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        match self.error {
            AppError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into_response(),
            AppError::BadRequest(_) | AppError::Multipart(_) => {
                (StatusCode::BAD_REQUEST, self.error.to_string()).into_response()
            }
            AppError::Io(_) | AppError::Json(_) => {
                error!("❌ Request failed: {}", self.error);
                let body = if self.debug {
                    format!("Internal Server Error\n\n{:?}", self.error)
                } else {
                    "Internal Server Error".to_string()
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}
