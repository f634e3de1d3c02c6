use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use kotoba_core::DiaryError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Diary(#[from] DiaryError),

    #[error("missing or malformed bearer token")]
    MissingToken,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::Diary(err) => match err {
                DiaryError::AuthFailure(_) => StatusCode::UNAUTHORIZED,
                DiaryError::NotFound(_) | DiaryError::UnknownRole(_) => StatusCode::NOT_FOUND,
                DiaryError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                DiaryError::Invalid(_) => StatusCode::BAD_REQUEST,
                DiaryError::Forbidden(_) => StatusCode::FORBIDDEN,
                DiaryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}: {}", status, self);
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
