use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::rendering::{DownloadError, TemplateError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error("No result to download")]
    NoResult,

    #[error("Upload error: {0}")]
    Upload(#[from] MultipartError),

    #[error("Rendering error: {0}")]
    Render(#[from] TemplateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DownloadError> for ApiError {
    fn from(e: DownloadError) -> Self {
        match e {
            DownloadError::NoResult => ApiError::NoResult,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::NoResult => StatusCode::CONFLICT,
            ApiError::Upload(e) => e.status(),
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_messages() {
        assert_eq!(ApiError::NotFound.to_string(), "Not found");
        assert_eq!(ApiError::NoResult.to_string(), "No result to download");
        assert_eq!(
            ApiError::Internal("lock".to_string()).to_string(),
            "Internal error: lock"
        );
    }

    #[test]
    fn test_api_error_from_download_error() {
        let api_error: ApiError = DownloadError::NoResult.into();
        assert!(matches!(api_error, ApiError::NoResult));
    }

    #[test]
    fn test_api_error_into_response_status_codes() {
        let response = ApiError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::NoResult.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = ApiError::Internal("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
