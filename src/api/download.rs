use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::AppConfig;
use crate::rendering::Download;
use crate::services::SessionHandle;

/// Send the current result as an attachment
pub async fn handle_download(
    State(session): State<SessionHandle>,
    State(config): State<Arc<AppConfig>>,
) -> Result<Response, ApiError> {
    let download = Download::from_session(&session.lock(), &config.download_filename)?;
    tracing::info!(file = %download.filename, bytes = download.bytes.len(), "Download");

    Ok((
        [
            (header::CONTENT_TYPE, download.mime.clone()),
            (header::CONTENT_DISPOSITION, download.content_disposition()),
        ],
        download.bytes,
    )
        .into_response())
}
