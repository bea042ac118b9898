use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::models::BlobId;
use crate::services::SessionHandle;

/// Serve a live blob; revoked ids are gone for good
pub async fn handle_blob(
    State(session): State<SessionHandle>,
    Path(id): Path<u64>,
) -> Result<Response, ApiError> {
    let blob = session
        .lock()
        .blob(BlobId(id))
        .cloned()
        .ok_or(ApiError::NotFound)?;

    Ok((
        [
            (header::CONTENT_TYPE, blob.mime),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        blob.bytes,
    )
        .into_response())
}
