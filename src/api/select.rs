use axum::extract::{multipart::MultipartError, Multipart, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use bytes::Bytes;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{AppConfig, Notice, NoticeKind};
use crate::rendering::group_thousands;
use crate::services::{sniff_mime, SessionHandle};

/// Multipart field carrying the chosen image
pub const FILE_FIELD: &str = "file";

/// Fallback name when the browser sends none
const UNNAMED_FILE: &str = "image";

struct PickedFile {
    name: String,
    declared_mime: Option<String>,
    bytes: Bytes,
}

/// Select a new image.
///
/// An empty or missing file part leaves the session untouched, the same as
/// closing a file picker without choosing anything. An image over the upload
/// limit is reported on the page.
pub async fn handle_select(
    State(session): State<SessionHandle>,
    State(config): State<Arc<AppConfig>>,
    multipart: Multipart,
) -> Result<Redirect, ApiError> {
    match read_file(multipart).await {
        Ok(Some(file)) => {
            let mime = sniff_mime(&file.bytes, file.declared_mime.as_deref());
            session.lock().select_file(file.name, file.bytes, mime);
        }
        Ok(None) => tracing::debug!("No file chosen, selection unchanged"),
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::info!(limit = config.max_upload_bytes, "Upload over size limit");
            let message = format!(
                "Image is larger than the {} byte upload limit",
                group_thousands(config.max_upload_bytes as u64)
            );
            session
                .lock()
                .state
                .report(Notice::new(NoticeKind::UserInput, message));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to("/"))
}

async fn read_file(mut multipart: Multipart) -> Result<Option<PickedFile>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field
            .file_name()
            .filter(|n| !n.is_empty())
            .unwrap_or(UNNAMED_FILE)
            .to_string();
        let declared_mime = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        if bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(PickedFile {
            name,
            declared_mime,
            bytes,
        }));
    }
    Ok(None)
}
