use bytes::Bytes;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::api_client::{ImageUpload, ProcessedImage};
use super::blob_store::{Blob, BlobStore};
use crate::models::{
    BlobId, ProcessingResult, ResultUpdate, SelectedFile, StaleTicket, Ticket, UiState,
};

/// Fallback content type when an upload can't be identified
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Guess an upload's content type from its bytes, then from what the sender claimed
pub fn sniff_mime(bytes: &[u8], declared: Option<&str>) -> String {
    if let Some(kind) = infer::get(bytes) {
        if kind.matcher_type() == infer::MatcherType::Image {
            return kind.mime_type().to_string();
        }
    }
    declared
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(UNKNOWN_MIME)
        .to_string()
}

/// UI state plus the bytes its handles point at
#[derive(Debug, Default)]
pub struct Session {
    pub state: UiState,
    pub blobs: BlobStore,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the picked image and make it the current selection
    pub fn select_file(&mut self, name: impl Into<String>, bytes: Bytes, mime: impl Into<String>) {
        let size = bytes.len() as u64;
        let mime = mime.into();
        let blob = self.blobs.insert(bytes, mime.clone());
        let file = SelectedFile {
            name: name.into(),
            size,
            mime,
            blob,
        };
        let name = file.name.clone();

        let released = self.state.select_file(file);
        self.blobs.revoke_all(released);
        tracing::info!(
            file = %name,
            size,
            held_bytes = self.blobs.total_bytes(),
            "Image selected"
        );
    }

    /// Upload payload for the selected image
    pub fn upload(&self) -> Option<ImageUpload> {
        let file = self.state.file()?;
        let blob = self.blobs.get(file.blob)?;
        Some(ImageUpload {
            file_name: file.name.clone(),
            mime: blob.mime.clone(),
            bytes: blob.bytes.clone(),
        })
    }

    /// Apply a decoded backend response for `ticket`.
    ///
    /// Nothing is stored when the ticket has been superseded.
    pub fn finish(
        &mut self,
        ticket: Ticket,
        image: ProcessedImage,
    ) -> Result<ProcessingResult, StaleTicket> {
        if !self.state.is_current(ticket) {
            return Err(StaleTicket);
        }

        // The backend reports zero for metrics it could not compute
        let size = reported(image.result_size).unwrap_or(image.bytes.len() as u64);
        let blob = self.blobs.insert(image.bytes, image.mime.clone());
        let result = ProcessingResult {
            blob,
            mime: image.mime,
            size,
            colors: reported(image.result_colors),
            operation: ticket.operation(),
        };
        let update = ResultUpdate {
            result: result.clone(),
            original_size: reported(image.original_size),
            original_colors: reported(image.original_colors),
        };

        match self.state.complete(ticket, update) {
            Ok(released) => {
                self.blobs.revoke_all(released);
                Ok(result)
            }
            Err(stale) => {
                self.blobs.revoke(blob);
                Err(stale)
            }
        }
    }

    pub fn blob(&self, id: BlobId) -> Option<&Blob> {
        self.blobs.get(id)
    }

    /// Bytes of the current result, if there is one
    pub fn result_blob(&self) -> Option<(&ProcessingResult, &Blob)> {
        let result = self.state.result()?;
        let blob = self.blobs.get(result.blob)?;
        Some((result, blob))
    }
}

fn reported(metric: Option<u64>) -> Option<u64> {
    metric.filter(|&value| value > 0)
}

/// Shared handle to one session.
///
/// The lock is synchronous and must never be held across an `.await`.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<Session>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current UI state
    pub fn snapshot(&self) -> UiState {
        self.lock().state.clone()
    }
}
