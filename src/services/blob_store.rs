use bytes::Bytes;
use std::collections::HashMap;

use crate::models::BlobId;

/// Image bytes with their content type
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    pub bytes: Bytes,
    pub mime: String,
}

impl Blob {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// In-memory store backing the preview and result URLs.
///
/// Handles are never reused, so a revoked URL stays dead even after new
/// blobs are added.
#[derive(Debug, Default)]
pub struct BlobStore {
    blobs: HashMap<BlobId, Blob>,
    next_id: u64,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, bytes: impl Into<Bytes>, mime: impl Into<String>) -> BlobId {
        self.next_id += 1;
        let id = BlobId(self.next_id);
        let blob = Blob {
            bytes: bytes.into(),
            mime: mime.into(),
        };
        tracing::debug!(blob = %id, bytes = blob.len(), mime = %blob.mime, "Stored blob");
        self.blobs.insert(id, blob);
        id
    }

    pub fn get(&self, id: BlobId) -> Option<&Blob> {
        self.blobs.get(&id)
    }

    /// Release a handle; returns whether it was live
    pub fn revoke(&mut self, id: BlobId) -> bool {
        let removed = self.blobs.remove(&id).is_some();
        if removed {
            tracing::debug!(blob = %id, remaining = self.blobs.len(), "Revoked blob");
        }
        removed
    }

    pub fn revoke_all(&mut self, ids: impl IntoIterator<Item = BlobId>) {
        for id in ids {
            self.revoke(id);
        }
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Total bytes held
    pub fn total_bytes(&self) -> usize {
        self.blobs.values().map(Blob::len).sum()
    }
}
