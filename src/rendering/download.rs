use bytes::Bytes;
use std::path::{Path, PathBuf};

use crate::services::Session;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("No result to download")]
    NoResult,

    #[error("Failed to save {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The current result, ready to be saved
#[derive(Debug, Clone)]
pub struct Download {
    pub bytes: Bytes,
    pub mime: String,
    pub filename: String,
}

impl Download {
    /// Snapshot the session's result under `filename`
    pub fn from_session(session: &Session, filename: &str) -> Result<Self, DownloadError> {
        let (_, blob) = session.result_blob().ok_or(DownloadError::NoResult)?;
        Ok(Self {
            bytes: blob.bytes.clone(),
            mime: blob.mime.clone(),
            filename: filename.to_string(),
        })
    }

    /// `Content-Disposition` value prompting a browser save
    pub fn content_disposition(&self) -> String {
        let name: String = self
            .filename
            .chars()
            .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
            .collect();
        format!("attachment; filename=\"{name}\"")
    }

    /// Write to `target`; a directory target gets the download filename appended
    pub async fn save(&self, target: &Path) -> Result<PathBuf, DownloadError> {
        let path = if target.is_dir() {
            target.join(&self.filename)
        } else {
            target.to_path_buf()
        };
        tokio::fs::write(&path, &self.bytes)
            .await
            .map_err(|source| DownloadError::Io {
                path: path.clone(),
                source,
            })?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "Saved result");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operation;
    use crate::services::ProcessedImage;

    fn session_with_result() -> Session {
        let mut session = Session::new();
        session.select_file("a.png", Bytes::from_static(b"\x89PNG\r\n\x1a\n...."), "image/png");
        let ticket = session.state.begin(Operation::Compress).unwrap();
        session
            .finish(
                ticket,
                ProcessedImage {
                    bytes: Bytes::from_static(b"result-bytes"),
                    mime: "image/jpeg".to_string(),
                    result_size: None,
                    original_size: None,
                    original_colors: None,
                    result_colors: None,
                },
            )
            .unwrap();
        session
    }

    #[test]
    fn test_no_result() {
        let session = Session::new();
        assert!(matches!(
            Download::from_session(&session, "LightFrame_result.jpg"),
            Err(DownloadError::NoResult)
        ));
    }

    #[test]
    fn test_content_disposition() {
        let download = Download::from_session(&session_with_result(), "LightFrame_result.jpg").unwrap();
        assert_eq!(
            download.content_disposition(),
            "attachment; filename=\"LightFrame_result.jpg\""
        );
        assert_eq!(download.mime, "image/jpeg");
    }

    #[tokio::test]
    async fn test_save_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let download = Download::from_session(&session_with_result(), "LightFrame_result.jpg").unwrap();
        let path = download.save(dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join("LightFrame_result.jpg"));
        assert_eq!(std::fs::read(path).unwrap(), b"result-bytes");
    }

    #[tokio::test]
    async fn test_save_to_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.jpg");
        let download = Download::from_session(&session_with_result(), "LightFrame_result.jpg").unwrap();
        assert_eq!(download.save(&target).await.unwrap(), target);
    }
}
