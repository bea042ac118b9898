//! HTTP client for the LightFrame API.
//!
//! Both processing endpoints take a multipart upload and answer with JSON
//! carrying the processed image as base64.

use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::models::{AppConfig, EnhanceOptions, Operation, ProcessingOptions};

/// Content type assumed when a response leaves `mime` out
pub const DEFAULT_RESULT_MIME: &str = "image/jpeg";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Non-2xx answer with a readable error payload
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid image payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Image sent to the backend
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Bytes,
}

/// Decoded successful response
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    pub bytes: Bytes,
    pub mime: String,
    pub result_size: Option<u64>,
    pub original_size: Option<u64>,
    pub original_colors: Option<u64>,
    pub result_colors: Option<u64>,
}

/// Success payload of `/compress` and `/enhance`.
///
/// The two endpoints name the result metrics differently; both spellings
/// land in the same fields.
#[derive(Debug, Deserialize)]
struct ProcessResponse {
    image: String,
    mime: Option<String>,
    #[serde(alias = "compressed_size")]
    result_size: Option<u64>,
    original_size: Option<u64>,
    original_colors: Option<u64>,
    #[serde(alias = "compressed_colors")]
    result_colors: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    message: Option<String>,
}

/// Something that can process images, the seam between dispatcher and network
#[async_trait]
pub trait ImageProcessor: Send + Sync {
    async fn compress(
        &self,
        upload: ImageUpload,
        options: &ProcessingOptions,
    ) -> Result<ProcessedImage, ClientError>;

    async fn enhance(
        &self,
        upload: ImageUpload,
        options: &EnhanceOptions,
    ) -> Result<ProcessedImage, ClientError>;
}

/// reqwest-backed LightFrame API client
#[derive(Debug, Clone)]
pub struct LightFrameClient {
    http: reqwest::Client,
    base_url: String,
}

impl LightFrameClient {
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("lightframe/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(http, &config.api_url))
    }

    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Ask the backend for its status message
    pub async fn health(&self) -> Result<String, ClientError> {
        let response = self.http.get(self.endpoint("/")).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(decode_failure(status.as_u16(), &body, "Backend unavailable"));
        }
        let health: HealthResponse = serde_json::from_slice(&body)?;
        Ok(health.message.unwrap_or_else(|| "OK".to_string()))
    }

    async fn submit(&self, operation: Operation, form: Form) -> Result<ProcessedImage, ClientError> {
        let url = self.endpoint(operation.endpoint());
        tracing::debug!(url = %url, operation = %operation, "Sending request");

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let err = decode_failure(status.as_u16(), &body, operation.fallback_error());
            tracing::warn!(
                operation = %operation,
                status = status.as_u16(),
                error = %err,
                "Backend rejected request"
            );
            return Err(err);
        }

        let image = decode_success(&body)?;
        tracing::info!(
            operation = %operation,
            bytes = image.bytes.len(),
            mime = %image.mime,
            "Received processed image"
        );
        Ok(image)
    }
}

#[async_trait]
impl ImageProcessor for LightFrameClient {
    async fn compress(
        &self,
        upload: ImageUpload,
        options: &ProcessingOptions,
    ) -> Result<ProcessedImage, ClientError> {
        let mut form = Form::new().part("file", file_part(upload)?);
        for (name, value) in options.form_fields() {
            form = form.text(name, value);
        }
        self.submit(Operation::Compress, form).await
    }

    async fn enhance(
        &self,
        upload: ImageUpload,
        options: &EnhanceOptions,
    ) -> Result<ProcessedImage, ClientError> {
        let mut form = Form::new().part("file", file_part(upload)?);
        for (name, value) in options.form_fields() {
            form = form.text(name, value);
        }
        self.submit(Operation::Enhance, form).await
    }
}

fn file_part(upload: ImageUpload) -> Result<Part, ClientError> {
    let length = upload.bytes.len() as u64;
    let part = Part::stream_with_length(upload.bytes, length)
        .file_name(upload.file_name)
        .mime_str(&upload.mime)?;
    Ok(part)
}

/// Decode a 2xx body into image bytes and metrics
pub(crate) fn decode_success(body: &[u8]) -> Result<ProcessedImage, ClientError> {
    let response: ProcessResponse = serde_json::from_slice(body)?;
    let bytes = base64::engine::general_purpose::STANDARD.decode(response.image.trim())?;

    Ok(ProcessedImage {
        bytes: Bytes::from(bytes),
        mime: response
            .mime
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RESULT_MIME.to_string()),
        result_size: response.result_size,
        original_size: response.original_size,
        original_colors: response.original_colors,
        result_colors: response.result_colors,
    })
}

/// Turn a non-2xx body into an error.
///
/// A JSON body yields [`ClientError::Server`] with its `error` text (or the
/// fallback); anything else is a malformed response.
pub(crate) fn decode_failure(status: u16, body: &[u8], fallback: &str) -> ClientError {
    match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(payload) => ClientError::Server {
            status,
            message: payload
                .error
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string()),
        },
        Err(e) => ClientError::Malformed(e),
    }
}
