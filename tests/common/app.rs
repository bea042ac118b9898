//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use lightframe::models::AppConfig;
use lightframe::server::{build_router, create_app_state, create_app_state_with, AppState};
use lightframe::services::{ImageProcessor, SessionHandle};

const BOUNDARY: &str = "lightframe-test-boundary";

/// Test application with router and direct access to the session
pub struct TestApp {
    router: axum::Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a test application talking to `api_url` over HTTP
    pub fn new(api_url: &str) -> Self {
        let state = create_app_state(test_config(api_url)).expect("Failed to create app state");
        Self::from_state(state)
    }

    /// Create a test application from a full config
    pub fn with_config(config: AppConfig) -> Self {
        let state = create_app_state(config).expect("Failed to create app state");
        Self::from_state(state)
    }

    /// Create a test application around an in-process processor
    pub fn with_processor(processor: Arc<dyn ImageProcessor>) -> Self {
        let state = create_app_state_with(test_config("http://127.0.0.1:9"), processor)
            .expect("Failed to create app state");
        Self::from_state(state)
    }

    fn from_state(state: AppState) -> Self {
        // Same router as production
        let router = build_router(state.clone());
        Self { router, state }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.state.session
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// POST an urlencoded form
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let mut encoder = reqwest::Url::parse("http://form.invalid/").unwrap();
        encoder.query_pairs_mut().extend_pairs(fields);
        let body = encoder.query().unwrap_or_default().to_string();

        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }

    /// POST with no body at all
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request(Request::post(path).body(Body::empty()).unwrap())
            .await
    }

    /// POST a multipart form with a single file field
    pub async fn post_file(
        &self,
        path: &str,
        field: &str,
        filename: &str,
        mime: &str,
        bytes: &[u8],
    ) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {mime}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::post(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

pub fn test_config(api_url: &str) -> AppConfig {
    AppConfig {
        api_url: api_url.to_string(),
        request_timeout_secs: 5,
        ..AppConfig::default()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Redirect target, if any
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }
}
