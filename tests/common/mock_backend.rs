//! Mock LightFrame backend built on wiremock.

use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Wrapper around wiremock MockServer with the LightFrame endpoints
pub struct MockLightFrame {
    pub server: MockServer,
}

impl MockLightFrame {
    /// Start a new mock backend
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Base URL to point the client at
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// `POST /compress` answers 200 with `response`
    pub async fn mock_compress(&self, response: serde_json::Value) {
        self.mock_json("/compress", 200, response).await;
    }

    /// `POST /enhance` answers 200 with `response`
    pub async fn mock_enhance(&self, response: serde_json::Value) {
        self.mock_json("/enhance", 200, response).await;
    }

    /// `POST endpoint` answers `status` with a JSON error body
    pub async fn mock_error(&self, endpoint: &str, status: u16, body: serde_json::Value) {
        self.mock_json(endpoint, status, body).await;
    }

    /// `POST endpoint` answers `status` with a plain-text body
    pub async fn mock_text_error(&self, endpoint: &str, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_string(body)
                    .insert_header("content-type", "text/plain"),
            )
            .mount(&self.server)
            .await;
    }

    /// `GET /` health message
    pub async fn mock_health(&self, message: &str) {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "message": message })),
            )
            .mount(&self.server)
            .await;
    }

    async fn mock_json(&self, endpoint: &str, status: u16, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_json(body)
                    .insert_header("content-type", "application/json"),
            )
            .mount(&self.server)
            .await;
    }

    /// All requests received so far
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Requests received on one path
    pub async fn requests_to(&self, endpoint: &str) -> Vec<Request> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.url.path() == endpoint)
            .collect()
    }
}

/// One part of a multipart body
#[derive(Debug, Clone)]
pub struct FormPart {
    /// Raw part headers (Content-Disposition, Content-Type)
    pub headers: String,
    pub content: Vec<u8>,
}

impl FormPart {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).to_string()
    }
}

/// Find the part called `name` in a multipart/form-data body
pub fn form_part(body: &[u8], name: &str) -> Option<FormPart> {
    let needle = format!("form-data; name=\"{name}\"");
    let start = find(body, needle.as_bytes())?;
    let header_end = start + find(&body[start..], b"\r\n\r\n")?;
    let content_start = header_end + 4;
    let content_end = content_start + find(&body[content_start..], b"\r\n--")?;

    Some(FormPart {
        headers: String::from_utf8_lossy(&body[start..header_end]).to_string(),
        content: body[content_start..content_end].to_vec(),
    })
}

/// Text value of the field called `name`
pub fn form_field(body: &[u8], name: &str) -> Option<String> {
    form_part(body, name).map(|part| part.text())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
