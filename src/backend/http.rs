/// HTTP/JSON inference backend
///
/// Request:  POST {endpoint}
///           { "file_name": "...", "mime_type": "image/jpeg", "image": "<base64>" }
/// Response: { "label": "Healthy", "confidence": 92.5, "description": "..." }

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;

use super::InferenceBackend;
use crate::error::BackendError;
use crate::state::assessment::ClassificationResponse;
use crate::state::data::ImagePayload;

/// Largest error body kept for the status message
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct ClassifyRequest<'a> {
    pub file_name: &'a str,
    pub mime_type: &'a str,
    /// Base64 (standard alphabet, padded) image bytes
    pub image: String,
}

impl<'a> ClassifyRequest<'a> {
    pub fn from_payload(image: &'a ImagePayload) -> Self {
        Self {
            file_name: image.file_name(),
            mime_type: image
                .kind()
                .map(|kind| kind.mime_type())
                .unwrap_or("application/octet-stream"),
            image: base64::engine::general_purpose::STANDARD.encode(image.bytes()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpBackend {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|e| BackendError::Transport(format!("invalid endpoint {:?}: {}", endpoint, e)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

#[async_trait]
impl InferenceBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn classify(&self, image: &ImagePayload) -> Result<ClassificationResponse, BackendError> {
        let body = ClassifyRequest::from_payload(image);

        tracing::debug!(
            "POST {} ({} bytes, {})",
            self.endpoint,
            image.len(),
            body.mime_type
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut text = response.text().await.unwrap_or_default();
            truncate_on_char_boundary(&mut text, MAX_ERROR_BODY);
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let bytes = response.bytes().await?;
        parse_response(&bytes)
    }
}

/// Decode a response body into the loose wire type
pub(crate) fn parse_response(body: &[u8]) -> Result<ClassificationResponse, BackendError> {
    serde_json::from_slice(body).map_err(|e| BackendError::Decode(e.to_string()))
}

fn truncate_on_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let image = ImagePayload::new("reef.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0]);
        let body = serde_json::to_value(ClassifyRequest::from_payload(&image)).unwrap();
        assert_eq!(body["file_name"], "reef.jpg");
        assert_eq!(body["mime_type"], "image/jpeg");
        assert_eq!(body["image"], "/9j/4A==");
    }

    #[test]
    fn test_parse_response() {
        let response = parse_response(
            br#"{"label":"Healthy","confidence":92.5,"description":"looks fine"}"#,
        )
        .unwrap();
        assert_eq!(response.label, "Healthy");
        assert_eq!(response.confidence, 92.5);
        assert_eq!(response.description.as_deref(), Some("looks fine"));
    }

    #[test]
    fn test_parse_response_rejects_garbage() {
        assert!(matches!(
            parse_response(b"<html>502</html>"),
            Err(BackendError::Decode(_))
        ));
        assert!(matches!(
            parse_response(br#"{"confidence":10}"#),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(HttpBackend::new("not a url", None).is_err());
        let backend = HttpBackend::new("http://localhost:8000/classify", None).unwrap();
        assert_eq!(backend.endpoint().path(), "/classify");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let mut text = "ééé".to_string();
        truncate_on_char_boundary(&mut text, 3);
        assert_eq!(text, "é");
    }

    /// Serve a single canned HTTP response on a local port and return the URL
    async fn serve_once(status_line: &'static str, body: String) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            // Drain the request so the client is not reset mid-write
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/classify", addr)
    }

    fn reef_jpeg() -> ImagePayload {
        ImagePayload::new("reef.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])
    }

    #[tokio::test]
    async fn test_classify_success_returns_response() {
        let url = serve_once(
            "200 OK",
            r#"{"label":"Healthy","confidence":92.5}"#.to_string(),
        )
        .await;
        let backend = HttpBackend::new(&url, Some(Duration::from_secs(5))).unwrap();

        let response = backend.classify(&reef_jpeg()).await.unwrap();
        assert_eq!(response.label, "Healthy");
        assert_eq!(response.confidence, 92.5);
        assert_eq!(response.description, None);
    }

    #[tokio::test]
    async fn test_classify_error_status_is_reported() {
        let url = serve_once("503 Service Unavailable", "model loading".to_string()).await;
        let backend = HttpBackend::new(&url, Some(Duration::from_secs(5))).unwrap();

        match backend.classify(&reef_jpeg()).await {
            Err(BackendError::Status { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, "model loading");
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_classify_error_body_is_truncated() {
        let url = serve_once("500 Internal Server Error", "x".repeat(2000)).await;
        let backend = HttpBackend::new(&url, Some(Duration::from_secs(5))).unwrap();

        match backend.classify(&reef_jpeg()).await {
            Err(BackendError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body.len(), MAX_ERROR_BODY);
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Reserve a free port, then release it so nothing is listening there
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let url = format!("http://{}/classify", addr);

        let backend = HttpBackend::new(&url, Some(Duration::from_secs(2))).unwrap();
        assert!(matches!(
            backend.classify(&reef_jpeg()).await,
            Err(BackendError::Transport(_))
        ));
    }
}
