//! HTTP client for the content generation backend.
//!
//! The backend turns a topic and an audience into a structured blog document
//! plus a short social post. This crate only speaks the wire contract; it does
//! not know what the payload means.
//!
//! # Example
//!
//! ```rust,ignore
//! use content_client::{GenerationClient, GenerateRequest};
//!
//! let client = GenerationClient::new("http://localhost:8000")?;
//!
//! let response = client
//!     .generate("sk-test", &GenerateRequest::new("gemini", "social media growth", "small business owners"))
//!     .await?;
//!
//! println!("{}", response.linkedin);
//! ```

pub mod error;
pub mod types;

pub use error::{ClientError, Result};
pub use types::*;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

/// Default request timeout. Generation runs a multi-step pipeline upstream.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Generation backend client.
#[derive(Clone)]
pub struct GenerationClient {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl GenerationClient {
    /// Create a client for the given base URL with [`DEFAULT_TIMEOUT`].
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Config("base URL must not be empty".into()));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
            timeout,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Generate a blog document and social post.
    ///
    /// The credential is sent as a bearer token and never logged.
    pub async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/generate", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Generation request failed");
                classify_send_error(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Generation backend error");
            return Err(classify_status(status, error_text));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            blog_len = body.blog.len(),
            social_len = body.linkedin.len(),
            "Generation completed"
        );

        Ok(body)
    }

    /// Check backend liveness.
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .http_client
            .get(format!("{}/", self.base_url))
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

fn classify_send_error(error: reqwest::Error) -> ClientError {
    if error.is_timeout() {
        ClientError::Timeout(error.to_string())
    } else {
        ClientError::Network(error.to_string())
    }
}

fn classify_status(status: StatusCode, message: String) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Auth(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ClientError::Timeout(message),
        _ => ClientError::Upstream {
            status: status.as_u16(),
            message,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one HTTP response on an ephemeral port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}", addr)
    }

    fn sample_request() -> GenerateRequest {
        GenerateRequest::new("gemini", "social media growth", "small business owners")
    }

    #[test]
    fn client_builder() {
        let client = GenerationClient::with_timeout("https://custom.api.com/", Duration::from_secs(5))
            .unwrap();

        assert_eq!(client.base_url(), "https://custom.api.com");
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn empty_base_url_rejected() {
        assert!(matches!(GenerationClient::new("/"), Err(ClientError::Config(_))));
    }

    #[test]
    fn request_wire_shape() {
        let json = serde_json::to_value(sample_request()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gemini",
                "topic": "social media growth",
                "audience": "small business owners"
            })
        );
    }

    #[test]
    fn status_classification() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, String::new()),
            ClientError::Auth(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, String::new()),
            ClientError::Auth(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::GATEWAY_TIMEOUT, String::new()),
            ClientError::Timeout(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".into()),
            ClientError::Upstream { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn generate_success() {
        let base = serve_once("200 OK", r#"{"blog":"{\"title\":\"T\"}","linkedin":"line 1\nline 2"}"#).await;
        let client = GenerationClient::new(base).unwrap();

        let response = client.generate("k1", &sample_request()).await.unwrap();

        assert_eq!(response.blog, r#"{"title":"T"}"#);
        assert_eq!(response.linkedin, "line 1\nline 2");
    }

    #[tokio::test]
    async fn generate_unauthorized() {
        let base = serve_once("401 Unauthorized", r#"{"detail":"bad key"}"#).await;
        let client = GenerationClient::new(base).unwrap();

        let err = client.generate("k1", &sample_request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Auth(_)));
    }

    #[tokio::test]
    async fn generate_unexpected_envelope() {
        let base = serve_once("200 OK", r#"{"result":"nope"}"#).await;
        let client = GenerationClient::new(base).unwrap();

        let err = client.generate("k1", &sample_request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[tokio::test]
    async fn generate_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GenerationClient::new(format!("http://{}", addr)).unwrap();
        let err = client.generate("k1", &sample_request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }

    #[tokio::test]
    async fn generate_timeout() {
        // Accepts at the socket level but never answers.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let client =
            GenerationClient::with_timeout(format!("http://{}", addr), Duration::from_millis(100))
                .unwrap();
        let err = client.generate("k1", &sample_request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout(_)));
        drop(listener);
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let base = serve_once("200 OK", r#"{"status":"ok"}"#).await;
        let client = GenerationClient::new(base).unwrap();

        assert!(client.health().await.unwrap().is_ok());
    }
}
