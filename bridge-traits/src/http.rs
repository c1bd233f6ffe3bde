//! HTTP Client Abstraction
//!
//! Provides async HTTP operations used by the token refresher and the Drive
//! API client. Implementations perform exactly one network attempt per call;
//! recovery policy (token refresh, expired links) belongs to the callers.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{BridgeError, Result};

/// HTTP method types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        };
        f.write_str(name)
    }
}

/// HTTP request builder
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Query pairs appended to `url` by the transport, in insertion order.
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Append a query pair
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append every pair whose value is present; `None` values are dropped
    pub fn query_pairs<K, V, I>(mut self, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, Option<V>)>,
    {
        for (key, value) in pairs {
            if let Some(value) = value {
                self.query.push((key.into(), value.into()));
            }
        }
        self
    }

    /// Look up the first query value for `key`
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let json = serde_json::to_vec(body).map_err(|e| {
            BridgeError::OperationFailed(format!("JSON serialization failed: {}", e))
        })?;
        self.body = Some(Bytes::from(json));
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    /// Encode `body` as `application/x-www-form-urlencoded`
    pub fn form<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let encoded = serde_urlencoded::to_string(body).map_err(|e| {
            BridgeError::OperationFailed(format!("Form serialization failed: {}", e))
        })?;
        self.body = Some(Bytes::from(encoded));
        self.headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        Ok(self)
    }

    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }
}

/// HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Parse response body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            BridgeError::OperationFailed(format!("JSON deserialization failed: {}", e))
        })
    }

    /// Get response body as UTF-8 string
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| BridgeError::OperationFailed(format!("Invalid UTF-8: {}", e)))
    }

    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if response status indicates a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if response status indicates a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

/// Response whose body has not been read yet
///
/// Returned by [`HttpClient::execute_stream`] so that file contents can be
/// copied to their destination without being buffered in memory.
pub struct StreamingResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    body: Box<dyn AsyncRead + Send + Unpin>,
}

impl StreamingResponse {
    pub fn new(
        status: u16,
        headers: HashMap<String, String>,
        body: Box<dyn AsyncRead + Send + Unpin>,
    ) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Build a response from an in-memory body
    pub fn from_bytes(status: u16, body: impl Into<Bytes>) -> Self {
        let body: Bytes = body.into();
        Self::new(status, HashMap::new(), Box::new(std::io::Cursor::new(body)))
    }

    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Take the body reader
    pub fn into_reader(self) -> Box<dyn AsyncRead + Send + Unpin> {
        self.body
    }

    /// Read the whole body into memory
    pub async fn bytes(mut self) -> Result<Bytes> {
        let mut buffer = Vec::new();
        self.body.read_to_end(&mut buffer).await?;
        Ok(Bytes::from(buffer))
    }
}

impl fmt::Debug for StreamingResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &"AsyncRead { ... }")
            .finish()
    }
}

/// Async HTTP client trait
///
/// This trait abstracts HTTP operations to allow platform-specific
/// implementations and scripted mocks in tests. Implementations must:
/// - Perform a single network attempt (no retry, no backoff)
/// - Return every HTTP status as a response, reserving errors for
///   transport failures
///
/// # Example
///
/// ```ignore
/// use bridge_traits::http::{HttpClient, HttpRequest, HttpMethod};
///
/// async fn fetch_data(client: &dyn HttpClient) -> Result<String> {
///     let request = HttpRequest::new(HttpMethod::Get, "https://api.example.com/data")
///         .bearer_token("token");
///
///     let response = client.execute(request).await?;
///     response.text()
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and buffer the body
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network connection fails
    /// - TLS validation fails
    /// - Request times out
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Execute an HTTP request, leaving the body as a stream
    async fn execute_stream(&self, request: HttpRequest) -> Result<StreamingResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_request_builder() {
        let request = HttpRequest::new(HttpMethod::Get, "https://example.com")
            .header("User-Agent", "test")
            .bearer_token("secret")
            .query("maxResults", "10")
            .timeout(Duration::from_secs(30));

        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.headers.get("User-Agent"), Some(&"test".to_string()));
        assert_eq!(
            request.headers.get("Authorization"),
            Some(&"Bearer secret".to_string())
        );
        assert_eq!(request.query_value("maxResults"), Some("10"));
        assert_eq!(request.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_query_pairs_skip_missing_values() {
        let request = HttpRequest::new(HttpMethod::Get, "https://example.com").query_pairs([
            ("maxResults", Some("100".to_string())),
            ("pageToken", None),
        ]);

        assert_eq!(request.query.len(), 1);
        assert_eq!(request.query_value("maxResults"), Some("100"));
        assert_eq!(request.query_value("pageToken"), None);
    }

    #[test]
    fn test_form_body_encoding() {
        let request = HttpRequest::new(HttpMethod::Post, "https://example.com/token")
            .form(&[("grant_type", "refresh_token"), ("client_id", "a b")])
            .unwrap();

        assert_eq!(
            request.headers.get("Content-Type"),
            Some(&"application/x-www-form-urlencoded".to_string())
        );
        assert_eq!(
            request.body.unwrap(),
            Bytes::from("grant_type=refresh_token&client_id=a+b")
        );
    }

    #[test]
    fn test_http_response_status_checks() {
        let response = HttpResponse::new(200, "test");

        assert!(response.is_success());
        assert!(!response.is_client_error());
        assert!(!response.is_server_error());

        let response = HttpResponse::new(401, "");
        assert!(response.is_client_error());
    }

    #[test]
    fn test_http_response_json() {
        let response = HttpResponse::new(200, r#"{"id": "abc"}"#);
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["id"], "abc");

        let response = HttpResponse::new(200, "not json");
        assert!(response.json::<serde_json::Value>().is_err());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
    }

    #[tokio::test]
    async fn test_streaming_response_bytes() {
        let response = StreamingResponse::from_bytes(200, vec![1u8, 2, 3]);
        assert!(response.is_success());
        let body = response.bytes().await.unwrap();
        assert_eq!(&body[..], &[1, 2, 3]);
    }
}
