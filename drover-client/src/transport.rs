//! HTTP transport for the orchestration service
//!
//! The transport owns the connection pool and credentials; everything
//! above it treats requests as independent and stateless. Job-level code
//! talks to the [`Transport`] trait so tests can substitute a scripted
//! in-memory implementation.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;

/// Port the orchestration service listens on next to the console host.
pub const ORCHESTRATOR_PORT: u16 = 8143;

/// A service response: status line plus raw body
///
/// Submission and listing operations return this untouched; interpreting
/// the body (identifier extraction, status decoding) is a separate step.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Status message from the response line (e.g. "OK", "Not Found")
    pub message: String,
    /// Raw response body
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, message: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Authenticated request/response exchange with the orchestration service
///
/// Errors from implementations are network-level failures only; an HTTP
/// error status still produces an `Ok(ApiResponse)` so callers can
/// distinguish "the service answered Not Found" from "the wire broke".
#[async_trait]
pub trait Transport: std::fmt::Debug + Send + Sync {
    /// Issue a GET against a service path (relative or absolute)
    async fn get(&self, path: &str) -> Result<ApiResponse>;

    /// Issue a POST with a JSON body against a service path
    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<ApiResponse>;
}

/// Credentials attached to every request
#[derive(Debug, Clone)]
pub enum Auth {
    /// RBAC token, sent in the `X-Authentication` header
    Token(String),
    /// Username/password basic auth
    Basic { username: String, password: String },
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Base URL of the service (e.g. "https://console.example:8143")
    base_url: String,
    /// HTTP client instance
    client: Client,
    auth: Option<Auth>,
}

impl HttpTransport {
    /// Create a transport against a full base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a transport against a console host, using HTTPS on the
    /// service's conventional port
    pub fn for_host(host: &str) -> Self {
        Self::new(format!("https://{host}:{ORCHESTRATOR_PORT}"))
    }

    /// Create a transport with a custom HTTP client
    ///
    /// This is the hook for timeouts, proxies, and TLS settings
    /// (including certificate-verification policy), which stay the
    /// caller's concern.
    ///
    /// # Example
    /// ```
    /// use drover_client::HttpTransport;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let transport = HttpTransport::with_client("https://console.example:8143", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            auth: None,
        }
    }

    /// Attach credentials to every request issued by this transport
    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(Auth::Token(token)) => request.header("X-Authentication", token),
            Some(Auth::Basic { username, password }) => request.basic_auth(username, Some(password)),
            None => request,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<ApiResponse> {
        let url = self.build_url(path);
        let response = self.authorize(self.client.get(&url)).send().await?;
        read_response(response).await
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<ApiResponse> {
        let url = self.build_url(path);
        let response = self
            .authorize(self.client.post(&url))
            .json(body)
            .send()
            .await?;
        read_response(response).await
    }
}

async fn read_response(response: reqwest::Response) -> Result<ApiResponse> {
    let status = response.status();
    let message = status.canonical_reason().unwrap_or("").to_string();
    let body = response.text().await?;
    Ok(ApiResponse::new(status.as_u16(), message, body))
}

/// Append pagination query parameters to a service path
///
/// Zero means "use the server's default page" and is omitted.
pub fn pagination_path(base: &str, limit: u64, offset: u64) -> String {
    let mut params = Vec::new();
    if limit > 0 {
        params.push(format!("limit={limit}"));
    }
    if offset > 0 {
        params.push(format!("offset={offset}"));
    }

    if params.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, params.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        let transport = HttpTransport::new("https://console.example:8143/");
        assert_eq!(transport.base_url(), "https://console.example:8143");
    }

    #[test]
    fn for_host_uses_https_and_service_port() {
        let transport = HttpTransport::for_host("console.example");
        assert_eq!(transport.base_url(), "https://console.example:8143");
    }

    #[test]
    fn build_url_joins_relative_and_absolute_paths() {
        let transport = HttpTransport::new("https://console.example:8143");
        assert_eq!(
            transport.build_url("orchestrator/v1/jobs"),
            "https://console.example:8143/orchestrator/v1/jobs"
        );
        assert_eq!(
            transport.build_url("/command/task"),
            "https://console.example:8143/command/task"
        );
    }

    #[test]
    fn pagination_path_omits_zero_values() {
        assert_eq!(pagination_path("jobs/1", 0, 0), "jobs/1");
        assert_eq!(pagination_path("jobs/1", 5, 0), "jobs/1?limit=5");
        assert_eq!(pagination_path("jobs/1", 0, 10), "jobs/1?offset=10");
        assert_eq!(pagination_path("jobs/1", 5, 10), "jobs/1?limit=5&offset=10");
    }

    #[test]
    fn api_response_success_range() {
        assert!(ApiResponse::new(200, "OK", "").is_success());
        assert!(ApiResponse::new(202, "Accepted", "").is_success());
        assert!(!ApiResponse::new(404, "Not Found", "").is_success());
        assert!(!ApiResponse::new(500, "Internal Server Error", "").is_success());
    }
}
