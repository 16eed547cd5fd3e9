//! HTTP client for the Unity Connection provisioning API.
//!
//! Handles basic authentication, the default JSON headers, TLS
//! verification, timeouts and turning a response into a [`RawResponse`].
//! Status codes are never treated as errors here; the endpoint modules
//! interpret them.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONNECTION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use tracing::debug;

use cupi_core::config::ServerConfig;
use cupi_core::error::{CuError, CuResult};

use crate::response::{BinaryResponse, RawResponse};

const APPLICATION_JSON: &str = "application/json";

/// Client for one Unity Connection server.
///
/// Wraps `reqwest::Client` with the server's base URL and credentials.
/// Holds no mutable state: requests that need a different content type
/// override it on that request only, so a client can be cloned and shared
/// freely.
#[derive(Clone)]
pub struct ApiClient {
    inner: Client,
    /// Root of the API, e.g. "https://cuc.example.com/vmrest".
    base_url: String,
    username: String,
    password: String,
    /// Request timeout applied to every call.
    timeout: Duration,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new ApiClient from server configuration.
    pub fn new(config: &ServerConfig) -> CuResult<Self> {
        if config.host.trim().is_empty() {
            return Err(CuError::MissingConfig("server host".into()));
        }
        if config.timeout_ms == 0 {
            return Err(CuError::Config("timeout_ms must be greater than zero".into()));
        }

        let timeout = Duration::from_millis(config.timeout_ms);

        let mut builder = Client::builder()
            .default_headers(default_headers())
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(15)))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30));

        // Unity Connection installs with a self-signed certificate
        if !config.verify_tls {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let inner = builder
            .build()
            .map_err(|e| CuError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            base_url: config.base_url(),
            username: config.username.clone(),
            password: config.password.clone(),
            timeout,
        })
    }

    /// Get the API root URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build the full URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Internal: an authenticated request for the given method and path.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner
            .request(method, self.url(path))
            .basic_auth(&self.username, Some(&self.password))
    }

    /// Send a request and read the whole response.
    async fn execute(&self, method: Method, path: &str, builder: RequestBuilder) -> CuResult<RawResponse> {
        debug!("{} {}", method, path);

        let response = builder.send().await.map_err(Self::classify_error)?;
        let status = response.status();
        let body = response.text().await.map_err(Self::classify_error)?;

        debug!("{} {} -> {}", method, path, status.as_u16());

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }

    // --- Public HTTP methods ---

    /// Execute a GET request.
    pub async fn get(&self, path: &str) -> CuResult<RawResponse> {
        let builder = self.request(Method::GET, path);
        self.execute(Method::GET, path, builder).await
    }

    /// Execute a GET request for a binary body, accepting `accept`.
    pub async fn get_bytes(&self, path: &str, accept: &str) -> CuResult<BinaryResponse> {
        let accept = HeaderValue::from_str(accept)
            .map_err(|e| CuError::InvalidInput(format!("invalid accept type {accept:?}: {e}")))?;
        debug!("GET {} ({:?})", path, accept);

        let response = self
            .request(Method::GET, path)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(Self::classify_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(Self::classify_error)?;

        debug!("GET {} -> {} ({} bytes)", path, status.as_u16(), body.len());

        Ok(BinaryResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.to_vec(),
        })
    }

    /// Execute a POST request with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> CuResult<RawResponse> {
        let builder = self.request(Method::POST, path).json(body);
        self.execute(Method::POST, path, builder).await
    }

    /// Execute a POST request without a body.
    pub async fn post_empty(&self, path: &str) -> CuResult<RawResponse> {
        let builder = self.request(Method::POST, path);
        self.execute(Method::POST, path, builder).await
    }

    /// Execute a PUT request with a JSON body.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> CuResult<RawResponse> {
        let builder = self.request(Method::PUT, path).json(body);
        self.execute(Method::PUT, path, builder).await
    }

    /// Execute a PUT request with a raw body and its own content type.
    ///
    /// The content type is set on this request only; the client's default
    /// `application/json` stays in place for every other request.
    pub async fn put_bytes(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> CuResult<RawResponse> {
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|e| CuError::InvalidInput(format!("invalid content type {content_type:?}: {e}")))?;
        let builder = self
            .request(Method::PUT, path)
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        self.execute(Method::PUT, path, builder).await
    }

    /// Execute a DELETE request.
    pub async fn delete(&self, path: &str) -> CuResult<RawResponse> {
        let builder = self.request(Method::DELETE, path);
        self.execute(Method::DELETE, path, builder).await
    }

    /// Classify a reqwest error into a CuError variant.
    fn classify_error(e: reqwest::Error) -> CuError {
        if e.is_timeout() {
            CuError::Timeout(e.to_string())
        } else if e.is_connect() {
            CuError::Http(format!("connection failed: {e}"))
        } else {
            CuError::Http(e.to_string())
        }
    }
}

/// Headers sent with every request unless a request overrides them.
fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig::new("192.168.200.11", "admin", "secret")
    }

    #[test]
    fn test_base_url_from_host() {
        let client = ApiClient::new(&test_config()).unwrap();
        assert_eq!(client.base_url(), "https://192.168.200.11/vmrest");
        assert_eq!(client.url("/cluster"), "https://192.168.200.11/vmrest/cluster");
    }

    #[test]
    fn test_timeout_from_config() {
        let mut config = test_config();
        config.timeout_ms = 2_500;
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.timeout(), Duration::from_millis(2_500));
    }

    #[test]
    fn test_missing_host_is_rejected() {
        let config = ServerConfig::new("  ", "admin", "secret");
        assert!(matches!(ApiClient::new(&config), Err(CuError::MissingConfig(_))));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = test_config();
        config.timeout_ms = 0;
        assert!(matches!(ApiClient::new(&config), Err(CuError::Config(_))));
    }

    #[test]
    fn test_debug_hides_password() {
        let client = ApiClient::new(&test_config()).unwrap();
        assert!(!format!("{client:?}").contains("secret"));
    }

    #[test]
    fn test_default_headers() {
        let headers = default_headers();
        assert_eq!(headers[ACCEPT], APPLICATION_JSON);
        assert_eq!(headers[CONTENT_TYPE], APPLICATION_JSON);
        assert_eq!(headers[CONNECTION], "keep-alive");
    }
}
