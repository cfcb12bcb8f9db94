//! Semaphore API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Resource navigation lives on the model types, which reach the wire
//! through the [`HttpConnection`] implemented here.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use url::Url;

use crate::error::{Result, SemaphoreError};
use crate::pagination::{Pagination, PAGINATION_HEADER};
use crate::transport::{ApiResponse, HttpConnection, Method};

const DEFAULT_API_URL: &str = "https://semaphoreci.com/api/v1";
const USER_AGENT: &str = concat!("semaphoreapi/", env!("CARGO_PKG_VERSION"));
const AUTH_PARAM: &str = "auth_token";

/// Low-level Semaphore API client.
///
/// Authenticates every request with the `auth_token` query parameter and
/// maps error statuses to [`SemaphoreError`] variants.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use semaphoreapi::SemaphoreClient;
///
/// # fn example() -> semaphoreapi::Result<()> {
/// // Create from environment variables
/// let client = SemaphoreClient::from_env()?;
///
/// // Or configure manually
/// let client = SemaphoreClient::new("your-token", "https://semaphoreci.com/api/v1")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SemaphoreClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
}

impl std::fmt::Debug for SemaphoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemaphoreClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SemaphoreClient {
    /// Create a client from environment variables.
    ///
    /// Uses `SEMAPHORE_API_TOKEN` for authentication and optionally
    /// `SEMAPHORE_API_URL` for the base URL (defaults to
    /// `https://semaphoreci.com/api/v1`).
    ///
    /// # Errors
    ///
    /// Returns an error if `SEMAPHORE_API_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("SEMAPHORE_API_TOKEN").map_err(|_| {
            SemaphoreError::ConfigMissing(
                "SEMAPHORE_API_TOKEN environment variable not set".to_string(),
            )
        })?;

        let base_url =
            env::var("SEMAPHORE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self::new(&token, &base_url)
    }

    /// Create a new client with the provided token and base URL.
    ///
    /// # Arguments
    ///
    /// * `token` - Semaphore API auth token
    /// * `base_url` - Root of the API (e.g., `https://semaphoreci.com/api/v1`)
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(SemaphoreError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: token.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append the auth token unless the URL already carries one.
    ///
    /// URLs handed out by the API embed the token already.
    fn authenticate(&self, url: &str) -> Result<Url> {
        let mut url = Url::parse(url)?;
        if !url.query_pairs().any(|(key, _)| key == AUTH_PARAM) {
            url.query_pairs_mut().append_pair(AUTH_PARAM, &self.token);
        }
        Ok(url)
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(SemaphoreError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status.as_u16() == 404 {
            let mut url = response.url().clone();
            url.set_query(None);
            return Err(SemaphoreError::NotFound { url: url.into() });
        }

        let message = Self::extract_error_message(response, status).await;
        Err(match status.as_u16() {
            401 | 403 => SemaphoreError::Authentication { message },
            400 | 422 => SemaphoreError::Validation { message },
            code => SemaphoreError::ApiError {
                message,
                status_code: Some(code),
            },
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return format!("HTTP {status}"),
        };

        // Try to parse as JSON and extract message field
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
                return err.to_string();
            }
        }

        if body.trim().is_empty() {
            return format!("HTTP {status}");
        }
        body
    }
}

#[async_trait]
impl HttpConnection for SemaphoreClient {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[tracing::instrument(skip(self, url, body), fields(path = tracing::field::Empty))]
    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse> {
        let url = self.authenticate(url)?;
        tracing::Span::current().record("path", url.path());

        let request = match method {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
            Method::Put => self.http.put(url),
            Method::Delete => self.http.delete(url),
        };
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };

        let response = request.send().await.map_err(SemaphoreError::HttpError)?;
        let response = Self::check_response(response).await?;

        let pagination = response
            .headers()
            .get(PAGINATION_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(Pagination::from_header);
        let body = response.text().await.map_err(SemaphoreError::HttpError)?;
        tracing::debug!(bytes = body.len(), paginated = pagination.is_some(), "response");

        Ok(ApiResponse { body, pagination })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = SemaphoreClient::new("test-token", "https://semaphoreci.com/api/v1").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("SemaphoreClient"));
        assert!(debug.contains("base_url"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = SemaphoreClient::new("token", "https://semaphoreci.com/api/v1").unwrap();
        let client2 = SemaphoreClient::new("token", "https://semaphoreci.com/api/v1/").unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
        assert_eq!(
            client1.base_url().join("projects").unwrap().as_str(),
            "https://semaphoreci.com/api/v1/projects"
        );
    }

    #[test]
    fn test_authenticate_appends_token() {
        let client = SemaphoreClient::new("secret", "https://semaphoreci.com/api/v1").unwrap();
        let url = client
            .authenticate("https://semaphoreci.com/api/v1/projects?page=2")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://semaphoreci.com/api/v1/projects?page=2&auth_token=secret"
        );
    }

    #[test]
    fn test_authenticate_keeps_existing_token() {
        let client = SemaphoreClient::new("secret", "https://semaphoreci.com/api/v1").unwrap();
        let raw = "https://semaphoreci.com/api/v1/projects/abc/1/status?auth_token=embedded";
        let url = client.authenticate(raw).unwrap();
        assert_eq!(url.as_str(), raw);
    }
}
