//! Transport capability shared by every node of the resource graph.
//!
//! [`HttpConnection`] is the object-safe seam over the wire: it performs one
//! authenticated exchange and hands back the raw body plus the pagination
//! descriptor. [`Transport`] wraps a shared connection and layers typed
//! decoding on top of it.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{SemaphoreError, Result};
use crate::pagination::{fetch_merged, Pagination};

/// HTTP methods used by the Semaphore API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A successful response, before decoding.
#[derive(Debug, Clone, Default)]
pub struct ApiResponse {
    /// Raw response body.
    pub body: String,
    /// Pagination descriptor, if the response declared one.
    pub pagination: Option<Pagination>,
}

/// A connection able to perform authenticated requests against the API.
///
/// Implementations map non-success statuses to [`SemaphoreError`] variants;
/// callers only ever see successful responses.
#[async_trait]
pub trait HttpConnection: Send + Sync {
    /// Root URL of the API (always ends with `/`).
    fn base_url(&self) -> &Url;

    /// Perform a single request.
    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse>;
}

/// Shared handle to an [`HttpConnection`].
///
/// Cloning is cheap; all clones talk through the same connection.
#[derive(Clone)]
pub struct Transport {
    connection: Arc<dyn HttpConnection>,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url().as_str())
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Wrap a connection.
    pub fn new<C: HttpConnection + 'static>(connection: C) -> Self {
        Self {
            connection: Arc::new(connection),
        }
    }

    /// Wrap an already shared connection.
    pub fn from_shared(connection: Arc<dyn HttpConnection>) -> Self {
        Self { connection }
    }

    /// Root URL of the API.
    pub fn base_url(&self) -> &Url {
        self.connection.base_url()
    }

    /// Resolve a path relative to the API root.
    pub fn api_url(&self, path: &str) -> Result<String> {
        Ok(self.base_url().join(path)?.into())
    }

    /// Perform a request and return the undecoded response.
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse> {
        self.connection.execute(method, url, body).await
    }

    /// GET a single page and decode it.
    pub async fn fetch_one<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<(T, Option<Pagination>)> {
        let response = self.execute(Method::Get, url, None).await?;
        let value = serde_json::from_str(&response.body)?;
        Ok((value, response.pagination))
    }

    /// GET a JSON array, following pagination until every page is merged.
    pub async fn fetch_many<T: DeserializeOwned + Send>(&self, url: &str) -> Result<Vec<T>> {
        fetch_merged(self, url).await
    }

    /// GET the body as text, without decoding.
    pub async fn fetch_raw(&self, url: &str) -> Result<String> {
        Ok(self.execute(Method::Get, url, None).await?.body)
    }

    /// Perform a mutating request and decode the confirmed entity, if any.
    ///
    /// An empty response body yields `None`.
    pub async fn mutate<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Option<T>> {
        let response = self.execute(method, url, body).await?;
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&response.body)?))
    }

    /// Like [`mutate`](Self::mutate), but an empty body is an error.
    pub(crate) async fn mutate_expecting<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        self.mutate(method, url, body)
            .await?
            .ok_or_else(|| SemaphoreError::empty_response(url))
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory connection for unit tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays queued responses and records every request.
    pub(crate) struct ScriptedConnection {
        base_url: Url,
        responses: Mutex<VecDeque<Result<ApiResponse>>>,
        requests: Arc<Mutex<Vec<(Method, String)>>>,
    }

    impl ScriptedConnection {
        pub(crate) fn new(responses: Vec<Result<ApiResponse>>) -> Self {
            Self {
                base_url: Url::parse("http://semaphore.test/api/v1/").unwrap(),
                responses: Mutex::new(responses.into()),
                requests: Arc::default(),
            }
        }

        pub(crate) fn requests(&self) -> Arc<Mutex<Vec<(Method, String)>>> {
            self.requests.clone()
        }
    }

    #[async_trait]
    impl HttpConnection for ScriptedConnection {
        fn base_url(&self) -> &Url {
            &self.base_url
        }

        async fn execute(
            &self,
            method: Method,
            url: &str,
            _body: Option<&serde_json::Value>,
        ) -> Result<ApiResponse> {
            self.requests.lock().unwrap().push((method, url.to_string()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left")
        }
    }

    /// A JSON response with an optional page descriptor.
    pub(crate) fn page(body: serde_json::Value, page: Option<(u32, u32)>) -> Result<ApiResponse> {
        Ok(ApiResponse {
            body: body.to_string(),
            pagination: page.map(|(current_page, total_pages)| Pagination {
                current_page,
                total_pages,
                total_entries: None,
                per_page: None,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{page, ScriptedConnection};
    use super::*;

    #[tokio::test]
    async fn test_api_url_joins_base() {
        let transport = Transport::new(ScriptedConnection::new(vec![]));
        let url = transport.api_url("projects/abc/hooks").unwrap();
        assert_eq!(url, "http://semaphore.test/api/v1/projects/abc/hooks");
    }

    #[tokio::test]
    async fn test_mutate_empty_body_is_none() {
        let transport = Transport::new(ScriptedConnection::new(vec![Ok(ApiResponse::default())]));
        let result: Option<serde_json::Value> = transport
            .mutate(Method::Delete, "http://semaphore.test/x", None)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fetch_one_decode_error() {
        let transport = Transport::new(ScriptedConnection::new(vec![page(
            serde_json::json!({"unexpected": true}),
            None,
        )]));
        let result = transport
            .fetch_one::<Vec<u32>>("http://semaphore.test/x")
            .await;
        assert!(matches!(result, Err(SemaphoreError::DecodeError(_))));
    }

    #[tokio::test]
    async fn test_fetch_raw_returns_body() {
        let transport = Transport::new(ScriptedConnection::new(vec![Ok(ApiResponse {
            body: "plain text".to_string(),
            pagination: None,
        })]));
        let raw = transport.fetch_raw("http://semaphore.test/x").await.unwrap();
        assert_eq!(raw, "plain text");
    }

    #[test]
    fn test_transport_debug_shows_base_url() {
        let transport = Transport::new(ScriptedConnection::new(vec![]));
        let debug = format!("{transport:?}");
        assert!(debug.contains("semaphore.test"));
    }
}
