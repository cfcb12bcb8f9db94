//! Pagination utilities for Semaphore API responses.
//!
//! List endpoints announce paging through a `Pagination` response header
//! carrying a small JSON document. [`fetch_merged`] follows it page by page
//! and folds every page into the first one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;
use crate::traits::Merge;
use crate::transport::Transport;

/// Name of the response header carrying the page descriptor.
pub const PAGINATION_HEADER: &str = "Pagination";

/// Maximum pages to fetch (safety limit).
pub const MAX_PAGES: u32 = 1000;

/// Page descriptor attached to a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of pages.
    pub total_pages: u32,
    /// Page contained in this response (1-indexed).
    pub current_page: u32,
    /// Total number of entries across all pages (if reported).
    #[serde(default)]
    pub total_entries: Option<u64>,
    /// Entries per page (if reported).
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl Pagination {
    /// Parse the raw header value.
    ///
    /// A malformed descriptor is treated as absent, so the response counts as
    /// a single page.
    pub fn from_header(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(pagination) => Some(pagination),
            Err(err) => {
                tracing::warn!(header = raw, error = %err, "ignoring malformed pagination header");
                None
            }
        }
    }

    /// Number of the page following this one, if there is one.
    #[must_use]
    pub fn next_page(&self) -> Option<u32> {
        (self.current_page < self.total_pages).then(|| self.current_page + 1)
    }
}

/// Append `page=<page>` to the query of `url`.
pub fn page_url(url: &str, page: u32) -> Result<String> {
    let mut parsed = Url::parse(url)?;
    parsed
        .query_pairs_mut()
        .append_pair("page", &page.to_string());
    Ok(parsed.into())
}

/// Fetch `url` and every following page, merged into one value.
///
/// Stops as soon as the last declared page has been read, or when a response
/// carries no descriptor. Any failed page fails the whole fetch.
pub async fn fetch_merged<T>(transport: &Transport, url: &str) -> Result<T>
where
    T: Merge + DeserializeOwned + Send,
{
    let (mut merged, mut pagination) = transport.fetch_one::<T>(url).await?;
    let mut fetched = 1;

    while let Some(next) = pagination.and_then(|p| p.next_page()) {
        if fetched >= MAX_PAGES {
            tracing::warn!(
                "Reached pagination limit of {} pages, stopping",
                MAX_PAGES
            );
            break;
        }

        tracing::debug!(url, page = next, "fetching next page");
        let (page, info) = transport.fetch_one::<T>(&page_url(url, next)?).await?;
        merged.merge(page);
        fetched += 1;

        pagination = match info {
            Some(info) if info.current_page < next => {
                tracing::warn!(
                    requested = next,
                    reported = info.current_page,
                    "pagination did not advance, stopping"
                );
                None
            }
            other => other,
        };
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::testing::{page, ScriptedConnection};
    use crate::transport::Method;

    #[test]
    fn test_next_page() {
        let first = Pagination {
            total_pages: 3,
            current_page: 1,
            total_entries: None,
            per_page: None,
        };
        assert_eq!(first.next_page(), Some(2));

        let last = Pagination {
            current_page: 3,
            ..first
        };
        assert_eq!(last.next_page(), None);
    }

    #[test]
    fn test_from_header() {
        let parsed = Pagination::from_header(
            r#"{"total_entries":35,"total_pages":2,"per_page":20,"current_page":1,"first_page":true}"#,
        )
        .unwrap();
        assert_eq!(parsed.total_pages, 2);
        assert_eq!(parsed.current_page, 1);
        assert_eq!(parsed.total_entries, Some(35));

        assert!(Pagination::from_header("not json").is_none());
        assert!(Pagination::from_header(r#"{"current_page":1}"#).is_none());
    }

    #[test]
    fn test_page_url_appends_to_existing_query() {
        let url = page_url("http://semaphore.test/branches/1?auth_token=abc", 2).unwrap();
        assert_eq!(url, "http://semaphore.test/branches/1?auth_token=abc&page=2");

        let url = page_url("http://semaphore.test/branches/1", 3).unwrap();
        assert_eq!(url, "http://semaphore.test/branches/1?page=3");
    }

    #[tokio::test]
    async fn test_three_pages_are_merged() {
        let connection = ScriptedConnection::new(vec![
            page(json!([1, 2, 3]), Some((1, 3))),
            page(json!([4, 5]), Some((2, 3))),
            page(json!([6]), Some((3, 3))),
        ]);
        let requests = connection.requests();
        let transport = Transport::new(connection);

        let merged: Vec<u32> = fetch_merged(&transport, "http://semaphore.test/items?x=1")
            .await
            .unwrap();

        assert_eq!(merged.len(), 6);
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1], (Method::Get, "http://semaphore.test/items?x=1&page=2".to_string()));
        assert_eq!(requests[2].1, "http://semaphore.test/items?x=1&page=3");
    }

    #[tokio::test]
    async fn test_missing_header_is_single_page() {
        let connection = ScriptedConnection::new(vec![page(json!([1, 2]), None)]);
        let requests = connection.requests();
        let transport = Transport::new(connection);

        let merged: Vec<u32> = fetch_merged(&transport, "http://semaphore.test/items")
            .await
            .unwrap();

        assert_eq!(merged, vec![1, 2]);
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_last_page_short_circuits() {
        let connection = ScriptedConnection::new(vec![page(json!([1]), Some((2, 2)))]);
        let requests = connection.requests();
        let transport = Transport::new(connection);

        let merged: Vec<u32> = fetch_merged(&transport, "http://semaphore.test/items")
            .await
            .unwrap();

        assert_eq!(merged, vec![1]);
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_page_fails_whole_fetch() {
        let connection = ScriptedConnection::new(vec![
            page(json!([1, 2]), Some((1, 2))),
            Err(crate::SemaphoreError::NotFound {
                url: "http://semaphore.test/items?page=2".to_string(),
            }),
        ]);
        let transport = Transport::new(connection);

        let result: Result<Vec<u32>> = fetch_merged(&transport, "http://semaphore.test/items").await;

        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_stalled_pagination_stops() {
        let connection = ScriptedConnection::new(vec![
            page(json!([1]), Some((1, 5))),
            page(json!([2]), Some((1, 5))),
        ]);
        let requests = connection.requests();
        let transport = Transport::new(connection);

        let merged: Vec<u32> = fetch_merged(&transport, "http://semaphore.test/items")
            .await
            .unwrap();

        assert_eq!(merged, vec![1, 2]);
        assert_eq!(requests.lock().unwrap().len(), 2);
    }
}
