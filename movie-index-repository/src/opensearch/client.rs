//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client.

use std::time::Duration;

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts},
    BulkParts, CountParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::opensearch::requests::{bulk_index_lines, parse_count};
use crate::types::{BulkIndexSummary, MovieRecord};

/// Default timeout applied to every request sent to the search service.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// OpenSearch client implementation.
///
/// Speaks plain HTTP to a single node. The same wire API is served by
/// Elasticsearch, so either can be the target.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("http://localhost:9200", DEFAULT_REQUEST_TIMEOUT)?;
///
/// if client.ping().await? {
///     let count = client.count("movies").await?;
/// }
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// No request is sent here; use `ping` to find out whether the service
    /// is reachable.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `request_timeout` - Timeout applied to each request
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or the transport cannot be built
    pub fn new(url: &str, request_timeout: Duration) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .timeout(request_timeout)
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            timeout_ms = request_timeout.as_millis() as u64,
            "Created OpenSearch client"
        );

        Ok(Self { client })
    }

    /// Read the body of a failed response for error reporting.
    async fn error_body(response: Response) -> String {
        response.text().await.unwrap_or_default()
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    async fn ping(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            debug!(status = %status, "Ping returned non-success status");
        }
        Ok(status.is_success())
    }

    async fn index_exists(&self, index: &str) -> Result<bool, SearchError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::index_exists(e.to_string()))?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(SearchError::index_exists(format!(
                "Unexpected status {} checking index {}",
                status, index
            ))),
        }
    }

    #[instrument(skip(self))]
    async fn delete_index(&self, index: &str) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::index_deletion(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - the index may already be gone
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Delete index request failed");
            return Err(SearchError::index_deletion(format!(
                "Delete of index {} failed with status {}: {}",
                index, status, error_body
            )));
        }

        debug!(index = %index, "Index deleted");
        Ok(())
    }

    #[instrument(skip(self, body))]
    async fn create_index(&self, index: &str, body: &Value) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body.clone())
            .send()
            .await
            .map_err(|e| SearchError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Create index request failed");
            return Err(SearchError::index_creation(format!(
                "Create of index {} failed with status {}: {}",
                index, status, error_body
            )));
        }

        debug!(index = %index, "Index created");
        Ok(())
    }

    async fn bulk_index(
        &self,
        index: &str,
        records: &[MovieRecord],
    ) -> Result<BulkIndexSummary, SearchError> {
        if records.is_empty() {
            return Ok(BulkIndexSummary::all_succeeded(0));
        }

        let body: Vec<JsonBody<Value>> = bulk_index_lines(index, records)
            .into_iter()
            .map(JsonBody::from)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::bulk_index(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            error!(status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchError::bulk_index(format!(
                "Bulk request failed with status {}: {}",
                status, error_body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let summary = BulkIndexSummary::from_response(records.len(), &response_body);
        if summary.has_failures() {
            warn!(
                index = %index,
                failed = summary.failed,
                total = summary.total,
                "Bulk request had rejected documents"
            );
        }

        Ok(summary)
    }

    async fn count(&self, index: &str) -> Result<u64, SearchError> {
        let response = self
            .client
            .count(CountParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchError::query(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = Self::error_body(response).await;
            return Err(SearchError::query(format!(
                "Count on index {} failed with status {}: {}",
                index, status, error_body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        parse_count(&body)
            .ok_or_else(|| SearchError::parse(format!("Count response has no count: {}", body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenSearchClient {
        OpenSearchClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    fn records() -> Vec<MovieRecord> {
        vec![
            serde_json::from_value(json!({"title": "Alien", "year": 1979})).unwrap(),
            serde_json::from_value(json!({"title": "Aliens", "year": 1986})).unwrap(),
        ]
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let result = OpenSearchClient::new("not a url", DEFAULT_REQUEST_TIMEOUT);
        assert!(matches!(result, Err(SearchError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_ping_success() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        assert!(client_for(&server).ping().await.unwrap());
    }

    #[tokio::test]
    async fn test_ping_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(!client_for(&server).ping().await.unwrap());
    }

    #[tokio::test]
    async fn test_ping_unreachable() {
        let client = OpenSearchClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap();

        let result = client.ping().await;
        assert!(matches!(result, Err(SearchError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_index_exists() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/movies"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.index_exists("movies").await.unwrap());
        assert!(!client.index_exists("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_index_tolerates_missing() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/movies"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).delete_index("movies").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_index_sends_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/movies"))
            .and(body_string_contains("\"directors\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"acknowledged": true})))
            .expect(1)
            .mount(&server)
            .await;

        let body = crate::opensearch::movies_index_settings();
        client_for(&server).create_index("movies", &body).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_index_failure_carries_status() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/movies"))
            .respond_with(ResponseTemplate::new(400).set_body_string("resource_already_exists"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_index("movies", &json!({}))
            .await
            .unwrap_err();

        match err {
            SearchError::IndexCreationError(msg) => {
                assert!(msg.contains("400"));
                assert!(msg.contains("resource_already_exists"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bulk_index_reports_rejections() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/movies/_bulk"))
            .and(body_string_contains("{\"index\":{\"_index\":\"movies\"}}"))
            .and(body_string_contains("Aliens"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "took": 7,
                "errors": true,
                "items": [
                    {"index": {"status": 201}},
                    {"index": {"status": 400, "error": {"reason": "bad year"}}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let summary = client_for(&server)
            .bulk_index("movies", &records())
            .await
            .unwrap();

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].reason, "bad year");
    }

    #[tokio::test]
    async fn test_bulk_index_whole_request_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/movies/_bulk"))
            .respond_with(ResponseTemplate::new(429).set_body_string("too many requests"))
            .mount(&server)
            .await;

        let result = client_for(&server).bulk_index("movies", &records()).await;
        assert!(matches!(result, Err(SearchError::BulkIndexError(_))));
    }

    #[tokio::test]
    async fn test_bulk_index_empty_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let summary = client_for(&server).bulk_index("movies", &[]).await.unwrap();
        assert_eq!(summary.total, 0);
    }

    #[tokio::test]
    async fn test_count() {
        let server = MockServer::start().await;
        Mock::given(path("/movies/_count"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2500,
                "_shards": {"total": 1, "successful": 1, "skipped": 0, "failed": 0}
            })))
            .mount(&server)
            .await;

        assert_eq!(client_for(&server).count("movies").await.unwrap(), 2500);
    }

    #[tokio::test]
    async fn test_count_missing_index() {
        let server = MockServer::start().await;
        Mock::given(path("/movies/_count"))
            .respond_with(ResponseTemplate::new(404).set_body_string("index_not_found_exception"))
            .mount(&server)
            .await;

        let result = client_for(&server).count("movies").await;
        assert!(matches!(result, Err(SearchError::QueryError(_))));
    }
}
