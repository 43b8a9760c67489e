//! Search engine client trait definition.
//!
//! This module defines the abstract interface for the search service
//! operations the loader needs, allowing for different backend
//! implementations (OpenSearch, Elasticsearch, in-memory fakes).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::{BulkIndexSummary, MovieRecord};

/// Abstracts the underlying search service.
///
/// Implementations are shared as `Arc<dyn SearchEngineClient>` and handed to
/// each pipeline component, so tests can inject a fake service.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Lightweight liveness check.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The service answered with a success status
    /// * `Ok(false)` - The service answered, but not successfully
    /// * `Err(SearchError)` - The request never completed
    async fn ping(&self) -> Result<bool, SearchError>;

    /// Check whether an index with the given name exists.
    async fn index_exists(&self, index: &str) -> Result<bool, SearchError>;

    /// Delete an index. Deleting an index that does not exist is not an error.
    async fn delete_index(&self, index: &str) -> Result<(), SearchError>;

    /// Create an index with the given settings and mappings body.
    async fn create_index(&self, index: &str, body: &Value) -> Result<(), SearchError>;

    /// Index a batch of records in a single bulk request.
    ///
    /// Documents receive server-assigned ids. Per-document rejections are
    /// reported in the returned summary; only a failure of the request as a
    /// whole is returned as an error.
    async fn bulk_index(
        &self,
        index: &str,
        records: &[MovieRecord],
    ) -> Result<BulkIndexSummary, SearchError>;

    /// Count the documents currently searchable in an index.
    async fn count(&self, index: &str) -> Result<u64, SearchError>;
}
