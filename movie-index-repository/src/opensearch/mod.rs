//! OpenSearch implementation of the search engine client.
//!
//! This module provides a concrete implementation of `SearchEngineClient`
//! using OpenSearch as the backend.

mod client;
mod index_config;
mod requests;

pub use client::{OpenSearchClient, DEFAULT_REQUEST_TIMEOUT};
pub use index_config::{movies_index_settings, IndexConfig, DEFAULT_INDEX_NAME};
