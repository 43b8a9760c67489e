//! # Movie Index Repository
//!
//! This crate provides the trait and implementation for talking to the
//! search service the movie dataset is loaded into. It includes definitions
//! for errors, the client interface, the record and bulk result types, and a
//! concrete implementation for OpenSearch.

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use errors::SearchError;
pub use interfaces::SearchEngineClient;
pub use opensearch::{IndexConfig, OpenSearchClient};
pub use types::{BulkIndexSummary, BulkItemFailure, MovieRecord};
