//! Index configuration and mappings.
//!
//! This module defines the mapping for the movie index and the
//! `IndexConfig` value that carries an index name together with the body
//! used to create it.

use serde_json::{json, Value};

/// The default name of the movie index.
pub const DEFAULT_INDEX_NAME: &str = "movies";

/// Get the create-index body for the movie index.
///
/// The mapping includes:
/// - **text**: `title`, analyzed for full-text search
/// - **integer**: `year`
/// - **keyword**: `cast`, `genres` and `directors`, exact-match tokens; a
///   keyword field accepts an array of values without further mapping
pub fn movies_index_settings() -> Value {
    json!({
        "mappings": {
            "properties": {
                "title": {
                    "type": "text"
                },
                "year": {
                    "type": "integer"
                },
                "cast": {
                    "type": "keyword"
                },
                "genres": {
                    "type": "keyword"
                },
                "directors": {
                    "type": "keyword"
                }
            }
        }
    })
}

/// Name and create body of the index a run loads into.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    /// The index name.
    pub name: String,
    /// The body sent when creating the index (settings and mappings).
    pub body: Value,
}

impl IndexConfig {
    /// Create an index configuration with a custom create body.
    pub fn new(name: impl Into<String>, body: Value) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }

    /// The movie mapping under the given index name.
    pub fn movies(name: impl Into<String>) -> Self {
        Self::new(name, movies_index_settings())
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::movies(DEFAULT_INDEX_NAME)
    }
}
