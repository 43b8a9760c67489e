//! Dataset sources for the movie index pipeline.
//!
//! A source yields the complete dataset as one in-memory sequence of
//! records before ingestion starts.

mod file_source;
mod http_source;

use async_trait::async_trait;

use crate::errors::PipelineError;
use movie_index_repository::MovieRecord;

pub use file_source::FileDatasetSource;
pub use http_source::{HttpDatasetSource, DEFAULT_DATASET_URL};

/// A place the movie dataset can be read from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch and parse the full dataset. Nothing is retried.
    async fn fetch(&self) -> Result<Vec<MovieRecord>, PipelineError>;

    /// Human-readable location of the dataset, for logging.
    fn location(&self) -> String;
}

/// Parse a dataset body: a JSON array of objects.
pub fn parse_records(body: &[u8]) -> Result<Vec<MovieRecord>, PipelineError> {
    serde_json::from_slice(body)
        .map_err(|e| PipelineError::fetch(format!("Dataset is not a JSON array of objects: {}", e)))
}
