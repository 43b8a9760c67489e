//! Local file dataset source.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use super::{parse_records, DatasetSource};
use crate::errors::PipelineError;
use movie_index_repository::MovieRecord;

/// Reads the dataset from a JSON file on disk, for offline runs.
pub struct FileDatasetSource {
    path: PathBuf,
}

impl FileDatasetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileDatasetSource {
    async fn fetch(&self) -> Result<Vec<MovieRecord>, PipelineError> {
        info!(path = %self.path.display(), "Reading sample data...");

        let body = tokio::fs::read(&self.path).await.map_err(|e| {
            PipelineError::fetch(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        parse_records(&body)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
