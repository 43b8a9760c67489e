//! HTTP dataset source.

use async_trait::async_trait;
use tracing::{debug, info, instrument};
use url::Url;

use super::{parse_records, DatasetSource};
use crate::errors::PipelineError;
use movie_index_repository::MovieRecord;

/// Public copy of the Wikipedia movie dataset.
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/prust/wikipedia-movie-data/master/movies.json";

/// Downloads the dataset with a single GET request.
pub struct HttpDatasetSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpDatasetSource {
    /// Create a source for the given URL.
    pub fn new(url: &str) -> Result<Self, PipelineError> {
        Self::with_client(reqwest::Client::new(), url)
    }

    /// Create a source that reuses an existing HTTP client.
    pub fn with_client(client: reqwest::Client, url: &str) -> Result<Self, PipelineError> {
        let url = Url::parse(url)
            .map_err(|e| PipelineError::config(format!("Invalid dataset URL {}: {}", url, e)))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl DatasetSource for HttpDatasetSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<MovieRecord>, PipelineError> {
        info!("Downloading sample data...");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| PipelineError::fetch(format!("Request error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::fetch(format!("HTTP {}", status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PipelineError::fetch(format!("Failed to read body: {}", e)))?;
        debug!(bytes = body.len(), "Dataset downloaded");

        let records = parse_records(&body)?;
        info!(records = records.len(), "Dataset parsed");
        Ok(records)
    }

    fn location(&self) -> String {
        self.url.to_string()
    }
}
