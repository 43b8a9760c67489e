//! Loader module for the movie index pipeline.
//!
//! Writes records into the search index in fixed-size bulk batches.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use crate::errors::PipelineError;
use movie_index_repository::{MovieRecord, SearchEngineClient};

/// Configuration for the bulk loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Maximum number of records per bulk request.
    pub batch_size: usize,
    /// Pause between consecutive bulk requests, to avoid saturating the service.
    pub pacing_delay: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            pacing_delay: Duration::from_millis(100),
        }
    }
}

/// Outcome of a completed ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IngestSummary {
    /// Number of bulk requests sent.
    pub batches: usize,
    /// Number of records sent.
    pub submitted: usize,
    /// Number of records the service rejected inside otherwise successful requests.
    pub rejected: usize,
    /// Running total of records sent after each batch, as reported in the
    /// progress log.
    pub progress: Vec<usize>,
}

/// Loader that writes records into the search engine in bulk.
///
/// The loader is best-effort per document: rejected documents are counted
/// and logged but do not stop the run. A failed bulk request stops the run
/// and is not retried; batches already sent stay in the index.
pub struct BulkLoader {
    client: Arc<dyn SearchEngineClient>,
    config: LoaderConfig,
}

impl BulkLoader {
    /// Create a new loader with the default batch size and pacing.
    pub fn new(client: Arc<dyn SearchEngineClient>) -> Self {
        Self {
            client,
            config: LoaderConfig::default(),
        }
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(client: Arc<dyn SearchEngineClient>, config: LoaderConfig) -> Self {
        Self { client, config }
    }

    /// Index `records` into `index`, in order, one bulk request per batch.
    ///
    /// Batches are contiguous slices of at most `batch_size` records; only
    /// the last may be shorter. An empty input sends nothing.
    #[instrument(skip(self, records), fields(records = records.len(), batch_size = self.config.batch_size))]
    pub async fn ingest(
        &self,
        index: &str,
        records: &[MovieRecord],
    ) -> Result<IngestSummary, PipelineError> {
        let batch_size = self.config.batch_size;
        if batch_size == 0 {
            return Err(PipelineError::config("batch size must be at least 1"));
        }

        info!("Inserting data...");

        let total_batches = records.len().div_ceil(batch_size);
        let mut summary = IngestSummary::default();

        for (batch_number, batch) in records.chunks(batch_size).enumerate() {
            let result = match self.client.bulk_index(index, batch).await {
                Ok(result) => result,
                Err(e) => {
                    error!(
                        batch = batch_number + 1,
                        total_batches,
                        submitted = summary.submitted,
                        first_title = batch.first().and_then(MovieRecord::title).unwrap_or("-"),
                        error = %e,
                        "Bulk request failed; remaining batches skipped"
                    );
                    return Err(e.into());
                }
            };

            summary.batches += 1;
            summary.submitted += batch.len();
            summary.rejected += result.failed;

            if result.has_failures() {
                let first_reason = result
                    .failures
                    .first()
                    .map(|f| f.reason.as_str())
                    .unwrap_or("unknown");
                warn!(
                    batch = batch_number + 1,
                    rejected = result.failed,
                    first_reason = %first_reason,
                    "Documents rejected in batch"
                );
            }

            summary.progress.push(summary.submitted);
            info!("Inserted {} records...", summary.submitted);

            if batch_number + 1 < total_batches {
                sleep(self.config.pacing_delay).await;
            }
        }

        Ok(summary)
    }
}
