//! Schema initializer for the movie index pipeline.
//!
//! Resets the target index so every run starts from an empty index with the
//! configured mapping.

use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::errors::PipelineError;
use movie_index_repository::{IndexConfig, SearchEngineClient};

/// Deletes and recreates the target index.
pub struct SchemaInitializer {
    client: Arc<dyn SearchEngineClient>,
}

impl SchemaInitializer {
    /// Create a new schema initializer with the given client.
    pub fn new(client: Arc<dyn SearchEngineClient>) -> Self {
        Self { client }
    }

    /// Reset the index described by `index`.
    ///
    /// An existing index is deleted unconditionally, documents included,
    /// then the index is created with `index.body`. Nothing is retried.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The index exists, empty, with the configured mapping
    /// * `Err(PipelineError::Service)` - The existence check, delete, or a
    ///   create with no prior delete failed
    /// * `Err(PipelineError::IndexRecreate)` - The delete succeeded but the
    ///   create failed; the index is now absent
    #[instrument(skip(self, index), fields(index = %index.name))]
    pub async fn reset(&self, index: &IndexConfig) -> Result<(), PipelineError> {
        info!("Creating index...");

        let existed = self.client.index_exists(&index.name).await?;
        if existed {
            info!(index = %index.name, "Deleting existing index");
            self.client.delete_index(&index.name).await?;
        }

        match self.client.create_index(&index.name, &index.body).await {
            Ok(()) => {
                info!(index = %index.name, "Index created");
                Ok(())
            }
            Err(e) if existed => {
                error!(
                    index = %index.name,
                    error = %e,
                    "Index was deleted but could not be recreated"
                );
                Err(PipelineError::IndexRecreate {
                    index: index.name.clone(),
                    source: e,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}
