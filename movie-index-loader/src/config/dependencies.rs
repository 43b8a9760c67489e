//! Dependency initialization and wiring for the movie index loader.

use std::sync::Arc;
use tracing::info;

use crate::config::Settings;
use crate::LoaderError;
use movie_index_pipeline::orchestrator::Orchestrator;
use movie_index_pipeline::source::{DatasetSource, FileDatasetSource, HttpDatasetSource};
use movie_index_repository::{OpenSearchClient, SearchEngineClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from the settings.
    ///
    /// Nothing here talks to the search service; reachability is the
    /// orchestrator's first step.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(LoaderError)` - If a setting is invalid
    pub async fn new(settings: &Settings) -> Result<Self, LoaderError> {
        settings.validate()?;

        info!(
            search_url = %settings.search_url,
            index = %settings.index_name,
            batch_size = settings.batch_size,
            "Initializing dependencies"
        );

        let client: Arc<dyn SearchEngineClient> = Arc::new(OpenSearchClient::new(
            &settings.search_url,
            settings.request_timeout(),
        )?);

        let source: Box<dyn DatasetSource> = match &settings.dataset_file {
            Some(path) => Box::new(FileDatasetSource::new(path)),
            None => Box::new(HttpDatasetSource::new(&settings.dataset_url)?),
        };

        let config = settings.orchestrator_config().await?;
        let orchestrator = Orchestrator::with_config(client, source, config);

        Ok(Self { orchestrator })
    }
}
