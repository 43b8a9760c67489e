//! Command-line and environment settings.

use std::path::PathBuf;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;
use serde_json::Value;

use crate::LoaderError;
use movie_index_pipeline::errors::EXIT_CONFIG;
use movie_index_pipeline::loader::LoaderConfig;
use movie_index_pipeline::orchestrator::OrchestratorConfig;
use movie_index_pipeline::prober::ProberConfig;
use movie_index_pipeline::source::DEFAULT_DATASET_URL;
use movie_index_repository::opensearch::{DEFAULT_INDEX_NAME, DEFAULT_REQUEST_TIMEOUT};
use movie_index_repository::IndexConfig;

/// Settings for one load. Every flag can also be set through the
/// environment (or a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(name = "movie-index-loader")]
#[command(about = "Bulk-load the movie dataset into a search index", long_about = None)]
pub struct Settings {
    /// Search service URL
    #[arg(long, env = "OPENSEARCH_URL", default_value = "http://localhost:9200")]
    pub search_url: String,

    /// Index to (re)create and load
    #[arg(long, env = "INDEX_NAME", default_value = DEFAULT_INDEX_NAME)]
    pub index_name: String,

    /// JSON file with the create-index body, replacing the built-in movie mapping
    #[arg(long, env = "MAPPING_FILE")]
    pub mapping_file: Option<PathBuf>,

    /// URL of the dataset (a JSON array of movie objects)
    #[arg(long, env = "DATASET_URL", default_value = DEFAULT_DATASET_URL)]
    pub dataset_url: String,

    /// Read the dataset from a local file instead of downloading it
    #[arg(long, env = "DATASET_FILE")]
    pub dataset_file: Option<PathBuf>,

    /// Records per bulk request
    #[arg(long, env = "BATCH_SIZE", default_value = "1000")]
    pub batch_size: usize,

    /// Pause between bulk requests, in milliseconds
    #[arg(long, env = "PACING_DELAY_MS", default_value = "100")]
    pub pacing_delay_ms: u64,

    /// Pings before giving up on the search service
    #[arg(long, env = "READINESS_MAX_ATTEMPTS", default_value = "30")]
    pub max_attempts: u32,

    /// Pause between failed pings, in milliseconds
    #[arg(long, env = "READINESS_INTERVAL_MS", default_value = "2000")]
    pub retry_interval_ms: u64,

    /// Timeout for each request to the search service, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub request_timeout_secs: u64,
}

impl Settings {
    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.batch_size == 0 {
            return Err(LoaderError::config("batch size must be at least 1"));
        }
        if self.max_attempts == 0 {
            return Err(LoaderError::config("max attempts must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(LoaderError::config("request timeout must be at least 1 second"));
        }
        if self.index_name.trim().is_empty() {
            return Err(LoaderError::config("index name must not be empty"));
        }
        Ok(())
    }

    /// Exit code for a command line clap refused to parse. Help output is
    /// not a failure; everything else is a configuration error.
    pub fn parse_error_exit_code(err: &clap::Error) -> u8 {
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
            _ => EXIT_CONFIG,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolve the index name and create body, reading the mapping file if set.
    pub async fn index_config(&self) -> Result<IndexConfig, LoaderError> {
        let Some(path) = &self.mapping_file else {
            return Ok(IndexConfig::movies(&self.index_name));
        };

        let raw = tokio::fs::read(path).await.map_err(|e| {
            LoaderError::config(format!("Failed to read mapping file {}: {}", path.display(), e))
        })?;
        let body: Value = serde_json::from_slice(&raw).map_err(|e| {
            LoaderError::config(format!("Invalid mapping file {}: {}", path.display(), e))
        })?;
        if !body.is_object() {
            return Err(LoaderError::config(format!(
                "Mapping file {} must contain a JSON object",
                path.display()
            )));
        }

        Ok(IndexConfig::new(&self.index_name, body))
    }

    /// Build the pipeline configuration.
    pub async fn orchestrator_config(&self) -> Result<OrchestratorConfig, LoaderError> {
        Ok(OrchestratorConfig {
            index: self.index_config().await?,
            prober: ProberConfig {
                max_attempts: self.max_attempts,
                interval: Duration::from_millis(self.retry_interval_ms),
            },
            loader: LoaderConfig {
                batch_size: self.batch_size,
                pacing_delay: Duration::from_millis(self.pacing_delay_ms),
            },
        })
    }
}

/// Parse `args` the way the binary does, but without the environment
/// fallbacks, so variables set around the test run cannot leak in.
#[cfg(test)]
pub(crate) fn try_parse_args(args: &[&str]) -> Result<Settings, clap::Error> {
    use clap::{CommandFactory, FromArgMatches};

    let mut argv = vec!["movie-index-loader"];
    argv.extend_from_slice(args);
    let matches = Settings::command()
        .mut_args(|arg| arg.env(None::<&'static str>))
        .try_get_matches_from(argv)?;
    Settings::from_arg_matches(&matches)
}
