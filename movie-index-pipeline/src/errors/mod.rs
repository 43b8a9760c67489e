//! Error types for the movie index pipeline.

use movie_index_repository::SearchError;
use thiserror::Error;

/// Process exit code for a search service that never became ready.
pub const EXIT_CONNECTIVITY: u8 = 2;
/// Process exit code for a failed call to the search service.
pub const EXIT_SERVICE: u8 = 3;
/// Process exit code for a failed dataset download or parse.
pub const EXIT_FETCH: u8 = 4;
/// Process exit code for invalid configuration (EX_USAGE).
pub const EXIT_CONFIG: u8 = 64;

/// Errors that can end a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The search service did not answer a ping within the retry budget.
    #[error("Could not connect to the search service after {attempts} attempts: {last_error}")]
    Connectivity { attempts: u32, last_error: String },

    /// A call to the search service failed.
    #[error("Search service error: {0}")]
    Service(#[from] SearchError),

    /// The index was deleted but creating it again failed; it is now absent.
    #[error("Index {index} was deleted but could not be recreated: {source}")]
    IndexRecreate {
        index: String,
        #[source]
        source: SearchError,
    },

    /// Downloading or parsing the dataset failed.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The pipeline was given an unusable setting.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Create a connectivity error.
    pub fn connectivity(attempts: u32, last_error: impl Into<String>) -> Self {
        Self::Connectivity {
            attempts,
            last_error: last_error.into(),
        }
    }

    /// Create a fetch error.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// The process exit code for this kind of error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Connectivity { .. } => EXIT_CONNECTIVITY,
            Self::Service(_) | Self::IndexRecreate { .. } => EXIT_SERVICE,
            Self::Fetch(_) => EXIT_FETCH,
            Self::Config(_) => EXIT_CONFIG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_per_kind() {
        let errors = [
            PipelineError::connectivity(30, "connection refused"),
            PipelineError::Service(SearchError::bulk_index("boom")),
            PipelineError::fetch("404"),
            PipelineError::config("batch size must be at least 1"),
        ];

        let codes: Vec<u8> = errors.iter().map(PipelineError::exit_code).collect();
        assert_eq!(codes, vec![2, 3, 4, 64]);
    }

    #[test]
    fn test_index_recreate_is_a_service_error() {
        let err = PipelineError::IndexRecreate {
            index: "movies".to_string(),
            source: SearchError::index_creation("status 500"),
        };

        assert_eq!(err.exit_code(), EXIT_SERVICE);
        assert!(err.to_string().contains("movies"));
    }

    #[test]
    fn test_connectivity_message() {
        let err = PipelineError::connectivity(30, "ping returned non-success status");
        assert_eq!(
            err.to_string(),
            "Could not connect to the search service after 30 attempts: ping returned non-success status"
        );
    }
}
