//! # Movie Index Loader
//!
//! Main library for the movie index loader.
//!
//! This crate provides the configuration surface and dependency wiring for
//! running a single load of the movie dataset into the search service.

pub mod config;

pub use config::{Dependencies, Settings};

use std::error::Error as _;

use movie_index_pipeline::errors::EXIT_CONFIG;
use movie_index_pipeline::PipelineError;
use movie_index_repository::SearchError;
use thiserror::Error;

/// Errors that can occur during loader initialization or execution.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error(transparent)]
    PipelineError(#[from] PipelineError),

    /// Search client construction error.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),
}

impl LoaderError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// The process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ConfigError(_) | Self::SearchError(_) => EXIT_CONFIG,
            Self::PipelineError(e) => e.exit_code(),
        }
    }

    /// The error message followed by each cause in the chain, skipping
    /// causes whose text an earlier line already shows.
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines = vec![self.to_string()];
        let mut source = self.source();
        while let Some(err) = source {
            let text = err.to_string();
            if !lines.iter().any(|line| line.contains(&text)) {
                lines.push(text);
            }
            source = err.source();
        }
        lines
    }
}
