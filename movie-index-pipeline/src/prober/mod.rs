//! Readiness prober for the movie index pipeline.
//!
//! Polls the search service until it answers a ping.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

use crate::errors::PipelineError;
use movie_index_repository::SearchEngineClient;

/// Configuration for the readiness prober.
#[derive(Debug, Clone)]
pub struct ProberConfig {
    /// Maximum number of pings before giving up.
    pub max_attempts: u32,
    /// Pause between a failed ping and the next one.
    pub interval: Duration,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(2),
        }
    }
}

/// Waits for the search service to become ready.
///
/// Every failure is treated the same way: a refused connection, a timeout
/// and a non-success status all count as one failed attempt.
pub struct ReadinessProber {
    client: Arc<dyn SearchEngineClient>,
    config: ProberConfig,
}

impl ReadinessProber {
    /// Create a new prober with the default retry budget.
    pub fn new(client: Arc<dyn SearchEngineClient>) -> Self {
        Self {
            client,
            config: ProberConfig::default(),
        }
    }

    /// Create a new prober with a custom retry budget.
    pub fn with_config(client: Arc<dyn SearchEngineClient>, config: ProberConfig) -> Self {
        Self { client, config }
    }

    /// Ping until the service answers or the attempts run out.
    ///
    /// No pause follows the last failed attempt.
    ///
    /// # Returns
    ///
    /// * `Ok(attempt)` - The 1-based attempt on which the ping succeeded
    /// * `Err(PipelineError::Connectivity)` - If every attempt failed
    #[instrument(skip(self), fields(max_attempts = self.config.max_attempts))]
    pub async fn wait_until_ready(&self) -> Result<u32, PipelineError> {
        let max_attempts = self.config.max_attempts;
        if max_attempts == 0 {
            return Err(PipelineError::config("max attempts must be at least 1"));
        }

        info!("Waiting for the search service to be ready...");

        let mut attempt = 0;
        loop {
            attempt += 1;

            let failure = match self.client.ping().await {
                Ok(true) => {
                    info!(attempt, "Successfully connected to the search service");
                    return Ok(attempt);
                }
                Ok(false) => "ping returned a non-success status".to_string(),
                Err(e) => e.to_string(),
            };

            debug!(attempt, error = %failure, "Ping failed");
            info!("Waiting for the search service... ({}/{})", attempt, max_attempts);

            if attempt >= max_attempts {
                return Err(PipelineError::connectivity(attempt, failure));
            }

            sleep(self.config.interval).await;
        }
    }
}
