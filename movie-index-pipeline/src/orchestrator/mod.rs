//! Orchestrator module for the movie index pipeline.
//!
//! Sequences the prober, schema initializer, dataset source and loader for
//! a single run.

use std::fmt;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::errors::PipelineError;
use crate::loader::{BulkLoader, LoaderConfig};
use crate::prober::{ProberConfig, ReadinessProber};
use crate::schema::SchemaInitializer;
use crate::source::DatasetSource;
use movie_index_repository::{IndexConfig, SearchEngineClient};

/// Configuration for a run.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    /// Target index name and create body.
    pub index: IndexConfig,
    /// Readiness retry budget.
    pub prober: ProberConfig,
    /// Batch size and pacing.
    pub loader: LoaderConfig,
}

/// Where a run currently is.
///
/// A run moves strictly forward through the steps; `Failed` can be entered
/// from any of them and is terminal, like `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Probing,
    Initializing,
    Fetching,
    Ingesting,
    Verifying,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Probing => "probing",
            Self::Initializing => "initializing",
            Self::Fetching => "fetching",
            Self::Ingesting => "ingesting",
            Self::Verifying => "verifying",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    /// Ping attempt on which the service answered.
    pub attempts: u32,
    /// Records in the fetched dataset.
    pub fetched: usize,
    /// Records sent in bulk requests.
    pub submitted: usize,
    /// Records the service rejected.
    pub rejected: usize,
    /// Documents the index reported at the end of the run.
    pub indexed_count: u64,
}

/// Orchestrator that runs one load from start to finish.
///
/// The orchestrator owns the search client and hands it to each component;
/// nothing is retried at this level.
pub struct Orchestrator {
    client: Arc<dyn SearchEngineClient>,
    source: Box<dyn DatasetSource>,
    prober: ReadinessProber,
    schema: SchemaInitializer,
    loader: BulkLoader,
    index: IndexConfig,
    state: RunState,
}

impl Orchestrator {
    /// Create a new orchestrator with default configuration.
    pub fn new(client: Arc<dyn SearchEngineClient>, source: Box<dyn DatasetSource>) -> Self {
        Self::with_config(client, source, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        client: Arc<dyn SearchEngineClient>,
        source: Box<dyn DatasetSource>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            prober: ReadinessProber::with_config(client.clone(), config.prober),
            schema: SchemaInitializer::new(client.clone()),
            loader: BulkLoader::with_config(client.clone(), config.loader),
            client,
            source,
            index: config.index,
            state: RunState::Idle,
        }
    }

    /// The current state of the run.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the load.
    ///
    /// On error the orchestrator ends in `RunState::Failed` and returns the
    /// error that stopped it.
    #[instrument(skip(self), fields(index = %self.index.name))]
    pub async fn run(&mut self) -> Result<RunReport, PipelineError> {
        info!(source = %self.source.location(), "Starting movie index load");

        match self.run_steps().await {
            Ok(report) => {
                self.transition(RunState::Done);
                Ok(report)
            }
            Err(e) => {
                let failed_in = self.state;
                self.transition(RunState::Failed);
                error!(step = %failed_in, error = %e, "Run failed");
                Err(e)
            }
        }
    }

    async fn run_steps(&mut self) -> Result<RunReport, PipelineError> {
        let mut report = RunReport::default();

        self.transition(RunState::Probing);
        report.attempts = self.prober.wait_until_ready().await?;

        self.transition(RunState::Initializing);
        self.schema.reset(&self.index).await?;

        self.transition(RunState::Fetching);
        let records = self.source.fetch().await?;
        report.fetched = records.len();

        self.transition(RunState::Ingesting);
        let summary = self.loader.ingest(&self.index.name, &records).await?;
        report.submitted = summary.submitted;
        report.rejected = summary.rejected;

        self.transition(RunState::Verifying);
        report.indexed_count = self.client.count(&self.index.name).await?;

        if report.indexed_count != report.fetched as u64 {
            // Refresh lag or rejected documents; reported, not an error.
            info!(
                fetched = report.fetched,
                indexed = report.indexed_count,
                rejected = report.rejected,
                "Index count differs from fetched records"
            );
        }

        Ok(report)
    }

    fn transition(&mut self, next: RunState) {
        info!(from = %self.state, to = %next, "Run state changed");
        self.state = next;
    }
}
