//! # Movie Index Pipeline
//!
//! This crate provides the pipeline components for loading the movie dataset
//! into the search service.
//!
//! ## Architecture
//!
//! A run is strictly sequential:
//!
//! 1. **Prober**: Waits until the search service answers pings
//! 2. **Schema**: Deletes and recreates the target index with its mapping
//! 3. **Source**: Fetches the full dataset into memory
//! 4. **Loader**: Writes the records in fixed-size, paced bulk batches
//! 5. **Orchestrator**: Sequences the steps and verifies the final count

pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod prober;
pub mod schema;
pub mod source;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::PipelineError;
