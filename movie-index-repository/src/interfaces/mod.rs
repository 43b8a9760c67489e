//! The `SearchEngineClient` seam between the load pipeline and the search
//! service. The pipeline only sees this trait, so tests run against an
//! in-memory engine.

mod search_engine_client;

pub use search_engine_client::SearchEngineClient;
