//! Error types for the movie index repository.

mod search_error;

pub use search_error::SearchError;
