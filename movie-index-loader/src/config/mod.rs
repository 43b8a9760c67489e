//! Configuration and dependency wiring for the movie index loader.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::Settings;
