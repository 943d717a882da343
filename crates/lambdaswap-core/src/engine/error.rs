use thiserror::Error;

use super::config::ConfigError;

/// Faults of the move machinery itself.
///
/// Rejected moves are not errors; they are reported through
/// [`MoveOutcome`](super::moves::MoveOutcome). An `EngineError` means the
/// state or its configuration is inconsistent, and the state is left as it
/// was before the call.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Component index {component} out of range (system has {available} components)")]
    InvalidComponent { component: usize, available: usize },

    #[error("Component {component} has no fractional molecule")]
    MissingFractionalMolecule { component: usize },

    #[error("Component '{name}' has an empty molecule template")]
    EmptyTemplate { name: String },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
