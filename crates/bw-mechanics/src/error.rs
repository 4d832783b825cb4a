//! Error types for the mechanics engine.

use bw_core::CoreError;

/// Errors that can occur during test resolution and advancement.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A referenced trait, skill or relationship is missing from the character.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The roll request was rejected before any dice were drawn.
    #[error("invalid roll request: {0}")]
    InvalidRequest(String),

    /// The character store refused an update.
    #[error("update rejected: {0}")]
    UpdateRejected(String),

    /// A rules configuration file could not be parsed.
    #[error("invalid rules config: {0}")]
    Config(#[from] toml::de::Error),

    /// A rules configuration file could not be read.
    #[error("could not read rules config: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
