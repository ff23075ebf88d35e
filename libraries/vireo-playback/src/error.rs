//! Error types for the playback session engine

use thiserror::Error;

/// Playback session errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The engine's event stream was already taken
    #[error("Engine event stream already claimed")]
    EngineEventsClaimed,

    /// Error from a core collaborator
    #[error(transparent)]
    Core(#[from] vireo_core::CoreError),
}

/// Result type for playback session operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
