//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The resolver could not search or resolve a track
    #[error("Resolution failed: {0}")]
    Resolution(String),

    /// The resolver found the track but no audio-only stream
    #[error("No playable stream for {url}")]
    NoPlayableStream { url: String },

    /// Playback device rejected a command
    #[error("Playback device error: {0}")]
    Device(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl PlaybackError {
    /// Whether this error means "nothing could be played" rather than a device fault
    pub fn is_resolution_failure(&self) -> bool {
        matches!(self, Self::Resolution(_) | Self::NoPlayableStream { .. })
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
