/// Application error types
use cadence_playback::PlaybackError;
use cadence_storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown command: {0} (type `help`)")]
    UnknownCommand(String),

    #[error("Invalid argument for {command}: {reason}")]
    InvalidArgument { command: String, reason: String },

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("Playlist file error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn invalid_argument(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            command: command.into(),
            reason: reason.into(),
        }
    }
}
