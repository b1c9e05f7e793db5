//! Playback Events
//!
//! Event-based communication for the presentation layer. The controller
//! queues events as it changes state; the UI drains them on its refresh tick:
//! - State changes (loading/playing/paused)
//! - Track starts and the "up next" title after playlist changes
//! - Mode flag changes forced by the controller (autoplay switched off)
//! - Non-fatal errors such as a track without playable streams

use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback state changed
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A track started playing
    TrackStarted {
        /// Title of the new current track
        title: String,
        /// Quality text of the selected stream, e.g. `"1"` or `"max (4)"`
        quality: String,
    },

    /// Track reached its end (detected by polling)
    TrackFinished {
        /// URL of the finished track
        url: String,
    },

    /// Playlist head changed
    UpNextChanged {
        /// Title of the new playlist head, if any
        title: Option<String>,
    },

    /// Search result selection changed
    QueryChanged {
        /// Title of the selected result, if any
        title: Option<String>,
        /// Number of results
        count: usize,
    },

    /// Playlist contents changed (tracks added/removed/cleared)
    PlaylistChanged {
        /// New playlist length
        length: usize,
    },

    /// Pause toggled
    PauseChanged {
        /// Whether playback is now paused
        paused: bool,
    },

    /// Autoplay flag changed
    AutoplayChanged {
        /// New autoplay state
        enabled: bool,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Error occurred; playback is back to idle
    Error {
        /// Error message
        message: String,
    },
}

impl PlaybackEvent {
    /// Short human-readable form for line-oriented front ends
    pub fn describe(&self) -> String {
        match self {
            PlaybackEvent::StateChanged { state } => format!("state: {:?}", state),
            PlaybackEvent::TrackStarted { title, quality } => {
                format!("now playing: {} [quality {}]", title, quality)
            }
            PlaybackEvent::TrackFinished { url } => format!("finished: {}", url),
            PlaybackEvent::UpNextChanged { title } => {
                format!("up next: {}", title.as_deref().unwrap_or("-"))
            }
            PlaybackEvent::QueryChanged { title, count } => format!(
                "result: {} ({} found)",
                title.as_deref().unwrap_or("-"),
                count
            ),
            PlaybackEvent::PlaylistChanged { length } => format!("playlist: {} tracks", length),
            PlaybackEvent::PauseChanged { paused } => {
                if *paused {
                    "paused".to_string()
                } else {
                    "resumed".to_string()
                }
            }
            PlaybackEvent::AutoplayChanged { enabled } => {
                format!("autoplay: {}", if *enabled { "on" } else { "off" })
            }
            PlaybackEvent::VolumeChanged { level, is_muted } => {
                if *is_muted {
                    format!("volume: {} (muted)", level)
                } else {
                    format!("volume: {}", level)
                }
            }
            PlaybackEvent::Error { message } => format!("error: {}", message),
        }
    }
}
