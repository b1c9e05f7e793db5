//! Core types for playback management

use crate::quality::QualityLevel;
use serde::{Deserialize, Serialize};

/// Base URL used to turn search hits into watch URLs
pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

/// A playable item
///
/// Produced from a resolver search hit and never mutated afterwards.
/// The URL is the item's identity inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Absolute watch URL
    pub url: String,

    /// Sanitized display title
    pub title: String,

    /// Duration as reported by the platform ("H:MM:SS" or "MM:SS")
    pub duration: String,
}

impl Track {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            duration: duration.into(),
        }
    }
}

/// Raw search result as returned by a resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Video id, URL suffix (starting with `/`) or absolute URL
    pub id_or_suffix: String,

    /// Unsanitized title
    pub title: String,

    /// Duration text, empty when unknown
    pub duration: String,
}

/// Audio streams resolved for one track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStreams {
    /// Audio-only stream URLs, lowest quality first
    pub urls: Vec<String>,

    /// Canonical title reported by the platform
    pub title: String,
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Nothing started yet
    Stopped,

    /// Resolving a stream; status polling is suspended
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Navigation direction for collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Next,
    Prev,
}

/// Mode flags toggled by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeFlags {
    /// Random order over the playlist
    pub shuffle: bool,

    /// Skip tracks that are not short
    pub short_song_filter: bool,

    /// Continue with the next playlist item when a track finishes
    pub autoplay: bool,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0-100, default: 60)
    pub volume: u8,

    /// Initial stream quality (default: index 1)
    pub quality: QualityLevel,

    /// Initial shuffle flag (default: off)
    pub shuffle: bool,

    /// Initial short-song filter flag (default: off)
    pub short_song_filter: bool,

    /// Initial autoplay flag (default: on)
    pub autoplay: bool,

    /// Step used by skip forward/back in milliseconds (default: 10000)
    pub skip_step_ms: i64,

    /// Maximum number of search results requested (default: 40)
    pub max_search_results: usize,

    /// Base URL for watch links built from search hits
    pub base_url: String,
}

impl PlaybackConfig {
    pub fn mode_flags(&self) -> ModeFlags {
        ModeFlags {
            shuffle: self.shuffle,
            short_song_filter: self.short_song_filter,
            autoplay: self.autoplay,
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 60,
            quality: QualityLevel::Index(1),
            shuffle: false,
            short_song_filter: false,
            autoplay: true,
            skip_step_ms: 10_000,
            max_search_results: 40,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Read-only view of the controller for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub current_title: Option<String>,
    pub previous_title: Option<String>,
    pub up_next_title: Option<String>,
    pub query_title: Option<String>,
    pub is_paused: bool,
    pub quality: String,
    pub flags: ModeFlags,
    pub volume: u8,
    pub is_muted: bool,
    pub playlist_len: usize,
    pub query_len: usize,
    pub unvisited: usize,
}
