//! Playlist files
//!
//! Current format:
//!
//! ```json
//! { "version": 1, "tracks": [ { "url": "...", "title": "...", "duration": "3:10" } ] }
//! ```
//!
//! Legacy format: the bare `tracks` array.

use std::io::Write;
use std::path::Path;

use cadence_playback::Track;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Result, StorageError};

/// Format version written by `save_playlist`
pub const PLAYLIST_FORMAT_VERSION: u32 = 1;

/// Versioned playlist document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistFile {
    pub version: u32,
    pub tracks: Vec<Track>,
}

impl PlaylistFile {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            version: PLAYLIST_FORMAT_VERSION,
            tracks,
        }
    }
}

/// Borrowed form used for writing
#[derive(Serialize)]
struct PlaylistFileRef<'a> {
    version: u32,
    tracks: &'a [Track],
}

/// Any document shape we can read
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPlaylist {
    Versioned(PlaylistFile),
    Legacy(Vec<Track>),
}

/// Parse a playlist document in either format
pub fn parse_playlist(json: &str) -> Result<Vec<Track>> {
    match serde_json::from_str::<StoredPlaylist>(json)? {
        StoredPlaylist::Versioned(file) => {
            if file.version != PLAYLIST_FORMAT_VERSION {
                return Err(StorageError::UnsupportedVersion {
                    found: file.version,
                    supported: PLAYLIST_FORMAT_VERSION,
                });
            }
            Ok(file.tracks)
        }
        StoredPlaylist::Legacy(tracks) => {
            debug!(count = tracks.len(), "Read legacy playlist format");
            Ok(tracks)
        }
    }
}

/// Render tracks as a current-format document
pub fn playlist_to_json(tracks: &[Track]) -> Result<String> {
    let document = PlaylistFileRef {
        version: PLAYLIST_FORMAT_VERSION,
        tracks,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Read a playlist file
pub fn load_playlist(path: &Path) -> Result<Vec<Track>> {
    let json = std::fs::read_to_string(path)?;
    let tracks = parse_playlist(&json)?;
    info!(path = %path.display(), count = tracks.len(), "Playlist loaded");
    Ok(tracks)
}

/// Write a playlist file atomically
///
/// The target is either fully replaced or left as it was.
pub fn save_playlist(path: &Path, tracks: &[Track]) -> Result<()> {
    let json = playlist_to_json(tracks)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| StorageError::Io(e.error))?;

    info!(path = %path.display(), count = tracks.len(), "Playlist saved");
    Ok(())
}
