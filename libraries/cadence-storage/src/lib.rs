//! Cadence Storage
//!
//! File-based persistence for Cadence playlists.
//!
//! Playlists are JSON documents carrying a format version. Older unversioned
//! files (a bare array of tracks) are still readable. Saving never leaves a
//! half-written file behind: the document is written to a temporary file next
//! to the target and renamed over it.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_playback::Track;
//! use cadence_storage::playlists;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracks = vec![Track::new("https://www.youtube.com/watch?v=a", "A", "3:10")];
//! playlists::save_playlist(Path::new("mix.json"), &tracks)?;
//!
//! let loaded = playlists::load_playlist(Path::new("mix.json"))?;
//! assert_eq!(loaded, tracks);
//! # Ok(())
//! # }
//! ```

mod error;

pub mod playlists;

pub use error::{Result, StorageError};
pub use playlists::{PlaylistFile, PLAYLIST_FORMAT_VERSION};
