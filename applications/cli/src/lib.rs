//! Cadence - terminal front end
//!
//! Wires the playback core to real collaborators:
//! - `yt-dlp` for search and stream resolution
//! - `mpv` (over JSON IPC) for audio output
//! - playlist files from `cadence-storage`
//!
//! and runs a line-oriented command loop with a status polling tick.

pub mod app;
pub mod commands;
pub mod config;
pub mod device;
pub mod error;
pub mod resolver;

pub use error::{AppError, Result};
