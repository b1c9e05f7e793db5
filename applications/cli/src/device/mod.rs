//! Playback devices backed by external players

#[cfg(unix)]
mod mpv;

#[cfg(unix)]
pub use mpv::MpvDevice;

pub use ipc::{build_request, parse_reply};

mod ipc;
