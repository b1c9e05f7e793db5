//! Stream quality selection
//!
//! Resolvers return audio-only streams ordered from lowest to highest
//! quality. The user picks a tier by index, or asks for the best one.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selected quality tier
///
/// Serialized as text: `"max"` or the index (`"0"`, `"1"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QualityLevel {
    /// Index into the ascending stream list
    Index(usize),

    /// Always the highest available stream
    Max,
}

/// User command changing the quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityCommand {
    Raise,
    Lower,
    Max,
    Min,
}

impl QualityLevel {
    /// Apply a quality command
    ///
    /// Raising from `Max` stays at `Max`. Lowering from `Max` drops back to
    /// index 1, the default tier.
    pub fn apply(self, command: QualityCommand) -> Self {
        match (command, self) {
            (QualityCommand::Max, _) => QualityLevel::Max,
            (QualityCommand::Min, _) => QualityLevel::Index(0),
            (QualityCommand::Raise, QualityLevel::Max) => QualityLevel::Max,
            (QualityCommand::Raise, QualityLevel::Index(index)) => {
                QualityLevel::Index(index.saturating_add(1))
            }
            (QualityCommand::Lower, QualityLevel::Max) => QualityLevel::Index(1),
            (QualityCommand::Lower, QualityLevel::Index(index)) => {
                QualityLevel::Index(index.saturating_sub(1))
            }
        }
    }
}

impl Default for QualityLevel {
    fn default() -> Self {
        QualityLevel::Index(1)
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityLevel::Index(index) => write!(f, "{}", index),
            QualityLevel::Max => f.write_str("max"),
        }
    }
}

impl FromStr for QualityLevel {
    type Err = PlaybackError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("max") {
            return Ok(QualityLevel::Max);
        }
        s.parse::<usize>()
            .map(QualityLevel::Index)
            .map_err(|_| PlaybackError::InvalidOperation(format!("Invalid quality level: {}", s)))
    }
}

impl TryFrom<String> for QualityLevel {
    type Error = PlaybackError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<QualityLevel> for String {
    fn from(level: QualityLevel) -> Self {
        level.to_string()
    }
}

/// Stream picked for playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedStream {
    /// Position in the resolved list
    pub index: usize,

    /// Stream URL handed to the playback device
    pub url: String,

    /// Quality text for display, e.g. `"1"` or `"max (4)"`
    pub display: String,
}

/// Pick a stream from an ascending-quality list
///
/// Falls back to the best stream when the requested tier does not exist.
/// An empty list means the track cannot be played.
pub fn select_stream(urls: &[String], level: QualityLevel) -> Result<SelectedStream> {
    let Some(last) = urls.len().checked_sub(1) else {
        return Err(PlaybackError::NoPlayableStream {
            url: String::new(),
        });
    };

    match level {
        QualityLevel::Index(index) if index < urls.len() => Ok(SelectedStream {
            index,
            url: urls[index].clone(),
            display: index.to_string(),
        }),
        _ => Ok(SelectedStream {
            index: last,
            url: urls[last].clone(),
            display: format!("max ({})", urls.len()),
        }),
    }
}
