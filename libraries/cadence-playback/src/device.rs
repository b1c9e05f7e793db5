//! Playback device abstraction
//!
//! The controller never decodes audio. It hands a stream URL to a media
//! engine and polls it for position and length.

use crate::error::Result;

/// Media engine that plays stream URLs
///
/// Implementors wrap a concrete player (an `mpv` process on desktop, a fake
/// in tests). Queries take `&mut self` because talking to an out-of-process
/// player needs a mutable connection. Queries return 0 when nothing is
/// loaded or the value is unavailable.
pub trait PlaybackDevice {
    /// Load a stream, replacing whatever was loaded
    fn load(&mut self, stream_url: &str) -> Result<()>;

    /// Start playing the loaded stream
    fn play(&mut self) -> Result<()>;

    /// Pause or resume
    fn set_paused(&mut self, paused: bool) -> Result<()>;

    /// Elapsed time in milliseconds
    fn position_ms(&mut self) -> i64;

    /// Jump to a position in milliseconds
    fn set_position_ms(&mut self, position_ms: i64) -> Result<()>;

    /// Total length of the loaded stream in milliseconds
    fn length_ms(&mut self) -> i64;

    /// Current volume (0-100)
    fn volume(&mut self) -> i32;

    /// Set volume (0-100)
    fn set_volume(&mut self, level: i32) -> Result<()>;
}

/// Decides whether the loaded track just finished
///
/// The desktop device has no end-of-track event, so completion is inferred
/// from polled position and length. An event-capable device can supply its
/// own detector.
pub trait CompletionDetector: Send {
    fn is_finished(&self, position_ms: i64, length_ms: i64) -> bool;
}

/// Polling heuristic: the track is done when the position is within a
/// threshold of a known length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearEndDetector {
    pub threshold_ms: i64,
}

impl NearEndDetector {
    pub const DEFAULT_THRESHOLD_MS: i64 = 1000;
}

impl Default for NearEndDetector {
    fn default() -> Self {
        Self {
            threshold_ms: Self::DEFAULT_THRESHOLD_MS,
        }
    }
}

impl CompletionDetector for NearEndDetector {
    fn is_finished(&self, position_ms: i64, length_ms: i64) -> bool {
        length_ms > 0 && (position_ms - length_ms).abs() < self.threshold_ms
    }
}

/// Device that records every command
///
/// Position and length are plain fields the test sets directly.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingDevice {
    pub loaded: Vec<String>,
    pub play_calls: usize,
    pub paused: Option<bool>,
    pub position_ms: i64,
    pub length_ms: i64,
    pub volume: i32,
    pub seeks: Vec<i64>,
}

#[cfg(test)]
impl PlaybackDevice for RecordingDevice {
    fn load(&mut self, stream_url: &str) -> Result<()> {
        self.loaded.push(stream_url.to_string());
        self.position_ms = 0;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.play_calls += 1;
        self.paused = Some(false);
        Ok(())
    }

    fn set_paused(&mut self, paused: bool) -> Result<()> {
        self.paused = Some(paused);
        Ok(())
    }

    fn position_ms(&mut self) -> i64 {
        self.position_ms
    }

    fn set_position_ms(&mut self, position_ms: i64) -> Result<()> {
        self.seeks.push(position_ms);
        self.position_ms = position_ms;
        Ok(())
    }

    fn length_ms(&mut self) -> i64 {
        self.length_ms
    }

    fn volume(&mut self) -> i32 {
        self.volume
    }

    fn set_volume(&mut self, level: i32) -> Result<()> {
        self.volume = level;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_end_requires_known_length() {
        let detector = NearEndDetector::default();
        assert!(!detector.is_finished(0, 0));
        assert!(!detector.is_finished(500, 0));
    }

    #[test]
    fn near_end_within_one_second() {
        let detector = NearEndDetector::default();
        assert!(detector.is_finished(119_600, 120_000));
        assert!(detector.is_finished(120_000, 120_000));
        assert!(!detector.is_finished(119_000, 120_000));
        assert!(!detector.is_finished(60_000, 120_000));
    }

    #[test]
    fn custom_threshold() {
        let detector = NearEndDetector { threshold_ms: 250 };
        assert!(!detector.is_finished(119_600, 120_000));
        assert!(detector.is_finished(119_900, 120_000));
    }

    #[test]
    fn recording_device_resets_position_on_load() {
        let mut device = RecordingDevice::default();
        device.position_ms = 5000;
        device.load("https://cdn.example/a").unwrap();
        assert_eq!(device.position_ms(), 0);
        assert_eq!(device.loaded, vec!["https://cdn.example/a"]);
    }
}
