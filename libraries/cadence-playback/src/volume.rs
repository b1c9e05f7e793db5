//! Volume control
//!
//! Volume range is 0-100%, passed to the playback device as-is. Muting
//! sends 0 to the device but keeps the chosen level for unmuting.

/// Highest level the playback device accepts
pub const MAX_VOLUME: u8 = 100;

/// Volume controller
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume (clamped to 0-100)
    pub fn new(level: u8) -> Self {
        Self {
            level: level.min(MAX_VOLUME),
            muted: false,
        }
    }

    /// Set volume level from any integer, clamped to the device range
    pub fn set_level(&mut self, level: i32) {
        self.level = level.clamp(0, i32::from(MAX_VOLUME)) as u8;
    }

    /// Get current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Level to send to the playback device
    ///
    /// Returns 0 if muted, otherwise the level
    pub fn device_level(&self) -> i32 {
        if self.muted {
            0
        } else {
            i32::from(self.level)
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(60)
    }
}
