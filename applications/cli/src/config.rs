/// Application configuration
use crate::error::{AppError, Result};
use cadence_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "cadence.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_resolver")]
    pub resolver: ResolverSettings,

    #[serde(default = "default_device")]
    pub device: DeviceSettings,

    #[serde(default = "default_ui")]
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverSettings {
    #[serde(default = "default_yt_dlp_path")]
    pub yt_dlp_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceSettings {
    #[serde(default = "default_mpv_path")]
    pub mpv_path: PathBuf,

    /// IPC socket; a per-process path in the temp dir when unset
    #[serde(default)]
    pub socket_path: Option<PathBuf>,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiSettings {
    /// Status polling interval
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit path must exist. Without one, `cadence.toml` in the working
    /// directory is used if present. Environment variables override both,
    /// e.g. `CADENCE__PLAYBACK__VOLUME=80`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with CADENCE__)
        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.ui.poll_interval_ms == 0 {
            return Err(AppError::Config(
                "ui.poll_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.playback.volume > cadence_playback::MAX_VOLUME {
            return Err(AppError::Config(format!(
                "playback.volume must be at most {}",
                cadence_playback::MAX_VOLUME
            )));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.ui.poll_interval_ms)
    }
}

impl DeviceSettings {
    /// Socket path to hand to mpv
    pub fn resolved_socket_path(&self) -> PathBuf {
        self.socket_path.clone().unwrap_or_else(|| {
            std::env::temp_dir().join(format!("cadence-mpv-{}.sock", std::process::id()))
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

// Default values
fn default_resolver() -> ResolverSettings {
    ResolverSettings {
        yt_dlp_path: default_yt_dlp_path(),
    }
}

fn default_yt_dlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_device() -> DeviceSettings {
    DeviceSettings {
        mpv_path: default_mpv_path(),
        socket_path: None,
        connect_timeout_ms: default_connect_timeout_ms(),
    }
}

fn default_mpv_path() -> PathBuf {
    PathBuf::from("mpv")
}

fn default_connect_timeout_ms() -> u64 {
    5000
}

fn default_ui() -> UiSettings {
    UiSettings {
        poll_interval_ms: default_poll_interval_ms(),
    }
}

fn default_poll_interval_ms() -> u64 {
    500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            resolver: default_resolver(),
            device: default_device(),
            ui: default_ui(),
        }
    }
}
