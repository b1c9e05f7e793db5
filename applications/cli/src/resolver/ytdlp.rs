//! `yt-dlp` resolver
//!
//! Search uses the flat playlist mode (one JSON object per line, no stream
//! lookup). Stream resolution dumps the full info document and keeps the
//! audio-only formats, which `yt-dlp` lists from worst to best.

use cadence_playback::{
    format_duration, PlaybackError, ResolvedStreams, Result, SearchHit, TrackResolver,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// Resolver shelling out to `yt-dlp`
#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    program: PathBuf,
}

impl YtDlpResolver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                PlaybackError::Resolution(format!(
                    "Failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PlaybackError::Resolution(format!(
                "yt-dlp failed: {}",
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TrackResolver for YtDlpResolver {
    fn search(&mut self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let target = format!("ytsearch{}:{}", max_results, query);
        debug!(query, max_results, "Searching");
        let stdout = self.run(&["--flat-playlist", "--dump-json", "--no-warnings", target.as_str()])?;
        Ok(parse_search_output(&stdout))
    }

    fn resolve_streams(&mut self, track_url: &str) -> Result<ResolvedStreams> {
        debug!(url = %track_url, "Resolving streams");
        let stdout = self.run(&[
            "--dump-single-json",
            "--no-playlist",
            "--no-warnings",
            track_url,
        ])?;
        parse_stream_output(&stdout)
    }
}

#[derive(Deserialize)]
struct FlatEntry {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

#[derive(Deserialize)]
struct VideoInfo {
    #[serde(default)]
    title: String,
    #[serde(default)]
    formats: Vec<Format>,
}

#[derive(Deserialize)]
struct Format {
    url: Option<String>,
    #[serde(default)]
    resolution: Option<String>,
    #[serde(default)]
    vcodec: Option<String>,
    #[serde(default)]
    acodec: Option<String>,
}

impl Format {
    fn is_audio_only(&self) -> bool {
        if self.resolution.as_deref() == Some("audio only") {
            return true;
        }
        self.vcodec.as_deref() == Some("none")
            && self.acodec.as_deref().is_some_and(|codec| codec != "none")
    }
}

/// Parse flat search output, one JSON entry per line
///
/// Lines that are not entries (warnings, blank lines) are skipped.
pub fn parse_search_output(stdout: &str) -> Vec<SearchHit> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| match serde_json::from_str::<FlatEntry>(line) {
            Ok(entry) => Some(SearchHit {
                id_or_suffix: entry.id,
                title: entry.title.unwrap_or_default(),
                duration: entry
                    .duration
                    .map(|secs| format_duration(secs.round() as u64))
                    .unwrap_or_default(),
            }),
            Err(e) => {
                debug!(error = %e, "Skipping unparseable search line");
                None
            }
        })
        .collect()
}

/// Parse a single-video info document into its audio-only streams
pub fn parse_stream_output(stdout: &str) -> Result<ResolvedStreams> {
    let info: VideoInfo = serde_json::from_str(stdout)
        .map_err(|e| PlaybackError::Resolution(format!("Failed to parse yt-dlp output: {}", e)))?;

    let urls = info
        .formats
        .into_iter()
        .filter(Format::is_audio_only)
        .filter_map(|format| format.url)
        .collect();

    Ok(ResolvedStreams {
        urls,
        title: info.title,
    })
}
