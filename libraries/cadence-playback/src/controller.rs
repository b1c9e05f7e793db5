//! Playback controller - core orchestration
//!
//! Coordinates search results, the playlist, stream quality, the playback
//! device and autoplay continuation. The presentation layer only talks to
//! this type: it issues commands, reads snapshots and drains events.

use crate::{
    catalog::track_from_hit,
    collection::NavigableCollection,
    device::{CompletionDetector, NearEndDetector, PlaybackDevice},
    duration::song_is_short,
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    quality::{select_stream, QualityCommand, QualityLevel, SelectedStream},
    resolver::TrackResolver,
    types::{Direction, ModeFlags, PlaybackConfig, PlaybackSnapshot, PlaybackState, Track},
    volume::Volume,
};
use tracing::{debug, info, warn};

/// Central playback management
///
/// Owns:
/// - the search results and the playlist (two navigable collections)
/// - session state (current/previous track, pause, quality, volume)
/// - mode flags (shuffle, short-song filter, autoplay)
/// - the resolver and the playback device
///
/// All mutation goes through `&mut self`, so a UI command and the polling
/// tick can never interleave.
pub struct PlaybackController<R, D> {
    resolver: R,
    device: D,
    detector: Box<dyn CompletionDetector>,

    // Collections
    query: NavigableCollection,
    playlist: NavigableCollection,

    // Session state
    state: PlaybackState,
    current_track: Option<Track>,
    previous_track: Option<Track>,
    current_stream: Option<SelectedStream>,
    is_paused: bool,
    quality: QualityLevel,
    volume: Volume,

    // Settings
    flags: ModeFlags,
    skip_step_ms: i64,
    max_search_results: usize,
    base_url: String,

    // Autoplay starts that failed in a row
    failed_continuations: usize,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl<R: TrackResolver, D: PlaybackDevice> PlaybackController<R, D> {
    /// Create a controller and push the initial volume to the device
    pub fn new(config: PlaybackConfig, resolver: R, mut device: D) -> Self {
        let volume = Volume::new(config.volume);
        if let Err(e) = device.set_volume(volume.device_level()) {
            warn!(error = %e, "Could not set initial volume");
        }

        let flags = config.mode_flags();
        let mut playlist = NavigableCollection::new();
        playlist.set_shuffle(flags.shuffle);

        Self {
            resolver,
            device,
            detector: Box::new(NearEndDetector::default()),
            query: NavigableCollection::new(),
            playlist,
            state: PlaybackState::Stopped,
            current_track: None,
            previous_track: None,
            current_stream: None,
            is_paused: false,
            quality: config.quality,
            volume,
            flags,
            skip_step_ms: config.skip_step_ms,
            max_search_results: config.max_search_results,
            base_url: config.base_url,
            failed_continuations: 0,
            pending_events: Vec::new(),
        }
    }

    /// Use reproducible shuffle sequences
    ///
    /// Replaces both collections, so call it before adding tracks.
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.query = NavigableCollection::with_seed(seed.wrapping_add(1));
        self.playlist = NavigableCollection::with_seed(seed);
        self.playlist.set_shuffle(self.flags.shuffle);
        self
    }

    /// Replace the end-of-track heuristic
    pub fn with_completion_detector(mut self, detector: Box<dyn CompletionDetector>) -> Self {
        self.detector = detector;
        self
    }

    // ===== Search Results =====

    /// Search and replace the result list
    ///
    /// With the short-song filter on, results that are not short are dropped.
    /// Returns the title of the first result. On a resolver error the previous
    /// results are kept.
    pub fn search(&mut self, query: &str) -> Result<Option<String>> {
        let hits = self.resolver.search(query, self.max_search_results)?;
        let found = hits.len();

        let short_only = self.flags.short_song_filter;
        let tracks: Vec<Track> = hits
            .iter()
            .filter(|hit| !short_only || song_is_short(&hit.duration))
            .map(|hit| track_from_hit(&self.base_url, hit))
            .collect();

        info!(query, found, kept = tracks.len(), "Search finished");

        self.query.replace(tracks);
        self.emit_query_changed();
        Ok(self.query_title())
    }

    /// Move through the search results; returns the selected title
    pub fn query_advance(&mut self, direction: Direction) -> Option<String> {
        if self.query.is_empty() {
            return None;
        }
        self.query.advance(direction);
        self.emit_query_changed();
        self.query_title()
    }

    /// Play the selected search result without adding it to the playlist
    pub fn query_play(&mut self) -> Result<()> {
        let Some(track) = self.query.current().cloned() else {
            return Ok(());
        };
        self.start_track(track)
    }

    /// Append the selected search result to the playlist
    pub fn query_add_to_playlist(&mut self) {
        let Some(track) = self.query.current().cloned() else {
            return;
        };
        debug!(title = %track.title, "Adding track to playlist");
        self.playlist.append(track);
        self.emit_playlist_changed();
    }

    /// Append every search result to the playlist
    pub fn import_all_query_results(&mut self) {
        if self.query.is_empty() {
            return;
        }
        self.playlist.extend(self.query.iter().cloned());
        info!(count = self.query.len(), "Imported search results");
        self.emit_playlist_changed();
    }

    // ===== Playlist =====

    /// Move the playlist head
    pub fn playlist_advance(&mut self, direction: Direction) {
        self.playlist.advance(direction);
        self.emit_up_next();
    }

    /// Remove the playlist head
    pub fn playlist_remove_current(&mut self) -> Option<Track> {
        let removed = self.playlist.remove_current();
        if let Some(ref track) = removed {
            debug!(title = %track.title, "Removed track from playlist");
        }
        self.emit_playlist_changed();
        removed
    }

    /// Empty the playlist; the shuffle flag is kept
    pub fn clear_playlist(&mut self) {
        self.playlist.clear();
        self.emit_playlist_changed();
    }

    /// Replace the playlist, e.g. with tracks read from a file
    pub fn load_playlist(&mut self, tracks: Vec<Track>) {
        self.playlist.replace(tracks);
        info!(count = self.playlist.len(), "Playlist loaded");
        self.emit_playlist_changed();
    }

    // ===== Playback Control =====

    /// Play the playlist head and pre-stage the next one
    pub fn play_next(&mut self) -> Result<()> {
        self.play_next_in_playlist().map(|_| ())
    }

    /// Returns whether a track was started
    fn play_next_in_playlist(&mut self) -> Result<bool> {
        if self.playlist.is_empty() {
            return Ok(false);
        }

        if self.flags.short_song_filter
            && !self.playlist.iter().any(|track| song_is_short(&track.duration))
        {
            warn!(
                playlist_len = self.playlist.len(),
                "No short song in playlist, disabling autoplay"
            );
            self.set_autoplay(false);
            self.emit_up_next();
            return Ok(false);
        }

        // A shuffle walk reaches every item within two cycles
        let max_skips = 2 * self.playlist.len();
        let mut skipped = 0;
        while self.flags.short_song_filter
            && !self
                .playlist
                .current()
                .is_some_and(|track| song_is_short(&track.duration))
        {
            if skipped >= max_skips {
                warn!(skipped, "Short song not reached, disabling autoplay");
                self.set_autoplay(false);
                self.emit_up_next();
                return Ok(false);
            }
            self.playlist.advance(Direction::Next);
            skipped += 1;
        }

        let Some(track) = self.playlist.current().cloned() else {
            return Ok(false);
        };
        let leaving = self.current_track.clone();

        let result = self.start_track(track);
        if result.is_ok() {
            self.playlist.mark_current_visited();
            self.previous_track = leaving;
            debug!(
                unvisited = self.playlist.unvisited_len(),
                "Remaining tracks not yet played"
            );
        }

        self.playlist.advance(Direction::Next);
        self.emit_up_next();
        result.map(|()| true)
    }

    /// Go back to the previously played track
    ///
    /// The track being left becomes the previous one, so calling this twice
    /// toggles between two tracks. The playlist position is not touched.
    pub fn play_previous(&mut self) -> Result<()> {
        let Some(previous) = self.previous_track.clone() else {
            return Ok(());
        };
        let leaving = self.current_track.clone();
        self.start_track(previous)?;
        self.previous_track = leaving;
        Ok(())
    }

    /// Flip pause; returns the new paused state
    pub fn toggle_pause(&mut self) -> Result<bool> {
        let paused = !self.is_paused;
        self.device.set_paused(paused)?;
        self.is_paused = paused;

        if self.current_track.is_some() {
            self.set_state(if paused {
                PlaybackState::Paused
            } else {
                PlaybackState::Playing
            });
        }

        self.pending_events.push(PlaybackEvent::PauseChanged { paused });
        Ok(paused)
    }

    /// Resolve, select, load and play a track
    ///
    /// Polling is suspended while this runs. On failure nothing about the
    /// session changes except the emitted state events.
    fn start_track(&mut self, track: Track) -> Result<()> {
        let prior_state = self.state;
        self.set_state(PlaybackState::Loading);
        debug!(url = %track.url, "Starting track");

        match self.load_stream(&track) {
            Ok(selected) => {
                info!(title = %track.title, quality = %selected.display, "Track started");
                self.pending_events.push(PlaybackEvent::TrackStarted {
                    title: track.title.clone(),
                    quality: selected.display.clone(),
                });
                self.current_stream = Some(selected);
                self.current_track = Some(track);
                self.is_paused = false;
                self.failed_continuations = 0;
                self.set_state(PlaybackState::Playing);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, url = %track.url, "Could not start track");
                self.set_state(prior_state);
                Err(e)
            }
        }
    }

    fn load_stream(&mut self, track: &Track) -> Result<SelectedStream> {
        let streams = self.resolver.resolve_streams(&track.url)?;
        let selected = select_stream(&streams.urls, self.quality).map_err(|_| {
            PlaybackError::NoPlayableStream {
                url: track.url.clone(),
            }
        })?;

        self.device.load(&selected.url)?;
        self.device.play()?;
        Ok(selected)
    }

    // ===== Status Polling =====

    /// Report `(position, length)` in seconds and continue finished tracks
    ///
    /// Called on a fixed interval by the presentation layer. While a start is
    /// in flight this reports nothing and never triggers continuation.
    pub fn poll_status(&mut self) -> (f64, f64) {
        if self.state == PlaybackState::Loading {
            return (0.0, 0.0);
        }

        let position_ms = self.device.position_ms();
        let length_ms = self.device.length_ms();

        if self.state == PlaybackState::Playing
            && self.detector.is_finished(position_ms, length_ms)
        {
            self.continue_after_finish();
        }

        (position_ms as f64 / 1000.0, length_ms as f64 / 1000.0)
    }

    fn continue_after_finish(&mut self) {
        if let Some(ref track) = self.current_track {
            debug!(url = %track.url, "Track finished");
            self.pending_events.push(PlaybackEvent::TrackFinished {
                url: track.url.clone(),
            });
        }

        if !self.flags.autoplay {
            self.replay_current();
            return;
        }

        match self.play_next_in_playlist() {
            Ok(true) => {}
            Ok(false) => self.set_state(PlaybackState::Stopped),
            Err(e) if !e.is_resolution_failure() => {
                self.pending_events.push(PlaybackEvent::Error {
                    message: e.to_string(),
                });
                self.set_state(PlaybackState::Stopped);
            }
            Err(e) => {
                self.failed_continuations += 1;
                self.pending_events.push(PlaybackEvent::Error {
                    message: e.to_string(),
                });

                // Every playlist item failed in a row
                if self.failed_continuations > self.playlist.len() {
                    warn!("Autoplay could not start any track, disabling autoplay");
                    self.set_autoplay(false);
                    self.set_state(PlaybackState::Stopped);
                    self.failed_continuations = 0;
                }
            }
        }
    }

    /// Restart the current stream from the beginning (repeat one)
    fn replay_current(&mut self) {
        let Some(stream_url) = self.current_stream.as_ref().map(|s| s.url.clone()) else {
            self.set_state(PlaybackState::Stopped);
            return;
        };

        match self
            .device
            .load(&stream_url)
            .and_then(|()| self.device.play())
        {
            Ok(()) => {
                debug!("Replaying current track");
                self.is_paused = false;
            }
            Err(e) => {
                warn!(error = %e, "Could not replay current track");
                self.pending_events.push(PlaybackEvent::Error {
                    message: e.to_string(),
                });
                self.set_state(PlaybackState::Stopped);
            }
        }
    }

    // ===== Seek =====

    /// Move the position by a signed amount, clamped to the track
    pub fn seek_relative(&mut self, delta_ms: i64) -> Result<()> {
        let length_ms = self.device.length_ms();
        if length_ms <= 0 {
            return Ok(());
        }

        let target = self
            .device
            .position_ms()
            .saturating_add(delta_ms)
            .clamp(0, length_ms);
        self.device.set_position_ms(target)
    }

    /// Skip forward by the configured step
    pub fn skip_forward(&mut self) -> Result<()> {
        self.seek_relative(self.skip_step_ms)
    }

    /// Skip back by the configured step
    pub fn skip_back(&mut self) -> Result<()> {
        self.seek_relative(-self.skip_step_ms)
    }

    /// Jump to a fraction (0.0-1.0) of the track
    pub fn seek_absolute(&mut self, fraction: f64) -> Result<()> {
        let length_ms = self.device.length_ms();
        if length_ms <= 0 {
            return Ok(());
        }

        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let target = (fraction * length_ms as f64).round() as i64;
        self.device.set_position_ms(target)
    }

    // ===== Volume =====

    /// Set volume, clamped to 0-100
    pub fn set_volume(&mut self, level: i32) -> Result<()> {
        self.volume.set_level(level);
        self.device.set_volume(self.volume.device_level())?;
        self.emit_volume_changed();
        Ok(())
    }

    /// Toggle mute; returns the new muted state
    pub fn toggle_mute(&mut self) -> Result<bool> {
        self.volume.toggle_mute();
        if let Err(e) = self.device.set_volume(self.volume.device_level()) {
            self.volume.toggle_mute();
            return Err(e);
        }
        self.emit_volume_changed();
        Ok(self.volume.is_muted())
    }

    pub fn volume(&self) -> u8 {
        self.volume.level()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    // ===== Quality & Mode Flags =====

    /// Change the stream quality tier for the next start
    ///
    /// Returns the new tier as display text.
    pub fn set_quality(&mut self, command: QualityCommand) -> String {
        self.quality = self.quality.apply(command);
        debug!(quality = %self.quality, "Quality changed");
        self.quality.to_string()
    }

    pub fn quality(&self) -> QualityLevel {
        self.quality
    }

    pub fn toggle_shuffle(&mut self) -> bool {
        self.flags.shuffle = !self.flags.shuffle;
        self.playlist.set_shuffle(self.flags.shuffle);
        self.flags.shuffle
    }

    pub fn toggle_autoplay(&mut self) -> bool {
        self.set_autoplay(!self.flags.autoplay);
        self.flags.autoplay
    }

    pub fn toggle_short_song_filter(&mut self) -> bool {
        self.flags.short_song_filter = !self.flags.short_song_filter;
        self.flags.short_song_filter
    }

    fn set_autoplay(&mut self, enabled: bool) {
        if self.flags.autoplay != enabled {
            self.flags.autoplay = enabled;
            self.pending_events
                .push(PlaybackEvent::AutoplayChanged { enabled });
        }
    }

    pub fn flags(&self) -> ModeFlags {
        self.flags
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    pub fn previous_track(&self) -> Option<&Track> {
        self.previous_track.as_ref()
    }

    /// Title of the playlist head
    pub fn up_next_title(&self) -> Option<String> {
        self.playlist.current().map(|t| t.title.clone())
    }

    /// Title of the selected search result
    pub fn query_title(&self) -> Option<String> {
        self.query.current().map(|t| t.title.clone())
    }

    pub fn playlist(&self) -> &NavigableCollection {
        &self.playlist
    }

    pub fn query_results(&self) -> &NavigableCollection {
        &self.query
    }

    /// Everything the presentation layer renders
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state,
            current_title: self.current_track.as_ref().map(|t| t.title.clone()),
            previous_title: self.previous_track.as_ref().map(|t| t.title.clone()),
            up_next_title: self.up_next_title(),
            query_title: self.query_title(),
            is_paused: self.is_paused,
            quality: self
                .current_stream
                .as_ref()
                .map(|s| s.display.clone())
                .unwrap_or_else(|| self.quality.to_string()),
            flags: self.flags,
            volume: self.volume.level(),
            is_muted: self.volume.is_muted(),
            playlist_len: self.playlist.len(),
            query_len: self.query.len(),
            unvisited: self.playlist.unvisited_len(),
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut R {
        &mut self.resolver
    }

    // ===== Events =====

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.pending_events.push(PlaybackEvent::StateChanged { state });
        }
    }

    fn emit_up_next(&mut self) {
        let title = self.up_next_title();
        self.pending_events.push(PlaybackEvent::UpNextChanged { title });
    }

    fn emit_query_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::QueryChanged {
            title: self.query_title(),
            count: self.query.len(),
        });
    }

    fn emit_playlist_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::PlaylistChanged {
            length: self.playlist.len(),
        });
        self.emit_up_next();
    }

    fn emit_volume_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }
}
