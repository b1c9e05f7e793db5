//! End-to-end tests for PlaybackController
//!
//! Drives the controller through complete user sessions:
//! - Search and result navigation
//! - Playlist building and autoplay continuation
//! - Short-song filtering and its exhaustion guard
//! - Previous-track toggling
//! - Quality selection and unplayable tracks
//! - Completion polling, repeat-one and failure handling

use cadence_playback::{
    Direction, PlaybackConfig, PlaybackController, PlaybackDevice, PlaybackError, PlaybackEvent,
    PlaybackState, QualityCommand, ResolvedStreams, Result, SearchHit, Track, TrackResolver,
};
use std::collections::{HashMap, HashSet};

// ============================================================================
// Test Infrastructure
// ============================================================================

/// Resolver with a configurable catalogue
#[derive(Default)]
struct MockResolver {
    hits: Vec<SearchHit>,
    /// Stream count per track URL; missing URLs fail to resolve
    streams: HashMap<String, usize>,
    fail_search: bool,
    resolve_calls: Vec<String>,
}

impl MockResolver {
    fn with_tracks(tracks: &[Track]) -> Self {
        Self {
            streams: tracks.iter().map(|t| (t.url.clone(), 3)).collect(),
            ..Default::default()
        }
    }
}

fn stream_url(track_url: &str, index: usize) -> String {
    format!("{}&stream={}", track_url, index)
}

impl TrackResolver for MockResolver {
    fn search(&mut self, _query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        if self.fail_search {
            return Err(PlaybackError::Resolution("network down".to_string()));
        }
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }

    fn resolve_streams(&mut self, track_url: &str) -> Result<ResolvedStreams> {
        self.resolve_calls.push(track_url.to_string());
        let count = self
            .streams
            .get(track_url)
            .copied()
            .ok_or_else(|| PlaybackError::Resolution(format!("invalid url {}", track_url)))?;
        Ok(ResolvedStreams {
            urls: (0..count).map(|i| stream_url(track_url, i)).collect(),
            title: track_url.to_string(),
        })
    }
}

/// Device whose clock is set by the test
#[derive(Default)]
struct MockDevice {
    loaded: Vec<String>,
    paused: bool,
    position_ms: i64,
    length_ms: i64,
    volume: i32,
}

impl MockDevice {
    /// Put the clock right at the end of the loaded track
    fn finish(&mut self) {
        self.length_ms = 180_000;
        self.position_ms = 179_700;
    }
}

impl PlaybackDevice for MockDevice {
    fn load(&mut self, stream_url: &str) -> Result<()> {
        self.loaded.push(stream_url.to_string());
        self.position_ms = 0;
        self.paused = true;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.paused = false;
        Ok(())
    }

    fn set_paused(&mut self, paused: bool) -> Result<()> {
        self.paused = paused;
        Ok(())
    }

    fn position_ms(&mut self) -> i64 {
        self.position_ms
    }

    fn set_position_ms(&mut self, position_ms: i64) -> Result<()> {
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

type Controller = PlaybackController<MockResolver, MockDevice>;

fn track(id: &str, duration: &str) -> Track {
    Track::new(
        format!("https://www.youtube.com/watch?v={}", id),
        id.to_uppercase(),
        duration,
    )
}

fn controller(tracks: &[Track]) -> Controller {
    controller_with_config(tracks, PlaybackConfig::default())
}

fn controller_with_config(tracks: &[Track], config: PlaybackConfig) -> Controller {
    PlaybackController::new(config, MockResolver::with_tracks(tracks), MockDevice::default())
        .with_shuffle_seed(42)
}

fn current_title(controller: &Controller) -> Option<&str> {
    controller.current_track().map(|t| t.title.as_str())
}

fn previous_title(controller: &Controller) -> Option<&str> {
    controller.previous_track().map(|t| t.title.as_str())
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn search_builds_sanitized_results() {
    let mut controller = controller(&[]);
    controller.resolver_mut().hits = vec![
        SearchHit {
            id_or_suffix: "abc".to_string(),
            title: "Song <Official> \u{1F3B5}".to_string(),
            duration: "3:33".to_string(),
        },
        SearchHit {
            id_or_suffix: "/watch?v=def".to_string(),
            title: "Other".to_string(),
            duration: "4:44".to_string(),
        },
    ];

    let first = controller.search("song").unwrap();
    assert!(first.is_some());

    let results: Vec<&Track> = controller.query_results().iter().collect();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].url, "https://www.youtube.com/watch?v=abc");
    assert!(!results[0].title.contains('\u{1F3B5}'));
    assert_eq!(results[1].url, "https://www.youtube.com/watch?v=def");

    assert_eq!(controller.query_advance(Direction::Next).as_deref(), Some("Other"));
}

#[test]
fn failed_search_keeps_previous_results() {
    let mut controller = controller(&[]);
    controller.resolver_mut().hits = vec![SearchHit {
        id_or_suffix: "abc".to_string(),
        title: "Kept".to_string(),
        duration: "3:00".to_string(),
    }];
    controller.search("first").unwrap();

    controller.resolver_mut().fail_search = true;
    let err = controller.search("second").unwrap_err();

    assert!(err.is_resolution_failure());
    assert_eq!(controller.query_title().as_deref(), Some("Kept"));
}

#[test]
fn query_play_does_not_touch_playlist_or_previous() {
    let a = track("a", "3:00");
    let mut controller = controller(&[a.clone()]);
    controller.resolver_mut().hits = vec![SearchHit {
        id_or_suffix: "a".to_string(),
        title: "A".to_string(),
        duration: "3:00".to_string(),
    }];
    controller.search("a").unwrap();

    controller.query_play().unwrap();

    assert_eq!(current_title(&controller), Some("A"));
    assert!(controller.previous_track().is_none());
    assert!(controller.playlist().is_empty());
}

#[test]
fn import_all_results_appends_to_playlist() {
    let existing = track("x", "3:00");
    let mut controller = controller(&[]);
    controller.load_playlist(vec![existing]);
    controller.resolver_mut().hits = (0..3)
        .map(|i| SearchHit {
            id_or_suffix: format!("id{}", i),
            title: format!("Hit {}", i),
            duration: "2:00".to_string(),
        })
        .collect();
    controller.search("hits").unwrap();

    controller.import_all_query_results();

    assert_eq!(controller.playlist().len(), 4);
    assert_eq!(controller.up_next_title().as_deref(), Some("X"));
    let titles: Vec<&str> = controller.playlist().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["X", "Hit 0", "Hit 1", "Hit 2"]);
}

// ============================================================================
// Playlist & Autoplay
// ============================================================================

#[test]
fn play_next_plays_head_and_stages_next() {
    let tracks = vec![track("a", "3:00"), track("b", "3:00"), track("c", "3:00")];
    let mut controller = controller(&tracks);
    controller.load_playlist(tracks.clone());

    controller.play_next().unwrap();
    assert_eq!(current_title(&controller), Some("A"));
    assert_eq!(controller.up_next_title().as_deref(), Some("B"));
    assert!(controller.previous_track().is_none());
    assert_eq!(controller.state(), PlaybackState::Playing);

    controller.play_next().unwrap();
    assert_eq!(current_title(&controller), Some("B"));
    assert_eq!(previous_title(&controller), Some("A"));
    assert_eq!(controller.up_next_title().as_deref(), Some("C"));
}

#[test]
fn play_previous_toggles_between_two_tracks() {
    let tracks = vec![track("a", "3:00"), track("b", "3:00"), track("c", "3:00")];
    let mut controller = controller(&tracks);
    controller.load_playlist(tracks);
    controller.play_next().unwrap();
    controller.play_next().unwrap();

    controller.play_previous().unwrap();
    assert_eq!(current_title(&controller), Some("A"));
    assert_eq!(previous_title(&controller), Some("B"));

    controller.play_previous().unwrap();
    assert_eq!(current_title(&controller), Some("B"));
    assert_eq!(previous_title(&controller), Some("A"));

    // Playlist position untouched
    assert_eq!(controller.up_next_title().as_deref(), Some("C"));
}

#[test]
fn play_previous_without_history_is_noop() {
    let a = track("a", "3:00");
    let mut controller = controller(&[a.clone()]);
    controller.play_previous().unwrap();
    assert!(controller.device().loaded.is_empty());
}

#[test]
fn remove_current_in_middle_of_playlist() {
    let tracks = vec![track("a", "3:00"), track("b", "3:00"), track("c", "3:00")];
    let mut controller = controller(&tracks);
    controller.load_playlist(tracks);
    controller.playlist_advance(Direction::Next);

    let removed = controller.playlist_remove_current().unwrap();

    assert_eq!(removed.title, "B");
    assert_eq!(controller.up_next_title().as_deref(), Some("C"));
    let titles: Vec<&str> = controller.playlist().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "A"]);
}

#[test]
fn remove_only_item_empties_playlist() {
    let a = track("a", "3:00");
    let mut controller = controller(&[a.clone()]);
    controller.load_playlist(vec![a]);

    controller.playlist_remove_current();

    assert!(controller.playlist().is_empty());
    assert!(controller.up_next_title().is_none());
    controller.play_next().unwrap();
    assert!(controller.current_track().is_none());
}

#[test]
fn shuffle_plays_every_track_before_repeating() {
    let tracks = vec![track("a", "3:00"), track("b", "3:00"), track("c", "3:00")];
    let config = PlaybackConfig {
        shuffle: true,
        ..Default::default()
    };
    let mut controller = controller_with_config(&tracks, config);
    controller.load_playlist(tracks.clone());

    for _ in 0..3 {
        controller.play_next().unwrap();
    }

    let loaded: HashSet<&String> = controller.device().loaded.iter().collect();
    let expected: Vec<String> = tracks.iter().map(|t| stream_url(&t.url, 1)).collect();
    assert_eq!(loaded.len(), 3);
    for url in &expected {
        assert!(loaded.contains(url));
    }
}

#[test]
fn short_song_filter_skips_long_tracks() {
    let tracks = vec![track("long", "12:00"), track("short", "2:30")];
    let config = PlaybackConfig {
        short_song_filter: true,
        ..Default::default()
    };
    let mut controller = controller_with_config(&tracks, config);
    controller.load_playlist(tracks);

    controller.play_next().unwrap();

    assert_eq!(current_title(&controller), Some("SHORT"));
}

#[test]
fn short_song_filter_without_short_songs_disables_autoplay() {
    let tracks = vec![track("one", "10:00"), track("two", "1:02:03")];
    let config = PlaybackConfig {
        short_song_filter: true,
        ..Default::default()
    };
    let mut controller = controller_with_config(&tracks, config);
    controller.load_playlist(tracks);
    controller.drain_events();

    controller.play_next().unwrap();

    assert!(controller.current_track().is_none());
    assert!(controller.device().loaded.is_empty());
    assert!(!controller.flags().autoplay);
    assert!(controller
        .drain_events()
        .contains(&PlaybackEvent::AutoplayChanged { enabled: false }));
}

#[test]
fn shuffled_short_song_filter_keeps_finding_the_short_song() {
    let tracks = vec![
        track("s", "2:00"),
        track("l1", "10:00"),
        track("l2", "10:00"),
    ];
    let config = PlaybackConfig {
        shuffle: true,
        short_song_filter: true,
        ..Default::default()
    };

    for seed in 0..64 {
        let mut controller = PlaybackController::new(
            config.clone(),
            MockResolver::with_tracks(&tracks),
            MockDevice::default(),
        )
        .with_shuffle_seed(seed);
        controller.load_playlist(tracks.clone());

        for _ in 0..6 {
            controller.play_next().unwrap();
            assert!(controller.flags().autoplay, "seed {}", seed);
        }

        let short_stream = stream_url(&tracks[0].url, 1);
        assert_eq!(controller.device().loaded.len(), 6, "seed {}", seed);
        assert!(
            controller.device().loaded.iter().all(|url| *url == short_stream),
            "seed {}",
            seed
        );
    }
}

#[test]
fn failed_start_leaves_current_and_previous_unchanged() {
    let a = track("a", "3:00");
    let broken = track("broken", "3:00");
    let c = track("c", "3:00");
    let mut controller = controller(&[a.clone(), c.clone()]);
    controller.load_playlist(vec![a, broken, c]);
    controller.play_next().unwrap();

    let err = controller.play_next().unwrap_err();

    assert!(err.is_resolution_failure());
    assert_eq!(current_title(&controller), Some("A"));
    assert!(controller.previous_track().is_none());
    assert_eq!(controller.state(), PlaybackState::Playing);
    // Moved past the broken track
    assert_eq!(controller.up_next_title().as_deref(), Some("C"));
}

#[test]
fn track_without_streams_is_not_playable() {
    let a = track("a", "3:00");
    let mut controller = controller(&[]);
    controller
        .resolver_mut()
        .streams
        .insert(a.url.clone(), 0);
    controller.load_playlist(vec![a.clone()]);

    let err = controller.play_next().unwrap_err();

    match err {
        PlaybackError::NoPlayableStream { url } => assert_eq!(url, a.url),
        other => panic!("unexpected error: {other}"),
    }
    assert!(controller.device().loaded.is_empty());
}

// ============================================================================
// Quality
// ============================================================================

#[test]
fn max_quality_selects_best_stream() {
    let a = track("a", "3:00");
    let mut controller = controller(&[]);
    controller.resolver_mut().streams.insert(a.url.clone(), 4);
    controller.load_playlist(vec![a.clone()]);

    assert_eq!(controller.set_quality(QualityCommand::Max), "max");
    controller.play_next().unwrap();

    assert_eq!(controller.device().loaded, vec![stream_url(&a.url, 3)]);
    assert_eq!(controller.snapshot().quality, "max (4)");
    assert!(controller.drain_events().contains(&PlaybackEvent::TrackStarted {
        title: "A".to_string(),
        quality: "max (4)".to_string(),
    }));
}

#[test]
fn quality_index_beyond_streams_falls_back_to_best() {
    let a = track("a", "3:00");
    let mut controller = controller(&[a.clone()]);
    controller.load_playlist(vec![a.clone()]);
    controller.set_quality(QualityCommand::Raise);
    controller.set_quality(QualityCommand::Raise);

    controller.play_next().unwrap();

    assert_eq!(controller.device().loaded, vec![stream_url(&a.url, 2)]);
    assert_eq!(controller.snapshot().quality, "max (3)");
}

// ============================================================================
// Completion Polling
// ============================================================================

#[test]
fn poll_reports_seconds() {
    let mut controller = controller(&[]);
    controller.device_mut().position_ms = 1_500;
    controller.device_mut().length_ms = 90_000;

    assert_eq!(controller.poll_status(), (1.5, 90.0));
}

#[test]
fn poll_without_known_length_never_continues() {
    let tracks = vec![track("a", "3:00"), track("b", "3:00")];
    let mut controller = controller(&tracks);
    controller.load_playlist(tracks);
    controller.play_next().unwrap();

    controller.poll_status();

    assert_eq!(controller.device().loaded.len(), 1);
}

#[test]
fn finished_track_autoplays_next() {
    let tracks = vec![track("a", "3:00"), track("b", "3:00")];
    let mut controller = controller(&tracks);
    controller.load_playlist(tracks.clone());
    controller.play_next().unwrap();
    controller.drain_events();

    controller.device_mut().finish();
    let (position, length) = controller.poll_status();

    assert_eq!((position, length), (179.7, 180.0));
    assert_eq!(current_title(&controller), Some("B"));
    assert_eq!(previous_title(&controller), Some("A"));
    assert!(controller.drain_events().contains(&PlaybackEvent::TrackFinished {
        url: tracks[0].url.clone(),
    }));

    // Fresh track, nothing more to do
    controller.poll_status();
    assert_eq!(controller.device().loaded.len(), 2);
}

#[test]
fn finished_track_repeats_when_autoplay_off() {
    let tracks = vec![track("a", "3:00"), track("b", "3:00")];
    let mut controller = controller(&tracks);
    controller.load_playlist(tracks.clone());
    controller.play_next().unwrap();
    assert!(!controller.toggle_autoplay());

    controller.device_mut().finish();
    controller.poll_status();

    let loaded = &controller.device().loaded;
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0], loaded[1]);
    assert!(!controller.device().paused);
    assert!(!controller.is_paused());
    assert_eq!(current_title(&controller), Some("A"));
}

#[test]
fn paused_track_near_end_is_not_continued() {
    let tracks = vec![track("a", "3:00"), track("b", "3:00")];
    let mut controller = controller(&tracks);
    controller.load_playlist(tracks);
    controller.play_next().unwrap();
    controller.toggle_pause().unwrap();

    controller.device_mut().finish();
    controller.poll_status();

    assert_eq!(current_title(&controller), Some("A"));
    assert_eq!(controller.device().loaded.len(), 1);
}

#[test]
fn end_of_empty_playlist_stops() {
    let a = track("a", "3:00");
    let mut controller = controller(&[a.clone()]);
    controller.load_playlist(vec![a]);
    controller.play_next().unwrap();
    controller.clear_playlist();

    controller.device_mut().finish();
    controller.poll_status();
    assert_eq!(controller.state(), PlaybackState::Stopped);
    controller.drain_events();

    // Stopped: no repeated finish events
    controller.poll_status();
    assert!(!controller.has_pending_events());
}

#[test]
fn autoplay_gives_up_after_every_track_fails() {
    let tracks = vec![track("a", "3:00"), track("x", "3:00"), track("y", "3:00")];
    let mut controller = controller(&tracks);
    controller.load_playlist(tracks);
    controller.play_next().unwrap();
    controller.resolver_mut().streams.clear();
    controller.device_mut().finish();

    for _ in 0..3 {
        controller.poll_status();
        assert!(controller.flags().autoplay);
    }
    controller.poll_status();

    assert!(!controller.flags().autoplay);
    assert_eq!(controller.state(), PlaybackState::Stopped);
    assert_eq!(current_title(&controller), Some("A"));

    let attempts = controller.resolver().resolve_calls.len();
    controller.poll_status();
    assert_eq!(controller.resolver().resolve_calls.len(), attempts);
}

#[test]
fn manual_start_clears_autoplay_failures() {
    let tracks = vec![track("a", "3:00"), track("x", "3:00"), track("y", "3:00")];
    let mut controller = controller(&tracks);
    controller.load_playlist(tracks.clone());
    controller.play_next().unwrap();

    // x and y fail, leaving the head back on a
    controller.resolver_mut().streams.clear();
    controller.device_mut().finish();
    controller.poll_status();
    controller.poll_status();
    assert!(controller.flags().autoplay);

    controller.resolver_mut().streams = MockResolver::with_tracks(&tracks).streams;
    controller.play_next().unwrap();
    assert_eq!(current_title(&controller), Some("A"));

    // A fresh run of failures needs a full round again
    controller.resolver_mut().streams.clear();
    controller.device_mut().finish();
    for _ in 0..3 {
        controller.poll_status();
        assert!(controller.flags().autoplay);
    }
    controller.poll_status();
    assert!(!controller.flags().autoplay);
}

// ============================================================================
// Pause, Seek & Volume
// ============================================================================

#[test]
fn pause_and_resume() {
    let a = track("a", "3:00");
    let mut controller = controller(&[a.clone()]);
    controller.load_playlist(vec![a]);
    controller.play_next().unwrap();

    assert!(controller.toggle_pause().unwrap());
    assert!(controller.device().paused);
    assert!(!controller.toggle_pause().unwrap());
    assert!(!controller.device().paused);
}

#[test]
fn skip_is_clamped_to_track() {
    let mut controller = controller(&[]);
    controller.device_mut().length_ms = 30_000;
    controller.device_mut().position_ms = 25_000;

    controller.skip_forward().unwrap();
    assert_eq!(controller.device().position_ms, 30_000);

    controller.device_mut().position_ms = 4_000;
    controller.skip_back().unwrap();
    assert_eq!(controller.device().position_ms, 0);
}

#[test]
fn volume_commands_reach_device() {
    let config = PlaybackConfig {
        volume: 35,
        ..Default::default()
    };
    let mut controller = controller_with_config(&[], config);
    assert_eq!(controller.device().volume, 35);

    controller.set_volume(-5).unwrap();
    assert_eq!(controller.device().volume, 0);

    controller.set_volume(80).unwrap();
    controller.toggle_mute().unwrap();
    assert_eq!(controller.device().volume, 0);
    assert!(controller.snapshot().is_muted);
    controller.toggle_mute().unwrap();
    assert_eq!(controller.device().volume, 80);
}

#[test]
fn snapshot_reflects_session() {
    let tracks = vec![track("a", "3:00"), track("b", "5:00")];
    let mut controller = controller(&tracks);
    controller.load_playlist(tracks);
    controller.play_next().unwrap();
    controller.toggle_shuffle();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.state, PlaybackState::Playing);
    assert_eq!(snapshot.current_title.as_deref(), Some("A"));
    assert_eq!(snapshot.up_next_title.as_deref(), Some("B"));
    assert_eq!(snapshot.playlist_len, 2);
    assert_eq!(snapshot.quality, "1");
    assert!(snapshot.flags.shuffle);
    assert!(snapshot.flags.autoplay);
}
