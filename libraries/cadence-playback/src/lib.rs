//! Cadence - Playback Core
//!
//! Presentation-agnostic core of a streamed audio player.
//!
//! This crate provides:
//! - Navigable collections (ring rotation, fair shuffle without repeats)
//! - Search results and a user playlist
//! - Autoplay with an optional short-song filter and repeat-one fallback
//! - Stream quality selection (index or best available)
//! - Volume, mute, pause and seek
//! - Completion detection by polling the playback device
//!
//! # Architecture
//!
//! `cadence-playback` does no I/O of its own:
//! - Searching and stream resolution go through [`TrackResolver`]
//! - Audio output goes through [`PlaybackDevice`]
//! - Playlist files live in `cadence-storage`
//!
//! The presentation layer drives the controller with commands, calls
//! [`PlaybackController::poll_status`] on a timer and renders
//! [`PlaybackController::snapshot`] plus drained [`PlaybackEvent`]s.
//!
//! # Example: Navigating a Collection
//!
//! ```rust
//! use cadence_playback::{Direction, NavigableCollection, Track};
//!
//! let mut playlist = NavigableCollection::with_seed(7);
//! playlist.extend(vec![
//!     Track::new("https://www.youtube.com/watch?v=a", "A", "3:10"),
//!     Track::new("https://www.youtube.com/watch?v=b", "B", "4:02"),
//! ]);
//!
//! assert_eq!(playlist.current().map(|t| t.title.as_str()), Some("A"));
//! playlist.advance(Direction::Next);
//! assert_eq!(playlist.current().map(|t| t.title.as_str()), Some("B"));
//! playlist.advance(Direction::Next);
//! assert_eq!(playlist.current().map(|t| t.title.as_str()), Some("A"));
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use cadence_playback::{
//!     PlaybackConfig, PlaybackController, PlaybackDevice, ResolvedStreams, Result,
//!     SearchHit, TrackResolver,
//! };
//!
//! struct MyResolver;
//!
//! impl TrackResolver for MyResolver {
//!     fn search(&mut self, _query: &str, _max_results: usize) -> Result<Vec<SearchHit>> {
//!         Ok(Vec::new())
//!     }
//!
//!     fn resolve_streams(&mut self, _track_url: &str) -> Result<ResolvedStreams> {
//!         Ok(ResolvedStreams { urls: Vec::new(), title: String::new() })
//!     }
//! }
//!
//! struct MyDevice;
//!
//! impl PlaybackDevice for MyDevice {
//!     fn load(&mut self, _stream_url: &str) -> Result<()> { Ok(()) }
//!     fn play(&mut self) -> Result<()> { Ok(()) }
//!     fn set_paused(&mut self, _paused: bool) -> Result<()> { Ok(()) }
//!     fn position_ms(&mut self) -> i64 { 0 }
//!     fn set_position_ms(&mut self, _position_ms: i64) -> Result<()> { Ok(()) }
//!     fn length_ms(&mut self) -> i64 { 0 }
//!     fn volume(&mut self) -> i32 { 0 }
//!     fn set_volume(&mut self, _level: i32) -> Result<()> { Ok(()) }
//! }
//!
//! let mut controller = PlaybackController::new(PlaybackConfig::default(), MyResolver, MyDevice);
//! controller.search("lofi").ok();
//! controller.import_all_query_results();
//! controller.play_next().ok();
//!
//! // On a timer:
//! let (_position, _length) = controller.poll_status();
//! for event in controller.drain_events() {
//!     println!("{}", event.describe());
//! }
//! ```

mod catalog;
mod collection;
mod controller;
mod device;
pub mod duration;
mod error;
mod events;
mod quality;
mod resolver;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use catalog::{sanitize_title, track_from_hit, watch_url};
pub use collection::NavigableCollection;
pub use controller::PlaybackController;
pub use device::{CompletionDetector, NearEndDetector, PlaybackDevice};
pub use duration::{format_duration, song_is_short, MAX_SHORT_SONG_SECS};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use quality::{select_stream, QualityCommand, QualityLevel, SelectedStream};
pub use resolver::TrackResolver;
pub use types::{
    Direction, ModeFlags, PlaybackConfig, PlaybackSnapshot, PlaybackState, ResolvedStreams,
    SearchHit, Track, DEFAULT_BASE_URL,
};
pub use volume::{Volume, MAX_VOLUME};
