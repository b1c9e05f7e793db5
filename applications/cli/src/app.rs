//! Command loop
//!
//! User input arrives from a reader thread over a channel. The loop waits on
//! that channel with the poll interval as timeout, so status polling keeps
//! running while the user is idle and never overlaps a command.

use crate::commands::{parse_command, Command, HELP};
use crate::error::Result;
use cadence_playback::{
    Direction, PlaybackController, PlaybackDevice, PlaybackSnapshot, TrackResolver,
};
use cadence_storage::playlists;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// What the loop does after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run one command against the controller, writing feedback to `out`
pub fn execute<R, D, W>(
    controller: &mut PlaybackController<R, D>,
    command: Command,
    out: &mut W,
) -> Result<Flow>
where
    R: TrackResolver,
    D: PlaybackDevice,
    W: Write,
{
    match command {
        Command::Search(query) => {
            let first = controller.search(&query)?;
            let count = controller.query_results().len();
            match first {
                Some(title) => writeln!(out, "{} results, first: {}", count, title)?,
                None => writeln!(out, "no results")?,
            }
        }
        Command::QueryNext => print_selected(out, controller.query_advance(Direction::Next))?,
        Command::QueryPrev => print_selected(out, controller.query_advance(Direction::Prev))?,
        Command::QueryPlay => controller.query_play()?,
        Command::QueryAdd => controller.query_add_to_playlist(),
        Command::QueryAddAll => controller.import_all_query_results(),

        Command::PlaylistNext => controller.playlist_advance(Direction::Next),
        Command::PlaylistPrev => controller.playlist_advance(Direction::Prev),
        Command::PlaylistRemove => {
            if let Some(track) = controller.playlist_remove_current() {
                writeln!(out, "removed: {}", track.title)?;
            }
        }
        Command::PlaylistClear => controller.clear_playlist(),
        Command::PlaylistShow => {
            for (position, track) in controller.playlist().iter().enumerate() {
                writeln!(out, "{:>3}. {} [{}]", position + 1, track.title, track.duration)?;
            }
        }
        Command::Open(path) => {
            let tracks = playlists::load_playlist(&path)?;
            controller.load_playlist(tracks);
        }
        Command::Save(path) => {
            playlists::save_playlist(&path, &controller.playlist().to_vec())?;
            writeln!(out, "saved {} tracks to {}", controller.playlist().len(), path.display())?;
        }

        Command::Play => controller.play_next()?,
        Command::Back => controller.play_previous()?,
        Command::Pause => {
            controller.toggle_pause()?;
        }
        Command::SkipForward => controller.skip_forward()?,
        Command::SkipBack => controller.skip_back()?,
        Command::Seek(percent) => controller.seek_absolute(percent / 100.0)?,
        Command::Volume(level) => controller.set_volume(level)?,
        Command::Mute => {
            controller.toggle_mute()?;
        }
        Command::Quality(change) => {
            let quality = controller.set_quality(change);
            writeln!(out, "quality: {}", quality)?;
        }

        Command::Shuffle => writeln!(out, "shuffle: {}", on_off(controller.toggle_shuffle()))?,
        Command::Autoplay => {
            writeln!(out, "autoplay: {}", on_off(controller.toggle_autoplay()))?;
        }
        Command::ShortSongs => writeln!(
            out,
            "short songs only: {}",
            on_off(controller.toggle_short_song_filter())
        )?,

        Command::Status => {
            let (position, length) = controller.poll_status();
            write_status(out, &controller.snapshot(), position, length)?;
        }
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

fn print_selected<W: Write>(out: &mut W, title: Option<String>) -> io::Result<()> {
    match title {
        Some(title) => writeln!(out, "result: {}", title),
        None => writeln!(out, "no results"),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn clock(secs: f64) -> String {
    cadence_playback::format_duration(secs.max(0.0).round() as u64)
}

/// Render the status block
pub fn write_status<W: Write>(
    out: &mut W,
    snapshot: &PlaybackSnapshot,
    position: f64,
    length: f64,
) -> io::Result<()> {
    let none = || "-".to_string();
    writeln!(
        out,
        "{:?} {} / {}  quality {}  volume {}{}",
        snapshot.state,
        clock(position),
        clock(length),
        snapshot.quality,
        snapshot.volume,
        if snapshot.is_muted { " (muted)" } else { "" }
    )?;
    writeln!(
        out,
        "now: {}\nprevious: {}\nup next: {}",
        snapshot.current_title.clone().unwrap_or_else(none),
        snapshot.previous_title.clone().unwrap_or_else(none),
        snapshot.up_next_title.clone().unwrap_or_else(none),
    )?;
    writeln!(
        out,
        "playlist: {} tracks ({} unplayed)  results: {}  shuffle {}  autoplay {}  short {}",
        snapshot.playlist_len,
        snapshot.unvisited,
        snapshot.query_len,
        on_off(snapshot.flags.shuffle),
        on_off(snapshot.flags.autoplay),
        on_off(snapshot.flags.short_song_filter),
    )
}

/// Forward stdin lines to a channel from a background thread
pub fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read input");
                    break;
                }
            }
        }
    });
    rx
}

/// Drive the controller until `quit` or end of input
pub fn run_loop<R, D, W>(
    controller: &mut PlaybackController<R, D>,
    input: Receiver<String>,
    poll_interval: Duration,
    out: &mut W,
) -> Result<()>
where
    R: TrackResolver,
    D: PlaybackDevice,
    W: Write,
{
    let mut next_tick = Instant::now() + poll_interval;

    loop {
        let timeout = next_tick.saturating_duration_since(Instant::now());
        match input.recv_timeout(timeout) {
            Ok(line) => {
                let flow = match parse_command(&line) {
                    Ok(Some(command)) => {
                        debug!(?command, "Executing command");
                        match execute(controller, command, out) {
                            Ok(flow) => flow,
                            Err(e) => {
                                writeln!(out, "error: {}", e)?;
                                Flow::Continue
                            }
                        }
                    }
                    Ok(None) => Flow::Continue,
                    Err(e) => {
                        writeln!(out, "{}", e)?;
                        Flow::Continue
                    }
                };
                if flow == Flow::Quit {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                debug!("Input closed");
                break;
            }
        }

        if Instant::now() >= next_tick {
            controller.poll_status();
            next_tick = Instant::now() + poll_interval;
        }

        for event in controller.drain_events() {
            writeln!(out, "{}", event.describe())?;
        }
        out.flush()?;
    }

    Ok(())
}
