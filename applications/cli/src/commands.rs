//! Line commands
//!
//! Each input line is one command word followed by an optional argument.

use crate::error::{AppError, Result};
use cadence_playback::QualityCommand;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Search results
    Search(String),
    QueryNext,
    QueryPrev,
    QueryPlay,
    QueryAdd,
    QueryAddAll,

    // Playlist
    PlaylistNext,
    PlaylistPrev,
    PlaylistRemove,
    PlaylistClear,
    PlaylistShow,
    Open(PathBuf),
    Save(PathBuf),

    // Playback
    Play,
    Back,
    Pause,
    SkipForward,
    SkipBack,
    /// Position as a percentage of the track
    Seek(f64),
    Volume(i32),
    Mute,
    Quality(QualityCommand),

    // Modes
    Shuffle,
    Autoplay,
    ShortSongs,

    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
search <text>   search and list the first result (alias: s)
qn / qp         next / previous search result
qplay           play the selected search result
qadd            add the selected search result to the playlist
qall            add all search results to the playlist
next / prev     move the playlist head
remove          remove the playlist head
clear           empty the playlist
list            show the playlist
open <file>     load a playlist file
save <file>     save the playlist
play            play the playlist head (alias: n)
back            play the previous track (alias: b)
pause           pause / resume (alias: p)
ff / rw         skip forward / back
seek <0-100>    jump to a percentage of the track
vol <0-100>     set volume
mute            mute / unmute
quality <up|down|max|min>
shuffle         toggle shuffle
autoplay        toggle autoplay
short           toggle the short-song filter
status          show player status
help            show this help
quit            exit";

/// Parse one input line; blank lines yield `None`
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, argument) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "search" | "s" => Command::Search(required(word, argument)?.to_string()),
        "qn" => Command::QueryNext,
        "qp" => Command::QueryPrev,
        "qplay" => Command::QueryPlay,
        "qadd" => Command::QueryAdd,
        "qall" => Command::QueryAddAll,

        "next" => Command::PlaylistNext,
        "prev" => Command::PlaylistPrev,
        "remove" | "rm" => Command::PlaylistRemove,
        "clear" => Command::PlaylistClear,
        "list" | "ls" => Command::PlaylistShow,
        "open" => Command::Open(PathBuf::from(required(word, argument)?)),
        "save" => Command::Save(PathBuf::from(required(word, argument)?)),

        "play" | "n" => Command::Play,
        "back" | "b" => Command::Back,
        "pause" | "p" => Command::Pause,
        "ff" => Command::SkipForward,
        "rw" => Command::SkipBack,
        "seek" => {
            let percent: f64 = required(word, argument)?
                .parse()
                .map_err(|_| AppError::invalid_argument(word, "expected a percentage"))?;
            Command::Seek(percent)
        }
        "vol" | "volume" => {
            let level: i32 = required(word, argument)?
                .parse()
                .map_err(|_| AppError::invalid_argument(word, "expected a number"))?;
            Command::Volume(level)
        }
        "mute" => Command::Mute,
        "quality" | "q" => Command::Quality(parse_quality(word, argument)?),

        "shuffle" => Command::Shuffle,
        "autoplay" => Command::Autoplay,
        "short" => Command::ShortSongs,

        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => return Err(AppError::UnknownCommand(word.to_string())),
    };

    Ok(Some(command))
}

fn required<'a>(command: &str, argument: &'a str) -> Result<&'a str> {
    if argument.is_empty() {
        Err(AppError::invalid_argument(command, "missing argument"))
    } else {
        Ok(argument)
    }
}

fn parse_quality(command: &str, argument: &str) -> Result<QualityCommand> {
    match argument.to_ascii_lowercase().as_str() {
        "up" | "+" => Ok(QualityCommand::Raise),
        "down" | "-" => Ok(QualityCommand::Lower),
        "max" => Ok(QualityCommand::Max),
        "min" => Ok(QualityCommand::Min),
        _ => Err(AppError::invalid_argument(
            command,
            "expected up, down, max or min",
        )),
    }
}
