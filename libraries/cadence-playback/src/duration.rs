//! Duration text parsing and the short-song predicate
//!
//! The platform reports durations as `H:MM:SS` or `MM:SS`. Anything else is
//! treated as unknown, and unknown durations are never considered short so
//! the filter can only drop tracks it is sure about.

/// Tracks shorter than this many seconds pass the short-song filter
pub const MAX_SHORT_SONG_SECS: u64 = 300;

/// Parse `H:MM:SS` or `MM:SS` into seconds
///
/// Returns `None` for any other shape, a non-numeric component, or a total
/// that does not fit in `u64`.
pub fn parse_duration(duration: &str) -> Option<u64> {
    let parts = duration
        .split(':')
        .map(|part| part.trim().parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    match parts.as_slice() {
        [hours, minutes, seconds] => hours
            .checked_mul(3600)?
            .checked_add(minutes.checked_mul(60)?)?
            .checked_add(*seconds),
        [minutes, seconds] => minutes.checked_mul(60)?.checked_add(*seconds),
        _ => None,
    }
}

/// Whether a track with this duration passes the short-song filter
pub fn song_is_short(duration: &str) -> bool {
    parse_duration(duration).is_some_and(|secs| secs < MAX_SHORT_SONG_SECS)
}

/// Format seconds the way the platform does (`M:SS` or `H:MM:SS`)
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
