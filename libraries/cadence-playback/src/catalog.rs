//! Turning raw search hits into tracks

use crate::types::{SearchHit, Track};

/// Whether a title character survives sanitizing
///
/// Letters, digits, space, a small set of punctuation and the German
/// umlauts. The `+` to `=` span covers `+,-./0-9:;<=`.
fn is_allowed_title_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || ('+'..='=').contains(&c)
        || matches!(c, ' ' | '!' | '?' | '(' | ')' | 'ö' | 'ä' | 'ß' | 'ü')
}

/// Strip every character outside the title allow-list
pub fn sanitize_title(title: &str) -> String {
    title.chars().filter(|c| is_allowed_title_char(*c)).collect()
}

/// Build an absolute watch URL from an id, a URL suffix or a full URL
pub fn watch_url(base_url: &str, id_or_suffix: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if id_or_suffix.starts_with("http://") || id_or_suffix.starts_with("https://") {
        id_or_suffix.to_string()
    } else if id_or_suffix.starts_with('/') {
        format!("{}{}", base, id_or_suffix)
    } else {
        format!("{}/watch?v={}", base, id_or_suffix)
    }
}

/// Convert a search hit into a track
pub fn track_from_hit(base_url: &str, hit: &SearchHit) -> Track {
    Track {
        url: watch_url(base_url, &hit.id_or_suffix),
        title: sanitize_title(&hit.title),
        duration: hit.duration.clone(),
    }
}
