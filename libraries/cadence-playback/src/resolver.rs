//! Track resolver abstraction
//!
//! Searching the platform and turning a watch URL into audio streams is
//! delegated to an external service behind this trait.

use crate::error::Result;
use crate::types::{ResolvedStreams, SearchHit};

/// Search and stream resolution backend
pub trait TrackResolver {
    /// Search for tracks, in the backend's relevance order
    fn search(&mut self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;

    /// Resolve a watch URL into audio-only streams, lowest quality first
    ///
    /// Fails if the URL is invalid. An empty stream list is returned as-is;
    /// the caller decides that nothing is playable.
    fn resolve_streams(&mut self, track_url: &str) -> Result<ResolvedStreams>;
}

/// Resolver with canned answers for tests
///
/// Every known URL resolves to three streams derived from the URL; unknown
/// URLs fail.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct StubResolver {
    pub hits: Vec<SearchHit>,
    pub known_urls: Vec<String>,
    pub resolved: Vec<String>,
    pub queries: Vec<String>,
}

#[cfg(test)]
impl StubResolver {
    pub fn stream_for(url: &str, index: usize) -> String {
        format!("{}#stream{}", url, index)
    }
}

#[cfg(test)]
impl TrackResolver for StubResolver {
    fn search(&mut self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        self.queries.push(query.to_string());
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }

    fn resolve_streams(&mut self, track_url: &str) -> Result<ResolvedStreams> {
        self.resolved.push(track_url.to_string());
        if !self.known_urls.iter().any(|url| url == track_url) {
            return Err(crate::error::PlaybackError::Resolution(format!(
                "unknown url {}",
                track_url
            )));
        }
        Ok(ResolvedStreams {
            urls: (0..3).map(|i| Self::stream_for(track_url, i)).collect(),
            title: track_url.to_string(),
        })
    }
}
