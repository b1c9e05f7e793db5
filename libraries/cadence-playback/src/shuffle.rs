//! Fair shuffle bookkeeping
//!
//! Shuffle picks the next track uniformly from the tracks that have not been
//! presented since the last cycle reset, so nothing repeats until everything
//! has had its turn. Identities are kept ordered so a seeded RNG gives a
//! reproducible pick sequence.

use rand::seq::IteratorRandom;
use rand::Rng;
use std::collections::BTreeSet;

/// Identities (track URLs) not yet visited in the current shuffle cycle
#[derive(Debug, Clone, Default)]
pub struct UnvisitedSet {
    urls: BTreeSet<String>,
}

impl UnvisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new cycle containing every given identity
    pub fn refill<'a>(&mut self, urls: impl IntoIterator<Item = &'a str>) {
        self.urls.clear();
        self.urls.extend(urls.into_iter().map(str::to_string));
    }

    pub fn insert(&mut self, url: &str) {
        self.urls.insert(url.to_string());
    }

    /// Returns true if the identity was still unvisited
    pub fn remove(&mut self, url: &str) -> bool {
        self.urls.remove(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn clear(&mut self) {
        self.urls.clear();
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Uniformly pick an unvisited identity without removing it
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.urls.iter().choose(rng).map(String::as_str)
    }
}
