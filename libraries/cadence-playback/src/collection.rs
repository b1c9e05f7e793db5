//! Navigable ordered collection
//!
//! Backs both the search results and the playlist. The collection is a ring:
//! the current item is always the logical head, and navigation rotates the
//! ring instead of moving an index.
//!
//! ```text
//!  head
//!   v
//! [ B ]  C   D   A        advance(Next) -> [ C ] D A B
//!                         advance(Prev) -> [ A ] B C D
//!                         append(E)     -> [ B ] C D A E
//!                         remove_current -> [ C ] D A
//! ```
//!
//! In shuffle mode the next head is drawn from the identities that have not
//! been presented since the last cycle reset (see [`UnvisitedSet`]).

use crate::shuffle::UnvisitedSet;
use crate::types::{Direction, Track};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::VecDeque;

/// Rotation-addressed ring of tracks with fair shuffle
#[derive(Debug, Clone)]
pub struct NavigableCollection {
    /// Items in logical order; the front is the current item
    items: VecDeque<Track>,

    /// Identities not yet presented in the current shuffle cycle
    unvisited: UnvisitedSet,

    /// Whether advancing draws a random unvisited item
    shuffle: bool,

    rng: StdRng,
}

impl NavigableCollection {
    /// Create an empty linear collection
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an empty collection with a reproducible shuffle sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            items: VecDeque::new(),
            unvisited: UnvisitedSet::new(),
            shuffle: false,
            rng,
        }
    }

    /// Current item (the logical head)
    pub fn current(&self) -> Option<&Track> {
        self.items.front()
    }

    /// Move the head one step
    ///
    /// Linear mode rotates by one slot in the given direction, wrapping around.
    /// Shuffle mode has no reverse: both directions draw a random unvisited
    /// item, starting a new cycle first if every item has been visited.
    pub fn advance(&mut self, direction: Direction) {
        if self.items.is_empty() {
            return;
        }

        if self.unvisited.is_empty() {
            self.refill_unvisited();
        }

        if self.shuffle {
            self.advance_random();
        } else {
            match direction {
                Direction::Next => self.items.rotate_left(1),
                Direction::Prev => self.items.rotate_right(1),
            }
        }
    }

    /// Rotate a random unvisited item to the head and mark it visited
    fn advance_random(&mut self) {
        while let Some(url) = self.unvisited.pick(&mut self.rng).map(str::to_string) {
            self.unvisited.remove(&url);
            if let Some(offset) = self.items.iter().position(|track| track.url == url) {
                self.items.rotate_left(offset);
                return;
            }
        }
    }

    fn refill_unvisited(&mut self) {
        self.unvisited
            .refill(self.items.iter().map(|track| track.url.as_str()));
    }

    /// Add an item at the logical tail
    ///
    /// The head never changes. The item joins the current shuffle cycle.
    pub fn append(&mut self, track: Track) {
        self.unvisited.insert(&track.url);
        self.items.push_back(track);
    }

    /// Add several items at the logical tail, preserving their order
    pub fn extend(&mut self, tracks: impl IntoIterator<Item = Track>) {
        let tracks = tracks.into_iter();
        self.items.reserve(tracks.size_hint().0);
        for track in tracks {
            self.unvisited.insert(&track.url);
            self.items.push_back(track);
        }
    }

    /// Replace every item and start a fresh shuffle cycle
    ///
    /// The first given track becomes the head.
    pub fn replace(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.items = tracks.into_iter().collect();
        self.refill_unvisited();
    }

    /// Delete the head and re-establish a new one
    ///
    /// In linear mode the item after the removed one becomes the head; in
    /// shuffle mode a random unvisited item does.
    pub fn remove_current(&mut self) -> Option<Track> {
        let removed = self.items.pop_front()?;
        self.unvisited.remove(&removed.url);

        if self.shuffle && !self.items.is_empty() {
            self.advance(Direction::Next);
        }

        Some(removed)
    }

    /// Mark the head as visited without moving it
    ///
    /// Called right before the head starts playing.
    pub fn mark_current_visited(&mut self) {
        if let Some(track) = self.items.front() {
            self.unvisited.remove(&track.url);
        }
    }

    /// Remove every item; the shuffle flag is kept
    pub fn clear(&mut self) {
        self.items.clear();
        self.unvisited.clear();
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of items still unvisited in the current cycle
    pub fn unvisited_len(&self) -> usize {
        self.unvisited.len()
    }

    /// Whether the item with this identity is still unvisited
    pub fn is_unvisited(&self, url: &str) -> bool {
        self.unvisited.contains(url)
    }

    /// Items in logical order, starting with the head
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.items.iter()
    }

    /// Owned copy of the items in logical order
    pub fn to_vec(&self) -> Vec<Track> {
        self.items.iter().cloned().collect()
    }
}

impl Default for NavigableCollection {
    fn default() -> Self {
        Self::new()
    }
}
