//! Batch assembly: the set of tracks propagated together.
//!
//! Tracks are added one at a time; adding an already-selected track is
//! ignored so a batch never holds duplicates.

use meshprop_common::track::TrackId;

/// Ordered, duplicate-free set of tracks forming one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackSelection {
    tracks: Vec<TrackId>,
}

impl TrackSelection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `track` if not already selected. Returns true if it was added.
    pub fn add(&mut self, track: TrackId) -> bool {
        if self.tracks.contains(&track) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Remove `track`. Returns true if it was selected.
    pub fn remove(&mut self, track: TrackId) -> bool {
        let before = self.tracks.len();
        self.tracks.retain(|t| *t != track);
        self.tracks.len() != before
    }

    /// Whether `track` is selected.
    pub fn contains(&self, track: TrackId) -> bool {
        self.tracks.contains(&track)
    }

    /// Number of selected tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Selected tracks in insertion order.
    pub fn as_slice(&self) -> &[TrackId] {
        &self.tracks
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.tracks.iter().copied()
    }
}

impl FromIterator<TrackId> for TrackSelection {
    fn from_iter<I: IntoIterator<Item = TrackId>>(iter: I) -> Self {
        let mut selection = Self::new();
        for track in iter {
            selection.add(track);
        }
        selection
    }
}

impl Extend<TrackId> for TrackSelection {
    fn extend<I: IntoIterator<Item = TrackId>>(&mut self, iter: I) {
        for track in iter {
            self.add(track);
        }
    }
}
