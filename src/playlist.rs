use crate::track::TrackInfo;
use log::{debug, warn};
use std::fmt;


/// An ordered list of borrowed tracks with a maximum size fixed at construction.
///
/// The list never owns its tracks. Every slot past `len()` is empty, and nothing is ever
/// reallocated: `storage` is sized once in `new` and operations that would overflow it are
/// rejected instead.
#[derive(Debug)]
pub struct Playlist<'a, T: TrackInfo + ?Sized> {
    storage: Vec<Option<&'a T>>,

    /// Number of populated leading slots in `storage`.
    size: usize,
}

impl<'a, T: TrackInfo + ?Sized> Playlist<'a, T> {
    /// Creates an empty playlist that can hold at most `capacity` tracks.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be positive");
        Playlist {
            storage: vec![None; capacity],
            size: 0,
        }
    }

    /// Returns the maximum number of tracks this playlist can hold.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Returns the current number of tracks.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn is_full(&self) -> bool {
        self.size == self.capacity()
    }

    /// Returns the track at `index`, or `None` if `index` is past the end.
    pub fn get(&self, index: usize) -> Option<&'a T> {
        if index < self.size {
            self.storage[index]
        } else {
            None
        }
    }

    /// Returns the populated slots, in order.
    fn tracks(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.storage[..self.size].iter().flatten().copied()
    }

    /// Returns the index of the first track whose title equals `title`, ignoring case.
    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.tracks().position(|track| titles_match(track.title(), title))
    }

    /// Returns the sum of all track durations, in seconds.
    pub fn total_duration(&self) -> u64 {
        self.tracks().map(|track| u64::from(track.duration())).sum()
    }

    /// Returns the index of the shortest track in `start..len()`. Ties go to the earliest index.
    /// Returns `None` if `start` is not a valid index.
    ///
    /// For example, if the durations are 7, 1, 6, 7, 5, 8, 7, then `min_duration_index(2)`
    /// returns `Some(4)`.
    pub fn min_duration_index(&self, start: usize) -> Option<usize> {
        if start >= self.size {
            return None;
        }
        let mut min_index = start;
        let mut min_duration = self.storage[start]?.duration();
        for (i, track) in self.tracks().enumerate().skip(start + 1) {
            let duration = track.duration();
            if duration < min_duration {
                min_duration = duration;
                min_index = i;
            }
        }
        Some(min_index)
    }

    /// Returns the title of the shortest track, or `None` if the playlist is empty.
    pub fn title_of_shortest(&self) -> Option<&'a str> {
        let track = self.get(self.min_duration_index(0)?)?;
        Some(track.title())
    }

    /// Appends a track to the end of the playlist.
    /// Returns `false`, leaving the playlist unchanged, if it is already full.
    #[must_use]
    pub fn push(&mut self, track: &'a T) -> bool {
        if self.is_full() {
            debug!("Rejected push of '{}': playlist is full (capacity: {})", track.title(), self.capacity());
            return false;
        }
        self.storage[self.size] = Some(track);
        self.size += 1;
        debug_assert!(self.verify_integrity());
        true
    }

    /// Inserts a track at `index`, shifting every later track one slot to the right.
    /// `index == len()` is equivalent to `push`.
    ///
    /// Returns `false`, leaving the playlist unchanged, if `index > len()` or the playlist is
    /// full.
    #[must_use]
    pub fn insert(&mut self, index: usize, track: &'a T) -> bool {
        if index > self.size || self.is_full() {
            debug!("Rejected insert of '{}' at {} (len: {}, capacity: {})",
                track.title(), index, self.size, self.capacity());
            return false;
        }
        // Move from the highest index down so nothing is overwritten
        for i in (index..self.size).rev() {
            self.storage[i + 1] = self.storage[i];
        }
        self.storage[index] = Some(track);
        self.size += 1;
        debug_assert!(self.verify_integrity());
        true
    }

    /// Removes the track at `index`, shifting every later track one slot to the left.
    /// Does nothing if `index` is past the end.
    pub fn remove_at(&mut self, index: usize) {
        if index >= self.size {
            warn!("Out-of-bounds remove_at requested (index: {}, len: {})", index, self.size);
            return;
        }
        for i in index..self.size - 1 {
            self.storage[i] = self.storage[i + 1];
        }
        self.storage[self.size - 1] = None;
        self.size -= 1;
        debug_assert!(self.verify_integrity());
    }

    /// Removes the first track whose title equals `title`, ignoring case.
    /// Does nothing if there is no such track.
    pub fn remove_title(&mut self, title: &str) {
        if let Some(index) = self.index_of(title) {
            self.remove_at(index);
        }
    }

    /// Removes the first track. Does nothing if the playlist is empty.
    pub fn remove_first(&mut self) {
        if !self.is_empty() {
            self.remove_at(0);
        }
    }

    /// Removes the last track. Does nothing if the playlist is empty.
    pub fn remove_last(&mut self) {
        if self.size > 0 {
            self.storage[self.size - 1] = None;
            self.size -= 1;
        }
        debug_assert!(self.verify_integrity());
    }

    /// Appends every track of `other`, in order.
    ///
    /// This is all-or-nothing: if the combined number of tracks would exceed this playlist's
    /// capacity, nothing is appended and `false` is returned.
    #[must_use]
    pub fn push_all(&mut self, other: &Playlist<'a, T>) -> bool {
        if other.len() + self.size > self.capacity() {
            debug!("Rejected push_all of {} tracks (len: {}, capacity: {})",
                other.len(), self.size, self.capacity());
            return false;
        }
        for track in other.tracks() {
            let pushed = self.push(track);
            debug_assert!(pushed);
        }
        true
    }

    /// Sorts the playlist by increasing duration, in place.
    ///
    /// This is a selection sort: position `i` receives the earliest shortest track from `i..`,
    /// swapped with whatever occupied it. Equal durations can therefore change relative order.
    pub fn sort_by_duration(&mut self) {
        for i in 0..self.size.saturating_sub(1) {
            match self.min_duration_index(i) {
                Some(min_index) if min_index != i => self.storage.swap(i, min_index),
                _ => {},
            }
        }
        debug_assert!(self.verify_integrity());
    }

    /// Verifies the integrity of the struct. This is slow-ish and intended for use with
    /// `debug_assert`.
    fn verify_integrity(&self) -> bool {
        self.size <= self.storage.len()
            && self.storage[..self.size].iter().all(Option::is_some)
            && self.storage[self.size..].iter().all(Option::is_none)
    }
}

impl<T: TrackInfo + ?Sized> Clone for Playlist<'_, T> {
    fn clone(&self) -> Self {
        Playlist {
            storage: self.storage.clone(),
            size: self.size,
        }
    }
}

/// Case-insensitive title comparison.
fn titles_match(a: &str, b: &str) -> bool {
    a.chars().flat_map(char::to_lowercase).eq(b.chars().flat_map(char::to_lowercase))
}

/// Writes each track on its own line.
impl<T: TrackInfo + fmt::Display + ?Sized> fmt::Display for Playlist<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for track in self.tracks() {
            writeln!(f, "{}", track)?;
        }
        Ok(())
    }
}
