use super::track::Track;
use super::PlayerError;

/// The play queue: an ordered list of tracks plus a cursor. Only the
/// playback controller mutates it, and only from the foreground task, so
/// there is no locking here. The cursor is meaningless while the queue is
/// empty and always in-bounds otherwise.
#[derive(Debug, Default)]
pub struct Queue {
    items: Vec<Track>,
    cursor: usize,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, track: Track) {
        self.items.push(track);
    }

    /// Discard everything and start over from the first of `tracks`.
    /// Used by "play all results".
    pub fn replace_all(&mut self, tracks: Vec<Track>) {
        self.items = tracks;
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = 0;
    }

    /// Move the cursor forward and return the new current track. Fails
    /// with `EndOfQueue` at the last item, leaving the cursor untouched.
    pub fn advance(&mut self) -> Result<&Track, PlayerError> {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
            Ok(&self.items[self.cursor])
        } else {
            Err(PlayerError::EndOfQueue)
        }
    }

    /// Move the cursor back one track, failing with `StartOfQueue` at the
    /// first item.
    pub fn retreat(&mut self) -> Result<&Track, PlayerError> {
        if self.cursor > 0 && !self.items.is_empty() {
            self.cursor -= 1;
            Ok(&self.items[self.cursor])
        } else {
            Err(PlayerError::StartOfQueue)
        }
    }

    pub fn current(&self) -> Option<&Track> {
        self.items.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Track] {
        &self.items
    }
}
