//! Entry list operations and the edit buffer used by the management view.
//!
//! The committed list is only ever changed through the functions here:
//! committing an [`EditBuffer`], removing a winner, or shuffling.

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

/// Randomly permute `entries` in place.
///
/// Returns `false` (and leaves the list alone) when there are fewer than two
/// entries.
pub fn shuffle_entries<R: Rng + ?Sized>(entries: &mut [String], rng: &mut R) -> bool {
    if entries.len() < 2 {
        debug!("Shuffle skipped: {} entries", entries.len());
        return false;
    }
    entries.shuffle(rng);
    info!("Shuffled {} entries", entries.len());
    true
}

/// Remove the first entry equal to `text`. Duplicates beyond the first are kept.
pub fn remove_first(entries: &mut Vec<String>, text: &str) -> bool {
    match entries.iter().position(|e| e == text) {
        Some(pos) => {
            entries.remove(pos);
            true
        }
        None => false,
    }
}

/// Scratch copy of the entry list while the management view is open.
///
/// Nothing done to the buffer touches the committed list until the caller
/// takes the contents with [`EditBuffer::commit`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EditBuffer {
    names: Vec<String>,
}

impl EditBuffer {
    /// Snapshot the committed list.
    pub fn open(committed: &[String]) -> Self {
        Self {
            names: committed.to_vec(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Append a trimmed entry. Blank input is ignored.
    pub fn push(&mut self, raw: &str) -> bool {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.names.push(trimmed.to_string());
        true
    }

    /// Append every non-blank item, returning how many were added.
    pub fn extend<I, S>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        items
            .into_iter()
            .filter(|item| self.push(item.as_ref()))
            .count()
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.names.len()).then(|| self.names.remove(index))
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// Consume the buffer, yielding the list to commit.
    pub fn commit(self) -> Vec<String> {
        self.names
    }
}
