//! Size-bounded log of entered lines with a browsing pointer.
//!
//! The pointer ranges over `0..=len`; `pointer == len` means the user is on the
//! live edit rather than a history entry. The live edit is stashed in a pending
//! slot when the user first steps back, and handed out again when they return.

use std::collections::VecDeque;

use crate::error::HistoryError;

/// Default number of entries kept before the oldest is evicted.
pub const DEFAULT_MAX_HISTORY: usize = 500;

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    max_len: usize,
    pointer: usize,
    pending: String,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl History {
    pub fn new(max_len: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_len,
            pointer: 0,
            pending: String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Append a submitted line and move the pointer back to the live edit.
    ///
    /// A line equal to the most recent entry is not stored twice.
    pub fn append(&mut self, line: &str) {
        if self.entries.back().map(String::as_str) != Some(line) {
            self.entries.push_back(line.to_string());
        }
        self.pointer = self.entries.len();
        while self.entries.len() > self.max_len {
            self.entries.pop_front();
            self.pointer -= 1;
        }
        self.pending.clear();
    }

    /// Step one entry towards the oldest line.
    ///
    /// `current` is the text on screen; it is only remembered when leaving the
    /// live edit.
    pub fn back(&mut self, current: &str) -> Result<&str, HistoryError> {
        if self.pointer == 0 {
            return Err(HistoryError::AtStart);
        }
        if self.pointer == self.entries.len() {
            self.pending = current.to_string();
        }
        self.pointer -= 1;
        Ok(&self.entries[self.pointer])
    }

    /// Step one entry towards the live edit.
    pub fn forward(&mut self) -> Result<&str, HistoryError> {
        if self.pointer == self.entries.len() {
            return Err(HistoryError::AtEnd);
        }
        self.pointer += 1;
        if self.pointer == self.entries.len() {
            Ok(&self.pending)
        } else {
            Ok(&self.entries[self.pointer])
        }
    }

    /// Drop any browsing state left by `back`/`forward`.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.pointer = self.entries.len();
    }

    /// Render all entries, one per line.
    pub fn dump(&self, with_numbers: bool) -> String {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                if with_numbers {
                    format!("{i:5}  {entry}")
                } else {
                    entry.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
