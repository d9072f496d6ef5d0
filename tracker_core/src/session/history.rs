//! Bounded navigation history.

use std::collections::VecDeque;

use log::trace;

use document_index::{ChapterId, ChapterInfo};

/// Maximum number of chapters retained for back navigation.
pub const HISTORY_CAPACITY: usize = 20;

/// Bounded stack of previously current chapters.
///
/// The oldest entry is evicted first once capacity is exceeded. The
/// currently active chapter is never stored here; the tracker pushes a
/// chapter only at the moment it stops being current.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: VecDeque<ChapterInfo>,
    capacity: usize,
}

impl NavigationHistory {
    /// Create a history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Create a history with a custom capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a chapter, evicting the oldest entry past capacity.
    pub fn push(&mut self, chapter: ChapterInfo) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                trace!("history evicted '{}'", evicted.title());
            }
        }
        self.entries.push_back(chapter);
    }

    /// Pop the most recent entry.
    pub fn pop(&mut self) -> Option<ChapterInfo> {
        self.entries.pop_back()
    }

    /// Whether a chapter is currently in history.
    pub fn contains(&self, chapter: &ChapterId) -> bool {
        self.entries.iter().any(|c| c.id() == *chapter)
    }

    /// Iterate from oldest to most recent.
    pub fn iter(&self) -> impl Iterator<Item = &ChapterInfo> {
        self.entries.iter()
    }

    /// Number of retained chapters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all retained chapters.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new()
    }
}
