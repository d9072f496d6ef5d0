//! Position cache for resolved stage signals.

use std::collections::HashMap;

use document_index::{ChapterInfo, DocumentId};

use super::StageId;

/// Cache of resolved positions keyed by (document, stage).
///
/// A cached entry shadows every other resolution strategy until it is
/// invalidated, so entries must be dropped in bulk whenever the selected
/// document changes.
#[derive(Debug, Clone, Default)]
pub struct PositionCache {
    entries: HashMap<DocumentId, HashMap<StageId, ChapterInfo>>,
}

impl PositionCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previously resolved position.
    pub fn get(&self, document: &DocumentId, stage: &StageId) -> Option<&ChapterInfo> {
        self.entries.get(document)?.get(stage)
    }

    /// Store a resolved position.
    pub fn insert(&mut self, document: DocumentId, stage: StageId, info: ChapterInfo) {
        self.entries.entry(document).or_default().insert(stage, info);
    }

    /// Drop every entry for one document.
    pub fn clear_document(&mut self, document: &DocumentId) {
        self.entries.remove(document);
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Total number of cached positions across all documents.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
