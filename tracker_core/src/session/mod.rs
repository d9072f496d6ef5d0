//! Session state - the current position, its provenance, and history.
//!
//! One `ChapterTracker` serves one logical caller. The host delivers
//! stage-change notifications serially; the tracker performs no locking or
//! reentrancy detection of its own (see crate docs).

mod history;

pub use history::*;

use std::time::SystemTime;

use log::debug;
use serde::{Deserialize, Serialize};

use document_index::{ChapterId, ChapterInfo, ContentIndex, DocumentId, PageId, SubchapterInfo};

use crate::context::format_downstream;
use crate::navigation::{sibling_chapters, SiblingChapters};
use crate::resolver::{tokenize_keywords, PositionResolver, StageId, StageSignal};

/// How the current chapter was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SourceKind {
    /// Resolved from a host stage signal.
    StageSignal,
    /// Chosen directly by the operator.
    Manual,
    /// Derived without operator involvement.
    Automatic,
    /// No chapter has been determined yet.
    #[default]
    None,
}

/// Provenance of the current chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChapterSource {
    pub kind: SourceKind,
    pub stage_id: Option<StageId>,
    pub stage_name: Option<String>,
    /// When the position last changed.
    pub updated_at: Option<SystemTime>,
}

impl ChapterSource {
    /// Provenance for a resolved stage signal.
    pub fn stage(signal: &StageSignal) -> Self {
        Self {
            kind: SourceKind::StageSignal,
            stage_id: Some(signal.id.clone()),
            stage_name: Some(signal.name.clone()),
            updated_at: Some(SystemTime::now()),
        }
    }

    /// Provenance for an operator selection.
    pub fn manual() -> Self {
        Self {
            kind: SourceKind::Manual,
            stage_id: None,
            stage_name: None,
            updated_at: Some(SystemTime::now()),
        }
    }

    /// Provenance for a derived selection.
    pub fn automatic() -> Self {
        Self {
            kind: SourceKind::Automatic,
            stage_id: None,
            stage_name: None,
            updated_at: Some(SystemTime::now()),
        }
    }

    /// Empty provenance.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Tracks the operator's current position within the selected document.
#[derive(Debug, Default)]
pub struct ChapterTracker {
    selected: Option<DocumentId>,
    current: Option<ChapterInfo>,
    source: ChapterSource,
    subchapters: Vec<SubchapterInfo>,
    history: NavigationHistory,
    resolver: PositionResolver,
}

impl ChapterTracker {
    /// Create a tracker with no document selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the document positions are tracked against.
    ///
    /// Switching documents bulk-invalidates cached resolutions for the
    /// previous selection and resets position, subchapters, history, and
    /// provenance. Re-selecting the current document is a no-op.
    pub fn select_document(&mut self, document: Option<DocumentId>) {
        if self.selected == document {
            return;
        }
        if let Some(previous) = self.selected.take() {
            self.resolver.invalidate_document(&previous);
        }
        debug!("document selection changed to {:?}", document);
        self.selected = document;
        self.reset_position();
    }

    /// The currently selected document.
    pub fn selected_document(&self) -> Option<&DocumentId> {
        self.selected.as_ref()
    }

    /// Handle a stage-change notification from the host.
    ///
    /// Resolves the signal against the selected document and, on success,
    /// makes the resolved chapter current with stage-signal provenance.
    /// Returns whether the signal resolved.
    pub fn on_stage_change<I: ContentIndex>(&mut self, signal: &StageSignal, index: &I) -> bool {
        let Some(document) = self.selected.clone() else {
            return false;
        };
        match self.resolver.resolve(signal, &document, index) {
            Some(info) => {
                self.set_current(info, ChapterSource::stage(signal), index);
                true
            }
            None => false,
        }
    }

    /// Make a chapter current.
    ///
    /// A chapter that is already current is a no-op: nothing is pushed to
    /// history and subchapters are not recomputed. Otherwise the previous
    /// current chapter moves into history, provenance is stamped with the
    /// current time, and the subchapter list is rebuilt from the tree.
    pub fn set_current<I: ContentIndex>(
        &mut self,
        chapter: ChapterInfo,
        source: ChapterSource,
        index: &I,
    ) {
        if self.current.as_ref().is_some_and(|c| c.id() == chapter.id()) {
            return;
        }
        if let Some(previous) = self.current.take() {
            self.history.push(previous);
        }
        debug!(
            "current chapter is now '{}' ({:?})",
            chapter.title(),
            source.kind
        );
        self.current = Some(chapter);
        self.source = ChapterSource {
            updated_at: Some(SystemTime::now()),
            ..source
        };
        self.recompute_subchapters(index);
    }

    /// Select a chapter directly by identifier, bypassing the resolver.
    ///
    /// Returns whether the chapter exists in the selected document.
    pub fn set_manual<I: ContentIndex>(&mut self, chapter: &ChapterId, index: &I) -> bool {
        let Some(document) = self.selected.clone() else {
            return false;
        };
        let Some(entry) = index
            .flat_list(&document)
            .iter()
            .find(|e| e.id == *chapter)
        else {
            return false;
        };
        let info = index.chapter_info(&document, entry);
        self.set_current(info, ChapterSource::manual(), index);
        true
    }

    /// Return to the most recent history entry.
    ///
    /// The popped chapter becomes current without the usual dedup check,
    /// the chapter it replaces is discarded, and provenance is recorded as
    /// manual regardless of how the popped chapter was originally reached.
    pub fn navigate_back<I: ContentIndex>(&mut self, index: &I) -> bool {
        let Some(previous) = self.history.pop() else {
            return false;
        };
        debug!("navigating back to '{}'", previous.title());
        self.current = Some(previous);
        self.source = ChapterSource::manual();
        self.recompute_subchapters(index);
        true
    }

    /// Search pages of the selected document with a manual keyword query.
    ///
    /// Applies the same tokenization as the resolver's keyword fallback.
    pub fn search_pages<I: ContentIndex>(&self, query: &str, index: &I) -> Vec<PageId> {
        let Some(document) = self.selected.as_ref() else {
            return Vec::new();
        };
        let keywords = tokenize_keywords(query);
        if keywords.is_empty() {
            return Vec::new();
        }
        index.search_by_keywords(document, &keywords)
    }

    /// Nearest chapters at the current depth, in both directions.
    pub fn siblings<I: ContentIndex>(&self, index: &I) -> SiblingChapters {
        match (self.selected.as_ref(), self.current.as_ref()) {
            (Some(document), Some(current)) => {
                sibling_chapters(index.flat_list(document), &current.id())
            }
            _ => SiblingChapters::default(),
        }
    }

    /// Render the current position for downstream consumers.
    pub fn context_block(&self, max_content_length: usize) -> String {
        format_downstream(self.current.as_ref(), &self.subchapters, max_content_length)
    }

    /// Reset position, subchapters, history, provenance, and every cached
    /// resolution. The document selection is kept.
    pub fn clear(&mut self) {
        self.resolver.clear_cache();
        self.reset_position();
    }

    /// The current chapter, if one has been determined.
    pub fn current(&self) -> Option<&ChapterInfo> {
        self.current.as_ref()
    }

    /// Provenance of the current chapter.
    pub fn source(&self) -> &ChapterSource {
        &self.source
    }

    /// Immediate children of the current chapter.
    pub fn subchapters(&self) -> &[SubchapterInfo] {
        &self.subchapters
    }

    /// Previously current chapters, oldest first.
    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    fn reset_position(&mut self) {
        self.current = None;
        self.source = ChapterSource::none();
        self.subchapters.clear();
        self.history.clear();
    }

    fn recompute_subchapters<I: ContentIndex>(&mut self, index: &I) {
        self.subchapters.clear();
        let (Some(document), Some(current)) = (self.selected.as_ref(), self.current.as_ref())
        else {
            return;
        };
        let Some(tree) = index.tree(document) else {
            return;
        };
        let Some(node_id) = tree.find(&current.id()) else {
            return;
        };
        for &child_id in tree.children(node_id) {
            if let Some(child) = tree.get(child_id) {
                self.subchapters.push(SubchapterInfo {
                    id: child.id,
                    title: child.title.clone(),
                    level: child.level,
                    path: format!("{} > {}", current.path(), child.title),
                });
            }
        }
    }
}
