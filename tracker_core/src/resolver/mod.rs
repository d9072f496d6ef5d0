//! Position resolution - turns stage signals into document positions.
//!
//! Resolution runs a fixed, ordered strategy chain and returns the first
//! success:
//!
//! 1. **Cache hit**: a previously resolved (document, stage) pair is
//!    returned immediately, bypassing every other strategy
//! 2. **Direct link**: the signal's linked page matches a flat entry's page
//! 3. **Name match**: the index knows a chapter titled like the signal
//! 4. **Keyword fallback**: the tokenized signal name is fed to keyword
//!    search and the first ranked page wins at offset 0
//!
//! A later strategy is never consulted once an earlier one succeeds, even if
//! it would have produced a more specific match; this keeps resolution
//! deterministic and cheap. A cached entry therefore shadows index-backed
//! strategies until it is invalidated.

mod cache;

pub use cache::*;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use document_index::{ChapterInfo, ContentIndex, DocumentId, PageId};

/// Identifier of a stage, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageId(pub String);

impl StageId {
    /// Create a stage ID from a host-supplied string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a page inside a specific document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub document: DocumentId,
    pub page: PageId,
}

/// The host's notification describing the currently displayed stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSignal {
    pub id: StageId,
    pub name: String,
    /// Page this stage links to, when the host knows one.
    pub linked_page: Option<PageLink>,
}

impl StageSignal {
    /// Create a new stage signal.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: StageId::new(id),
            name: name.into(),
            linked_page: None,
        }
    }

    /// Attach a linked page reference.
    pub fn with_linked_page(mut self, document: DocumentId, page: PageId) -> Self {
        self.linked_page = Some(PageLink { document, page });
        self
    }
}

/// Minimum length of a keyword token; shorter tokens carry no signal.
const MIN_TOKEN_LEN: usize = 3;

/// Tokenize a stage name for keyword search.
///
/// Lowercases, replaces non-word characters with spaces, splits on
/// whitespace, and drops tokens shorter than three characters.
pub fn tokenize_keywords(name: &str) -> Vec<String> {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_owned)
        .collect()
}

/// Resolves stage signals against the content index.
///
/// Owns the position cache; see the module docs for the strategy chain.
#[derive(Debug, Default)]
pub struct PositionResolver {
    cache: PositionCache,
}

impl PositionResolver {
    /// Create a resolver with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a stage signal to a chapter within the selected document.
    ///
    /// Returns `None` when every strategy fails; the cache and index are
    /// left untouched in that case.
    pub fn resolve<I: ContentIndex>(
        &mut self,
        signal: &StageSignal,
        document: &DocumentId,
        index: &I,
    ) -> Option<ChapterInfo> {
        if let Some(hit) = self.cache.get(document, &signal.id) {
            trace!("stage {} resolved from cache", signal.id);
            return Some(hit.clone());
        }

        let resolved = self
            .resolve_direct_link(signal, document, index)
            .or_else(|| self.resolve_by_name(signal, document, index))
            .or_else(|| self.resolve_by_keywords(signal, document, index));

        match resolved {
            Some(info) => {
                self.cache
                    .insert(document.clone(), signal.id.clone(), info.clone());
                Some(info)
            }
            None => {
                debug!(
                    "stage {} ({}) did not resolve in {}",
                    signal.id, signal.name, document
                );
                None
            }
        }
    }

    fn resolve_direct_link<I: ContentIndex>(
        &self,
        signal: &StageSignal,
        document: &DocumentId,
        index: &I,
    ) -> Option<ChapterInfo> {
        let link = signal.linked_page.as_ref()?;
        if link.document != *document {
            return None;
        }
        let entry = index
            .flat_list(document)
            .iter()
            .find(|e| e.page_id == link.page)?;
        debug!(
            "stage {} resolved by direct link to page {}",
            signal.id, link.page
        );
        Some(index.chapter_info(document, entry))
    }

    fn resolve_by_name<I: ContentIndex>(
        &self,
        signal: &StageSignal,
        document: &DocumentId,
        index: &I,
    ) -> Option<ChapterInfo> {
        let entry = index.find_by_scene_name(document, &signal.name)?;
        debug!(
            "stage {} resolved by name match '{}'",
            signal.id, signal.name
        );
        Some(index.chapter_info(document, entry))
    }

    fn resolve_by_keywords<I: ContentIndex>(
        &self,
        signal: &StageSignal,
        document: &DocumentId,
        index: &I,
    ) -> Option<ChapterInfo> {
        let keywords = tokenize_keywords(&signal.name);
        if keywords.is_empty() {
            return None;
        }
        let pages = index.search_by_keywords(document, &keywords);
        let page = pages.first()?;
        let entry = index.chapter_at_page_offset(document, page, 0)?;
        debug!(
            "stage {} resolved by keywords {:?} to page {}",
            signal.id, keywords, page
        );
        Some(index.chapter_info(document, entry))
    }

    /// The underlying position cache.
    pub fn cache(&self) -> &PositionCache {
        &self.cache
    }

    /// Drop every cached resolution for a document.
    pub fn invalidate_document(&mut self, document: &DocumentId) {
        self.cache.clear_document(document);
    }

    /// Drop all cached resolutions.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use document_index::{ChapterId, ChapterNode, ChapterTree, FlatChapterEntry, InMemoryIndex};

    /// Index wrapper counting every lookup that reaches the inner index.
    struct CountingIndex {
        inner: InMemoryIndex,
        queries: Cell<usize>,
    }

    impl CountingIndex {
        fn new(inner: InMemoryIndex) -> Self {
            Self {
                inner,
                queries: Cell::new(0),
            }
        }

        fn bump(&self) {
            self.queries.set(self.queries.get() + 1);
        }
    }

    impl ContentIndex for CountingIndex {
        fn flat_list(&self, document: &DocumentId) -> &[FlatChapterEntry] {
            self.bump();
            self.inner.flat_list(document)
        }

        fn tree(&self, document: &DocumentId) -> Option<&ChapterTree> {
            self.bump();
            self.inner.tree(document)
        }

        fn find_by_scene_name(
            &self,
            document: &DocumentId,
            name: &str,
        ) -> Option<&FlatChapterEntry> {
            self.bump();
            self.inner.find_by_scene_name(document, name)
        }

        fn search_by_keywords(&self, document: &DocumentId, keywords: &[String]) -> Vec<PageId> {
            self.bump();
            self.inner.search_by_keywords(document, keywords)
        }

        fn chapter_at_page_offset(
            &self,
            document: &DocumentId,
            page: &PageId,
            offset: usize,
        ) -> Option<&FlatChapterEntry> {
            self.bump();
            self.inner.chapter_at_page_offset(document, page, offset)
        }

        fn document_display_name(&self, document: &DocumentId) -> Option<String> {
            self.bump();
            self.inner.document_display_name(document)
        }

        fn chapter_content(&self, document: &DocumentId, chapter: &ChapterId) -> Option<&str> {
            self.bump();
            self.inner.chapter_content(document, chapter)
        }
    }

    fn doc_id() -> DocumentId {
        DocumentId::new("adventure")
    }

    fn sample_index() -> InMemoryIndex {
        let mut tree = ChapterTree::new();
        let harbor = tree
            .add_page(ChapterNode::page(PageId::new("P1"), "Harbor"))
            .unwrap();
        tree.add_child(
            harbor,
            ChapterNode::heading("Arrival", 1, PageId::new("P1"), "Harbor")
                .with_content("The party arrives by sea."),
        )
        .unwrap();

        let tavern = tree
            .add_page(ChapterNode::page(PageId::new("P2"), "The Rusty Anchor"))
            .unwrap();
        tree.add_child(
            tavern,
            ChapterNode::heading("Back Room", 1, PageId::new("P2"), "The Rusty Anchor")
                .with_content("A smoky tavern back room for private deals."),
        )
        .unwrap();

        let mut index = InMemoryIndex::new();
        index.insert_document(doc_id(), "Adventure", tree);
        index
    }

    #[test]
    fn test_tokenize_keywords() {
        assert_eq!(
            tokenize_keywords("The Tavern's Back Room!"),
            vec!["the", "tavern", "back", "room"]
        );
        assert!(tokenize_keywords("a b c!").is_empty());
        assert_eq!(tokenize_keywords("snake_case name"), vec!["snake_case", "name"]);
    }

    #[test]
    fn test_direct_link_wins_over_name_match() {
        let index = sample_index();
        let mut resolver = PositionResolver::new();

        // Name matches the "Arrival" chapter, but the link points at P2.
        let signal =
            StageSignal::new("S1", "Arrival").with_linked_page(doc_id(), PageId::new("P2"));
        let info = resolver.resolve(&signal, &doc_id(), &index).unwrap();
        assert_eq!(info.title(), "The Rusty Anchor");
    }

    #[test]
    fn test_link_to_other_document_falls_through() {
        let index = sample_index();
        let mut resolver = PositionResolver::new();

        let signal = StageSignal::new("S1", "Arrival")
            .with_linked_page(DocumentId::new("elsewhere"), PageId::new("P2"));
        let info = resolver.resolve(&signal, &doc_id(), &index).unwrap();
        assert_eq!(info.title(), "Arrival");
    }

    #[test]
    fn test_keyword_fallback() {
        let index = sample_index();
        let mut resolver = PositionResolver::new();

        // No link, no exact title match; "tavern" only occurs on P2.
        let signal = StageSignal::new("S1", "A Tavern Meeting");
        let info = resolver.resolve(&signal, &doc_id(), &index).unwrap();
        assert_eq!(info.title(), "The Rusty Anchor");
        assert_eq!(info.level(), 0);
    }

    #[test]
    fn test_unresolvable_signal_leaves_cache_empty() {
        let index = sample_index();
        let mut resolver = PositionResolver::new();

        let signal = StageSignal::new("S1", "zz!");
        assert!(resolver.resolve(&signal, &doc_id(), &index).is_none());
        assert!(resolver.cache().is_empty());
    }

    #[test]
    fn test_cache_idempotence() {
        let index = CountingIndex::new(sample_index());
        let mut resolver = PositionResolver::new();

        let signal = StageSignal::new("S1", "Arrival");
        let first = resolver.resolve(&signal, &doc_id(), &index).unwrap();
        assert_eq!(resolver.cache().len(), 1);

        let before = index.queries.get();
        let second = resolver.resolve(&signal, &doc_id(), &index).unwrap();

        assert_eq!(first, second);
        // The cache hit must not touch the index at all.
        assert_eq!(index.queries.get(), before);
    }

    #[test]
    fn test_cache_scoped_to_document() {
        let index = sample_index();
        let mut resolver = PositionResolver::new();

        let signal = StageSignal::new("S1", "Arrival");
        resolver.resolve(&signal, &doc_id(), &index).unwrap();

        resolver.invalidate_document(&doc_id());
        assert!(resolver.cache().is_empty());
    }
}
