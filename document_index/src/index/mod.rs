//! The content index - lookup contract and in-memory implementation.
//!
//! Implementations are populated out-of-band, before any resolution request
//! arrives, and are never mutated through the lookup contract.

use std::collections::HashMap;

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::chapter::{
    ChapterId, ChapterInfo, ChapterNode, DocumentId, FlatChapterEntry, NodeKind, PageId,
};
use crate::tree::{ChapterTree, NodeId, TreeError};

/// Lookup operations the tracker core resolves positions against.
pub trait ContentIndex {
    /// Document-order chapter entries; empty for unknown documents.
    fn flat_list(&self, document: &DocumentId) -> &[FlatChapterEntry];

    /// The chapter tree of a document.
    fn tree(&self, document: &DocumentId) -> Option<&ChapterTree>;

    /// Find a chapter whose title matches a scene name. Matching semantics
    /// are implementation-defined.
    fn find_by_scene_name(&self, document: &DocumentId, name: &str) -> Option<&FlatChapterEntry>;

    /// Pages ranked by keyword relevance, best match first.
    fn search_by_keywords(&self, document: &DocumentId, keywords: &[String]) -> Vec<PageId>;

    /// The chapter at a given offset within a page, counted in document
    /// order.
    fn chapter_at_page_offset(
        &self,
        document: &DocumentId,
        page: &PageId,
        offset: usize,
    ) -> Option<&FlatChapterEntry>;

    /// Human-readable name of a document.
    fn document_display_name(&self, document: &DocumentId) -> Option<String>;

    /// Full text content of a chapter, if it has any.
    fn chapter_content(&self, document: &DocumentId, chapter: &ChapterId) -> Option<&str>;

    /// Build the externally visible position record for a flat entry.
    fn chapter_info(&self, document: &DocumentId, entry: &FlatChapterEntry) -> ChapterInfo {
        let content = self.chapter_content(document, &entry.id).map(str::to_owned);
        ChapterInfo::from_entry(
            entry.clone(),
            document.clone(),
            self.document_display_name(document).unwrap_or_default(),
            content,
        )
    }
}

/// Errors raised while registering a document.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("malformed document payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Pre-parsed document payload accepted at the ingestion boundary.
///
/// Hosts parse raw documents elsewhere and hand the result over as nested
/// pages and sections; levels are assigned from nesting depth.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSpec {
    pub name: String,
    pub pages: Vec<PageSpec>,
}

/// One page of a pre-parsed document.
#[derive(Debug, Clone, Deserialize)]
pub struct PageSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

/// A heading or leaf section nested within a page.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionSpec {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

fn build_tree(spec: &DocumentSpec) -> Result<ChapterTree, TreeError> {
    let mut tree = ChapterTree::new();
    for page in &spec.pages {
        let page_id = PageId::new(page.id.clone());
        let root = tree.add_page(
            ChapterNode::page(page_id.clone(), page.name.clone()).with_content(page.content.clone()),
        )?;

        let mut stack: Vec<(NodeId, u8, &SectionSpec)> = page
            .sections
            .iter()
            .rev()
            .map(|s| (root, 1, s))
            .collect();
        while let Some((parent, level, section)) = stack.pop() {
            let node = tree.add_child(
                parent,
                ChapterNode::new(
                    section.title.clone(),
                    level,
                    NodeKind::for_level(level),
                    page_id.clone(),
                    page.name.clone(),
                )
                .with_content(section.content.clone()),
            )?;
            for child in section.sections.iter().rev() {
                stack.push((node, level + 1, child));
            }
        }
    }
    Ok(tree)
}

/// In-memory reference implementation of [`ContentIndex`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryIndex {
    documents: HashMap<DocumentId, IndexedDocument>,
}

#[derive(Debug, Clone)]
struct IndexedDocument {
    name: String,
    tree: ChapterTree,
    flat: Vec<FlatChapterEntry>,
}

impl InMemoryIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document from a built chapter tree.
    ///
    /// Replaces any previous registration under the same identifier; the
    /// flat list is computed once here.
    pub fn insert_document(
        &mut self,
        document: DocumentId,
        name: impl Into<String>,
        tree: ChapterTree,
    ) {
        let flat = tree.flatten();
        debug!("indexed document {}: {} chapters", document, flat.len());
        self.documents.insert(
            document,
            IndexedDocument {
                name: name.into(),
                tree,
                flat,
            },
        );
    }

    /// Register a document from a pre-parsed JSON payload.
    pub fn insert_document_json(
        &mut self,
        document: DocumentId,
        payload: &str,
    ) -> Result<(), IndexError> {
        let spec: DocumentSpec = serde_json::from_str(payload)?;
        let tree = build_tree(&spec)?;
        self.insert_document(document, spec.name, tree);
        Ok(())
    }

    /// Drop a document from the index. Returns whether it was present.
    pub fn remove_document(&mut self, document: &DocumentId) -> bool {
        self.documents.remove(document).is_some()
    }

    /// Number of registered documents.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}

impl ContentIndex for InMemoryIndex {
    fn flat_list(&self, document: &DocumentId) -> &[FlatChapterEntry] {
        self.documents
            .get(document)
            .map(|d| d.flat.as_slice())
            .unwrap_or(&[])
    }

    fn tree(&self, document: &DocumentId) -> Option<&ChapterTree> {
        self.documents.get(document).map(|d| &d.tree)
    }

    fn find_by_scene_name(&self, document: &DocumentId, name: &str) -> Option<&FlatChapterEntry> {
        // Case-insensitive exact title match, first hit in document order.
        self.flat_list(document)
            .iter()
            .find(|e| e.title.eq_ignore_ascii_case(name))
    }

    fn search_by_keywords(&self, document: &DocumentId, keywords: &[String]) -> Vec<PageId> {
        let Some(doc) = self.documents.get(document) else {
            return Vec::new();
        };
        if keywords.is_empty() {
            return Vec::new();
        }
        let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

        // Score pages by keyword occurrences across their chapters' titles
        // and content.
        let mut order: Vec<PageId> = Vec::new();
        let mut scores: HashMap<PageId, usize> = HashMap::new();
        for node in doc.tree.nodes() {
            let haystack = format!("{} {}", node.title, node.content).to_lowercase();
            let score: usize = lowered
                .iter()
                .map(|k| haystack.matches(k.as_str()).count())
                .sum();
            if score > 0 {
                if !scores.contains_key(&node.page_id) {
                    order.push(node.page_id.clone());
                }
                *scores.entry(node.page_id.clone()).or_default() += score;
            }
        }

        // Stable sort keeps document order among equally scored pages.
        let mut ranked = order;
        ranked.sort_by(|a, b| scores[b].cmp(&scores[a]));
        ranked
    }

    fn chapter_at_page_offset(
        &self,
        document: &DocumentId,
        page: &PageId,
        offset: usize,
    ) -> Option<&FlatChapterEntry> {
        self.flat_list(document)
            .iter()
            .filter(|e| e.page_id == *page)
            .nth(offset)
    }

    fn document_display_name(&self, document: &DocumentId) -> Option<String> {
        self.documents.get(document).map(|d| d.name.clone())
    }

    fn chapter_content(&self, document: &DocumentId, chapter: &ChapterId) -> Option<&str> {
        let doc = self.documents.get(document)?;
        let node = doc.tree.get(doc.tree.find(chapter)?)?;
        if node.content.is_empty() {
            None
        } else {
            Some(node.content.as_str())
        }
    }
}
