//! Arena node definition for the chapter tree.

use serde::{Deserialize, Serialize};

use super::{ChapterId, NodeKind, PageId, PAGE_LEVEL, SECTION_LEVEL};
use crate::tree::NodeId;

/// A single chapter stored in the tree arena.
///
/// Child links are arena indices maintained by the owning `ChapterTree`;
/// nodes never reference each other directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterNode {
    pub id: ChapterId,
    pub title: String,

    /// Depth in the hierarchy: 0 for the page root, 1-6 for headings,
    /// 7 for leaf sections.
    pub level: u8,
    pub kind: NodeKind,

    /// Page that owns this node.
    pub page_id: PageId,
    pub page_name: String,

    /// Raw text content of this chapter; empty when the chapter is purely
    /// structural.
    pub content: String,

    /// Direct children in the arena, in document order.
    pub children: Vec<NodeId>,
}

impl ChapterNode {
    /// Create a new node with a fresh chapter ID.
    pub fn new(
        title: impl Into<String>,
        level: u8,
        kind: NodeKind,
        page_id: PageId,
        page_name: impl Into<String>,
    ) -> Self {
        Self {
            id: ChapterId::new(),
            title: title.into(),
            level,
            kind,
            page_id,
            page_name: page_name.into(),
            content: String::new(),
            children: Vec::new(),
        }
    }

    /// Create a level-0 page root; the page name doubles as the title.
    pub fn page(page_id: PageId, name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), PAGE_LEVEL, NodeKind::Page, page_id, name)
    }

    /// Create a heading node at the given depth.
    pub fn heading(
        title: impl Into<String>,
        level: u8,
        page_id: PageId,
        page_name: impl Into<String>,
    ) -> Self {
        Self::new(title, level, NodeKind::Heading, page_id, page_name)
    }

    /// Create a leaf section node.
    pub fn section(
        title: impl Into<String>,
        page_id: PageId,
        page_name: impl Into<String>,
    ) -> Self {
        Self::new(title, SECTION_LEVEL, NodeKind::Section, page_id, page_name)
    }

    /// Set the raw text content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_node() {
        let node = ChapterNode::page(PageId::new("P1"), "The Docks");
        assert_eq!(node.level, PAGE_LEVEL);
        assert_eq!(node.kind, NodeKind::Page);
        assert_eq!(node.title, "The Docks");
        assert_eq!(node.page_name, "The Docks");
        assert!(node.is_leaf());
    }

    #[test]
    fn test_section_node() {
        let node = ChapterNode::section("Back Room", PageId::new("P1"), "The Docks")
            .with_content("A cramped storage room.");
        assert_eq!(node.level, SECTION_LEVEL);
        assert_eq!(node.kind, NodeKind::Section);
        assert_eq!(node.content, "A cramped storage room.");
    }
}
