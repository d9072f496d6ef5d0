//! Flat document-order records and the externally visible position types.

use serde::{Deserialize, Serialize};

use super::{ChapterId, DocumentId, NodeKind, PageId};

/// A chapter flattened into the document-order list.
///
/// Produced by pre-order traversal of the chapter tree, so the order of a
/// document's entries matches reading order and each entry's level matches
/// its tree depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatChapterEntry {
    pub id: ChapterId,
    pub title: String,
    pub level: u8,
    pub kind: NodeKind,
    pub page_id: PageId,
    pub page_name: String,
    /// Hierarchical path, e.g. "Page > Section A > Subsection 1".
    pub path: String,
}

/// The externally visible "current position" record: a flat entry enriched
/// with its owning document and, when available, full text content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterInfo {
    pub entry: FlatChapterEntry,
    pub document_id: DocumentId,
    pub document_name: String,
    pub content: Option<String>,
}

impl ChapterInfo {
    /// Build a position record from a flat entry.
    pub fn from_entry(
        entry: FlatChapterEntry,
        document_id: DocumentId,
        document_name: String,
        content: Option<String>,
    ) -> Self {
        Self {
            entry,
            document_id,
            document_name,
            content,
        }
    }

    pub fn id(&self) -> ChapterId {
        self.entry.id
    }

    pub fn title(&self) -> &str {
        &self.entry.title
    }

    pub fn level(&self) -> u8 {
        self.entry.level
    }

    pub fn path(&self) -> &str {
        &self.entry.path
    }

    pub fn page_id(&self) -> &PageId {
        &self.entry.page_id
    }
}

/// An immediate child of the current chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubchapterInfo {
    pub id: ChapterId,
    pub title: String,
    pub level: u8,
    /// Parent path extended with this chapter's title.
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_info_accessors() {
        let entry = FlatChapterEntry {
            id: ChapterId::new(),
            title: "Arrival".to_string(),
            level: 1,
            kind: NodeKind::Heading,
            page_id: PageId::new("P1"),
            page_name: "Harbor".to_string(),
            path: "Harbor > Arrival".to_string(),
        };
        let info = ChapterInfo::from_entry(
            entry.clone(),
            DocumentId::new("doc"),
            "Adventure".to_string(),
            Some("Fog hangs over the quay.".to_string()),
        );

        assert_eq!(info.id(), entry.id);
        assert_eq!(info.title(), "Arrival");
        assert_eq!(info.path(), "Harbor > Arrival");
        assert_eq!(info.level(), 1);
        assert_eq!(info.page_id(), &PageId::new("P1"));
    }
}
