//! Chapter identifiers and record types shared across the index.

mod entry;
mod node;

pub use entry::*;
pub use node::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Depth of page roots in the chapter hierarchy.
pub const PAGE_LEVEL: u8 = 0;

/// Maximum depth in the hierarchy: leaf sections.
pub const SECTION_LEVEL: u8 = 7;

/// Unique identifier for a chapter within a document.
///
/// Minted by the index when a document is registered; stable for the
/// lifetime of that registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterId(pub Uuid);

impl ChapterId {
    /// Create a new random chapter ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a chapter ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil/empty chapter ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for ChapterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a document, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    /// Create a document ID from a host-supplied string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a page within a document, as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub String);

impl PageId {
    /// Create a page ID from a host-supplied string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of nodes in the chapter tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Whole-page root at level 0.
    Page,
    /// Heading at levels 1-6.
    Heading,
    /// Leaf section at level 7.
    Section,
}

impl NodeKind {
    /// The kind implied by a hierarchy level.
    pub fn for_level(level: u8) -> Self {
        match level {
            PAGE_LEVEL => NodeKind::Page,
            SECTION_LEVEL.. => NodeKind::Section,
            _ => NodeKind::Heading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapter_id_uniqueness() {
        let a = ChapterId::new();
        let b = ChapterId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_nil_chapter_id() {
        assert_eq!(ChapterId::nil(), ChapterId::nil());
    }

    #[test]
    fn test_kind_for_level() {
        assert_eq!(NodeKind::for_level(0), NodeKind::Page);
        assert_eq!(NodeKind::for_level(1), NodeKind::Heading);
        assert_eq!(NodeKind::for_level(6), NodeKind::Heading);
        assert_eq!(NodeKind::for_level(7), NodeKind::Section);
    }

    #[test]
    fn test_host_ids_display() {
        assert_eq!(DocumentId::new("doc-1").to_string(), "doc-1");
        assert_eq!(PageId::new("P1").to_string(), "P1");
    }
}
