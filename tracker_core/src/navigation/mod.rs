//! Sibling traversal over the flat document order.
//!
//! Works on the flat list alone: the pre-order invariant means every entry
//! of a chapter's subtree sits between it and the next entry of lower
//! level, so a linear scan can stop the moment it leaves the current
//! chapter's scope. No parent pointers, constant extra memory.

use serde::{Deserialize, Serialize};

use document_index::{ChapterId, FlatChapterEntry};

/// Nearest chapters at the same depth as the current one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SiblingChapters {
    pub previous: Option<FlatChapterEntry>,
    pub next: Option<FlatChapterEntry>,
}

/// Find the nearest previous/next entries at the current entry's level.
///
/// Each direction stops at the first entry of strictly lower level: that
/// entry is an ancestor-scope boundary, so no sibling exists in that
/// direction. Entries of higher level (the subtrees in between) are
/// skipped over.
pub fn sibling_chapters(flat: &[FlatChapterEntry], current: &ChapterId) -> SiblingChapters {
    let Some(position) = flat.iter().position(|e| e.id == *current) else {
        return SiblingChapters::default();
    };
    let level = flat[position].level;

    let previous = flat[..position]
        .iter()
        .rev()
        .take_while(|e| e.level >= level)
        .find(|e| e.level == level)
        .cloned();
    let next = flat[position + 1..]
        .iter()
        .take_while(|e| e.level >= level)
        .find(|e| e.level == level)
        .cloned();

    SiblingChapters { previous, next }
}
