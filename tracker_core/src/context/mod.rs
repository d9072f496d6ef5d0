//! Context rendering for downstream consumers.

use document_index::{ChapterInfo, SubchapterInfo};

/// Marker appended when chapter content is cut at the length bound.
pub const TRUNCATION_MARKER: &str = "...";

/// Render the current position as a bounded text block.
///
/// Emits, in fixed order: the chapter title, its hierarchical path, the
/// chapter content truncated to `max_content_length` characters (with a
/// marker when cut), and the subchapter list. Returns the empty string when
/// no chapter is current. Pure function of its inputs.
pub fn format_downstream(
    current: Option<&ChapterInfo>,
    subchapters: &[SubchapterInfo],
    max_content_length: usize,
) -> String {
    let Some(chapter) = current else {
        return String::new();
    };

    let mut block = String::new();
    block.push_str(&format!("## Current Chapter: {}\n", chapter.title()));
    block.push_str(&format!("Path: {}\n", chapter.path()));

    if let Some(content) = chapter.content.as_deref() {
        block.push('\n');
        if content.chars().count() > max_content_length {
            block.extend(content.chars().take(max_content_length));
            block.push_str(TRUNCATION_MARKER);
        } else {
            block.push_str(content);
        }
        block.push('\n');
    }

    if !subchapters.is_empty() {
        block.push_str("\n### Subchapters\n");
        for subchapter in subchapters {
            block.push_str(&format!("- {}\n", subchapter.title));
        }
    }

    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use document_index::{ChapterId, DocumentId, FlatChapterEntry, NodeKind, PageId};

    fn chapter(content: Option<&str>) -> ChapterInfo {
        let entry = FlatChapterEntry {
            id: ChapterId::new(),
            title: "The Docks".to_string(),
            level: 2,
            kind: NodeKind::Heading,
            page_id: PageId::new("P1"),
            page_name: "Harbor".to_string(),
            path: "Harbor > Arrival > The Docks".to_string(),
        };
        ChapterInfo::from_entry(
            entry,
            DocumentId::new("doc"),
            "Adventure".to_string(),
            content.map(str::to_owned),
        )
    }

    fn subchapter(title: &str) -> SubchapterInfo {
        SubchapterInfo {
            id: ChapterId::new(),
            title: title.to_string(),
            level: 3,
            path: format!("Harbor > Arrival > The Docks > {}", title),
        }
    }

    #[test]
    fn test_no_current_chapter_is_empty() {
        assert_eq!(format_downstream(None, &[], 100), "");
    }

    #[test]
    fn test_block_layout() {
        let chapter = chapter(Some("Crates everywhere."));
        let subchapters = vec![subchapter("Pier One"), subchapter("Pier Two")];
        let block = format_downstream(Some(&chapter), &subchapters, 100);

        assert_eq!(
            block,
            "## Current Chapter: The Docks\n\
             Path: Harbor > Arrival > The Docks\n\
             \n\
             Crates everywhere.\n\
             \n\
             ### Subchapters\n\
             - Pier One\n\
             - Pier Two\n"
        );
    }

    #[test]
    fn test_content_truncation() {
        let cut = chapter(Some("A long stretch of waterfront."));
        let block = format_downstream(Some(&cut), &[], 6);
        assert!(block.contains("A long..."));
        assert!(!block.contains("stretch"));

        // Content at exactly the bound is left unmarked.
        let exact = chapter(Some("Crates"));
        let block = format_downstream(Some(&exact), &[], 6);
        assert!(block.contains("\nCrates\n"));
        assert!(!block.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn test_no_content_skips_body() {
        let chapter = chapter(None);
        let block = format_downstream(Some(&chapter), &[], 100);
        assert_eq!(
            block,
            "## Current Chapter: The Docks\nPath: Harbor > Arrival > The Docks\n"
        );
    }
}
