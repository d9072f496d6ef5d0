//! The chapter tree - the central content structure for one document.
//!
//! Nodes live in a flat arena and carry their children as index lists, so
//! the arena owns every node exclusively and all traversal is iterative
//! with an explicit stack. Pages sit at the roots; headings and sections
//! nest beneath them with strictly increasing levels.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chapter::{ChapterId, ChapterNode, FlatChapterEntry, PAGE_LEVEL, SECTION_LEVEL};

/// Index of a node inside the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Errors raised while building a chapter tree.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("child level {child} must be greater than parent level {parent}")]
    LevelInversion { parent: u8, child: u8 },

    #[error("level {0} exceeds the maximum section depth")]
    LevelOutOfRange(u8),

    #[error("page roots must sit at level 0, got {0}")]
    MisplacedPage(u8),

    #[error("unknown parent node")]
    UnknownParent,
}

/// Arena-backed chapter tree.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChapterTree {
    nodes: Vec<ChapterNode>,
    /// Page roots in document order.
    roots: Vec<NodeId>,
}

impl ChapterTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page root. Returns its arena index.
    pub fn add_page(&mut self, node: ChapterNode) -> Result<NodeId, TreeError> {
        if node.level != PAGE_LEVEL {
            return Err(TreeError::MisplacedPage(node.level));
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.roots.push(id);
        Ok(id)
    }

    /// Add a child under `parent`, enforcing the level invariant: a child's
    /// level is always numerically greater than its parent's.
    pub fn add_child(&mut self, parent: NodeId, node: ChapterNode) -> Result<NodeId, TreeError> {
        let parent_level = self
            .nodes
            .get(parent.0)
            .ok_or(TreeError::UnknownParent)?
            .level;
        if node.level > SECTION_LEVEL {
            return Err(TreeError::LevelOutOfRange(node.level));
        }
        if node.level <= parent_level {
            return Err(TreeError::LevelInversion {
                parent: parent_level,
                child: node.level,
            });
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Get a node by arena index.
    pub fn get(&self, id: NodeId) -> Option<&ChapterNode> {
        self.nodes.get(id.0)
    }

    /// Direct children of a node, in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Page roots in document order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Iterate over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &ChapterNode> {
        self.nodes.iter()
    }

    /// Locate a chapter by its identifier.
    ///
    /// Iterative pre-order depth-first search from the page roots.
    pub fn find(&self, chapter: &ChapterId) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if node.id == *chapter {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Flatten the tree into document-order entries.
    ///
    /// Pre-order traversal, so the entry sequence matches reading order;
    /// each entry carries its hierarchical path built from ancestor titles.
    pub fn flatten(&self) -> Vec<FlatChapterEntry> {
        let mut entries = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, String)> = self
            .roots
            .iter()
            .rev()
            .map(|&id| (id, self.nodes[id.0].title.clone()))
            .collect();

        while let Some((id, path)) = stack.pop() {
            let node = &self.nodes[id.0];
            entries.push(FlatChapterEntry {
                id: node.id,
                title: node.title.clone(),
                level: node.level,
                kind: node.kind,
                page_id: node.page_id.clone(),
                page_name: node.page_name.clone(),
                path: path.clone(),
            });
            for &child in node.children.iter().rev() {
                stack.push((child, format!("{} > {}", path, self.nodes[child.0].title)));
            }
        }

        entries
    }

    /// Total number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
