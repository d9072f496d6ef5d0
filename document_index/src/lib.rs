//! # Document Index (The Bookshelf)
//!
//! The content side of the Lectern session tracker. This crate owns the
//! parsed representation of a narrative document: an arena-backed chapter
//! tree, its flat document-order linearization, and the lookup operations
//! the tracker core resolves positions against. It contains no resolution or
//! session logic.
//!
//! ## Core Components
//!
//! - **chapter**: identifiers and the externally visible chapter records
//! - **tree**: the arena chapter tree and pre-order flattening
//! - **index**: the `ContentIndex` lookup contract and an in-memory
//!   implementation
//!
//! ## Design Philosophy
//!
//! - **Index-owned content**: documents are registered whole and are never
//!   mutated through the lookup contract
//! - **Arena ownership**: nodes live in a flat arena with index-list child
//!   links, so traversal is iterative and deep documents cannot overflow
//!   the stack
//! - **Absence is not an error**: unknown documents and chapters produce
//!   empty or `None` results, never panics

pub mod chapter;
pub mod index;
pub mod tree;

pub use chapter::*;
pub use index::*;
pub use tree::*;
