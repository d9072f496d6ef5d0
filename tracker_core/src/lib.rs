//! # Tracker Core (Lectern)
//!
//! The "brain" of the Lectern session assistant. This crate interfaces with
//! `document_index`, resolves ambiguous stage signals into unique document
//! positions, and tracks the operator's place in the narrative as a session
//! unfolds.
//!
//! ## Core Components
//!
//! - **resolver**: strategy-chain position resolution with a per-document
//!   cache
//! - **session**: current-position state, provenance, and bounded history
//! - **navigation**: sibling traversal over the flat document order
//! - **context**: bounded text rendering of the current position
//!
//! ## Design Philosophy
//!
//! - **Signal-driven**: the tracker reacts to host notifications; it never
//!   polls and performs no I/O
//! - **Deterministic**: resolution is a fixed priority chain where the first
//!   strategy to succeed wins
//! - **Explicit state**: the selected document is instance state threaded
//!   through every resolver and cache operation, so independent trackers can
//!   coexist

pub mod context;
pub mod navigation;
pub mod resolver;
pub mod session;

pub use context::*;
pub use navigation::*;
pub use resolver::*;
pub use session::*;
