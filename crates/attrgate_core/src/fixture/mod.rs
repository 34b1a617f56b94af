//! Deterministic fixture graph generation.
//!
//! # Responsibility
//! - Populate an entity store with the canonical people/articles/comments
//!   graph, polymorphic notes included.
//!
//! # Invariants
//! - Every referenced entity is created before anything points at it.
//! - The first failed create ends the build; nothing is created after it.

pub mod builder;
