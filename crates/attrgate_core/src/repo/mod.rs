//! Persistence contracts for the entity graph and their SQLite implementation.
//!
//! # Responsibility
//! - Define the create-and-return-id contract the fixture builder depends on.
//! - Define read access for associations in both directions and polymorphic
//!   owner resolution.
//!
//! # Invariants
//! - A create referencing a missing or mistyped entity fails with
//!   `RepoError::ConstraintViolation` and writes nothing.
//! - List ordering is always an explicit `ListOrder`; the default is reverse
//!   insertion (`id DESC`).

pub mod entity_repo;
pub mod sqlite_store;
