//! Role-scoped attribute authorization for search and sort.
//!
//! # Responsibility
//! - Decide which attribute names a caller may filter on and sort by.
//! - Declare per-entity attribute sets, including derived attributes.
//!
//! # Invariants
//! - Exclusion is purely name-based; attribute type never matters.
//! - Policy evaluation is pure and never fails. Unknown roles get the
//!   least-privileged rules.

pub mod attribute_policy;
pub mod role;
pub mod schema;
