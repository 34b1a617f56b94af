//! Search/sort attribute whitelisting.
//!
//! The rule table below is the only place that decides exclusions:
//!
//! | operation | role    | excluded                      |
//! |-----------|---------|-------------------------------|
//! | search    | admin   | `only_sort`                   |
//! | search    | default | `only_sort`, `only_admin`     |
//! | sort      | admin   | `only_search`                 |
//! | sort      | default | `only_search`, `only_admin`   |

use super::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Attribute that may be searched but never sorted.
pub const ONLY_SEARCH: &str = "only_search";
/// Attribute that may be sorted but never searched.
pub const ONLY_SORT: &str = "only_sort";
/// Attribute hidden from every role except admin.
pub const ONLY_ADMIN: &str = "only_admin";

/// Set of attribute names, ordered for stable output.
pub type AttributeSet = BTreeSet<String>;

/// What the caller wants to do with an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeOperation {
    /// Use as a filter predicate.
    Search,
    /// Use as an ordering key.
    Sort,
}

/// Attribute names removed from the full set for `operation` under `role`.
pub fn excluded_attributes(operation: AttributeOperation, role: Role) -> &'static [&'static str] {
    match (operation, role) {
        (AttributeOperation::Search, Role::Admin) => &[ONLY_SORT],
        (AttributeOperation::Search, Role::Default) => &[ONLY_SORT, ONLY_ADMIN],
        (AttributeOperation::Sort, Role::Admin) => &[ONLY_SEARCH],
        (AttributeOperation::Sort, Role::Default) => &[ONLY_SEARCH, ONLY_ADMIN],
    }
}

/// Whether a single attribute name survives the exclusion rules.
///
/// Membership in the entity's attribute set is not checked here.
pub fn is_permitted(attribute: &str, operation: AttributeOperation, role: Role) -> bool {
    !excluded_attributes(operation, role).contains(&attribute)
}

/// Subset of `all` usable for `operation` under `role`.
pub fn permitted_attributes<I, S>(all: I, operation: AttributeOperation, role: Role) -> AttributeSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    all.into_iter()
        .filter(|name| is_permitted(name.as_ref(), operation, role))
        .map(|name| name.as_ref().to_string())
        .collect()
}

/// Attributes usable as filter predicates.
pub fn searchable(all: &AttributeSet, role: Role) -> AttributeSet {
    permitted_attributes(all, AttributeOperation::Search, role)
}

/// Attributes usable as ordering keys.
pub fn sortable(all: &AttributeSet, role: Role) -> AttributeSet {
    permitted_attributes(all, AttributeOperation::Sort, role)
}
