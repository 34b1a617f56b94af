//! Authorization gate in front of search execution.
//!
//! # Responsibility
//! - Strip filter conditions and sort keys the caller's role may not use.
//! - Apply derived-attribute formatters to condition values.
//! - Supply the default ordering when no permitted sort key remains.
//!
//! # Invariants
//! - Unpermitted attributes are dropped, never reported as errors.
//! - Permitted conditions and sorts keep their request order.

use crate::policy::role::Role;
use crate::policy::schema::EntitySchema;
use crate::repo::entity_repo::ListOrder;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One requested ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub attribute: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl From<ListOrder> for SortKey {
    fn from(order: ListOrder) -> Self {
        match order {
            ListOrder::IdDesc => Self::desc("id"),
            ListOrder::IdAsc => Self::asc("id"),
        }
    }
}

/// One requested filter predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub attribute: String,
    pub value: String,
}

impl Condition {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// Search request as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub sorts: Vec<SortKey>,
}

/// Request after the gate: only what the role may use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatedSearch {
    pub conditions: Vec<Condition>,
    pub sorts: Vec<SortKey>,
    /// Attributes of dropped conditions, in request order.
    pub rejected_conditions: Vec<String>,
    /// Attributes of dropped sort keys, in request order.
    pub rejected_sorts: Vec<String>,
    /// True when `sorts` holds only the default order.
    pub default_order_applied: bool,
}

/// Applies one entity's attribute policy to search requests.
#[derive(Debug, Clone)]
pub struct SearchGate {
    schema: EntitySchema,
    default_order: ListOrder,
}

impl SearchGate {
    pub fn new(schema: EntitySchema) -> Self {
        Self {
            schema,
            default_order: ListOrder::default(),
        }
    }

    /// Overrides the ordering used when no permitted sort key survives.
    pub fn with_default_order(mut self, order: ListOrder) -> Self {
        self.default_order = order;
        self
    }

    pub fn schema(&self) -> &EntitySchema {
        &self.schema
    }

    pub fn apply(&self, request: &SearchRequest, role: Role) -> GatedSearch {
        let mut gated = GatedSearch::default();

        for condition in &request.conditions {
            if !self.schema.permits_search(&condition.attribute, role) {
                gated.rejected_conditions.push(condition.attribute.clone());
                continue;
            }
            let value = match self.schema.derived(&condition.attribute) {
                Some(derived) => derived.format_value(&condition.value),
                None => condition.value.clone(),
            };
            gated
                .conditions
                .push(Condition::new(condition.attribute.clone(), value));
        }

        for sort in &request.sorts {
            if self.schema.permits_sort(&sort.attribute, role) {
                gated.sorts.push(sort.clone());
            } else {
                gated.rejected_sorts.push(sort.attribute.clone());
            }
        }

        if gated.sorts.is_empty() {
            gated.sorts.push(SortKey::from(self.default_order));
            gated.default_order_applied = true;
        }

        if !gated.rejected_conditions.is_empty() || !gated.rejected_sorts.is_empty() {
            debug!(
                "event=search_gate module=service status=filtered entity={} role={} rejected_conditions={} rejected_sorts={}",
                self.schema.kind(),
                role,
                gated.rejected_conditions.len(),
                gated.rejected_sorts.len()
            );
        }

        gated
    }
}
