//! Relation Reconciler
//!
//! The related-POI association is symmetric: if A lists B under its
//! forward view, B must surface A under its reverse view. All edits go
//! through one reconciliation function that turns (current, desired) id
//! sets into a minimal connect/disconnect delta, so the invariant lives
//! in exactly one place and is testable without a database.

use std::collections::BTreeSet;

use shared::models::Category;

/// Minimal set of edges to add and remove for one edit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelationDelta {
    /// Ids to link (sorted, deduplicated, never contains the POI itself)
    pub to_connect: Vec<String>,
    /// Ids to unlink (sorted, deduplicated)
    pub to_disconnect: Vec<String>,
}

impl RelationDelta {
    pub fn is_empty(&self) -> bool {
        self.to_connect.is_empty() && self.to_disconnect.is_empty()
    }
}

/// Normalize a requested related-id set before reconciliation:
/// deduplicate, drop self-references, and clear everything when the
/// category cannot hold relations (only attractions can).
pub fn sanitize_desired(poi_id: &str, category: Category, requested: &[String]) -> Vec<String> {
    if !category.supports_relations() {
        return Vec::new();
    }
    requested
        .iter()
        .filter(|other| other.as_str() != poi_id)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Compute the delta between the current forward view and the desired set:
/// `to_disconnect = current - desired`, `to_connect = desired - current`,
/// with self-references dropped from the connect side. Applying the same
/// desired set twice yields an empty delta the second time.
pub fn reconcile(poi_id: &str, current: &[String], desired: &[String]) -> RelationDelta {
    let current: BTreeSet<&str> = current.iter().map(String::as_str).collect();
    let desired: BTreeSet<&str> = desired
        .iter()
        .map(String::as_str)
        .filter(|other| *other != poi_id)
        .collect();

    RelationDelta {
        to_connect: desired
            .difference(&current)
            .map(|s| s.to_string())
            .collect(),
        to_disconnect: current
            .difference(&desired)
            .map(|s| s.to_string())
            .collect(),
    }
}
