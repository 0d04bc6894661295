//! Relation records - where each item occurrence came from

use serde::Serialize;

use super::{AssemblyNode, PartEntry};

/// Provenance of one item occurrence
///
/// `child` is the assembly whose sheet lists the item, `parent` the assembly
/// containing that one (absent at the root).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationRecord {
    pub parent: Option<String>,
    pub parent_qty: Option<f64>,
    pub child: String,
    pub child_qty: f64,
    pub item: String,
    pub item_qty: f64,
}

impl RelationRecord {
    pub fn new(parent: Option<&AssemblyNode>, child: &AssemblyNode, item: PartEntry) -> Self {
        Self {
            parent: parent.map(|p| p.name.clone()),
            parent_qty: parent.map(|p| p.multiplier),
            child: child.name.clone(),
            child_qty: child.multiplier,
            item: item.name,
            item_qty: item.quantity,
        }
    }
}
