//! Merged report - the two output tables of a resolution run

use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::core::resolver::Resolution;
use crate::entities::{RelationRecord, UnresolvedReference};

/// Header of the relations table
pub const RELATION_HEADERS: [&str; 6] = ["Parent", "ParentQty", "Child", "ChildQty", "Item", "ItemQty"];

/// Quantity of an item contributed through one containing assembly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssemblyShare {
    pub assembly: String,
    pub quantity: f64,
}

/// One row of the merged items table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedItem {
    pub name: String,
    pub total: f64,
    /// Per containing assembly, in first-appearance order
    pub breakdown: Vec<AssemblyShare>,
}

impl MergedItem {
    pub fn quantity_in(&self, assembly: &str) -> Option<f64> {
        self.breakdown
            .iter()
            .find(|s| s.assembly == assembly)
            .map(|s| s.quantity)
    }
}

/// Merged items plus the relation ledger
#[derive(Debug, Clone, Serialize)]
pub struct MergedReport {
    /// Every assembly that directly lists an item, in first-appearance order
    pub assemblies: Vec<String>,
    pub items: Vec<MergedItem>,
    pub relations: Vec<RelationRecord>,
    pub unresolved: Vec<UnresolvedReference>,
}

impl MergedReport {
    pub fn build(resolution: &Resolution) -> Self {
        let mut assemblies = Vec::new();
        let mut seen = HashSet::new();
        let mut breakdowns: HashMap<&str, Vec<AssemblyShare>> = HashMap::new();

        for rec in &resolution.relations {
            if seen.insert(rec.child.as_str()) {
                assemblies.push(rec.child.clone());
            }

            let shares = breakdowns.entry(rec.item.as_str()).or_default();
            match shares.iter_mut().find(|s| s.assembly == rec.child) {
                Some(share) => share.quantity += rec.item_qty,
                None => shares.push(AssemblyShare {
                    assembly: rec.child.clone(),
                    quantity: rec.item_qty,
                }),
            }
        }

        let items = resolution
            .parts
            .iter()
            .map(|(name, total)| MergedItem {
                name: name.to_string(),
                total,
                breakdown: breakdowns.remove(name).unwrap_or_default(),
            })
            .collect();

        Self {
            assemblies,
            items,
            relations: resolution.relations.clone(),
            unresolved: resolution.unresolved.clone(),
        }
    }

    /// Header of the merged items table: item, total, one column per assembly
    pub fn item_headers(&self) -> Vec<String> {
        let mut headers = vec!["Item".to_string(), "Total".to_string()];
        headers.extend(self.assemblies.iter().cloned());
        headers
    }
}
