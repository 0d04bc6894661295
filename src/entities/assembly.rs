//! Assembly nodes - points on the path from the root assembly

use serde::Serialize;

/// One assembly on the active resolution path
///
/// `multiplier` is the product of all quantities from the root down to this
/// assembly, seeded by the root's own multiplier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssemblyNode {
    pub name: String,
    pub multiplier: f64,
}

impl AssemblyNode {
    pub fn new(name: impl Into<String>, multiplier: f64) -> Self {
        Self {
            name: name.into(),
            multiplier,
        }
    }
}

/// One step of the pre-order traversal, kept for tree rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Visit {
    /// Distance from the root (root = 0)
    pub depth: usize,

    /// Assembly name as referenced by its parent
    pub name: String,

    /// Effective multiplier at this point
    pub multiplier: f64,

    /// False when the reference named no loaded assembly
    pub resolved: bool,
}

impl Visit {
    /// True for references that named no loaded assembly
    pub fn is_dangling(&self) -> bool {
        !self.resolved
    }
}

/// A sub-assembly reference that matched no loaded assembly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnresolvedReference {
    /// Assembly whose sheet holds the reference
    pub parent: String,

    /// Referenced name as written
    pub name: String,

    /// Effective quantity the reference would have contributed
    pub quantity: f64,
}
