//! Part entries and the parts total map

use serde::Serialize;
use std::collections::HashMap;

/// A `(name, quantity)` pair read from one section row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartEntry {
    /// Part name, possibly composite (`"Bolt_M6"`)
    pub name: String,

    /// Quantity already scaled by the multiplier passed to the extractor
    pub quantity: f64,
}

impl PartEntry {
    pub fn new(name: impl Into<String>, quantity: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// Accumulated quantity per part name
///
/// Names match exactly. Iteration follows first insertion so reports come
/// out in a stable order; totals do not depend on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartsTotal {
    totals: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl PartsTotal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` to the total for `name`, starting from zero
    pub fn add(&mut self, name: &str, quantity: f64) {
        match self.index.get(name) {
            Some(&i) => self.totals[i].1 += quantity,
            None => {
                self.index.insert(name.to_string(), self.totals.len());
                self.totals.push((name.to_string(), quantity));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.index.get(name).map(|&i| self.totals[i].1)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Iterate `(name, total)` in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.totals.iter().map(|(name, qty)| (name.as_str(), *qty))
    }
}
