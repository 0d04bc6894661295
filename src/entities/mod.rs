//! Value types produced while resolving an assembly tree
//!
//! - [`PartEntry`] - one `(name, quantity)` row read from a section
//! - [`PartsTotal`] - per-part quantities summed over the whole tree
//! - [`RelationRecord`] - provenance of one item occurrence
//! - [`AssemblyNode`] - one step of the active resolution path

pub mod assembly;
pub mod part;
pub mod relation;

pub use assembly::{AssemblyNode, UnresolvedReference, Visit};
pub use part::{PartEntry, PartsTotal};
pub use relation::RelationRecord;
