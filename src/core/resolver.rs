//! Assembly resolution
//!
//! Walks the assembly tree depth-first from a root assembly. Each sheet's
//! sub-assembly section names further assemblies and how many of each are
//! used; quantities multiply along the path. Items in the standard and
//! miscellaneous sections are added to the parts total scaled by the
//! effective multiplier, and every occurrence is recorded as a relation.

use miette::Diagnostic;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::grid::{SheetError, SheetGrid};
use crate::core::registry::{normalize_name, AssemblyRegistry, AssemblyResource};
use crate::core::section::{extract, SectionKind, SectionLabels};
use crate::entities::{AssemblyNode, PartsTotal, RelationRecord, UnresolvedReference, Visit};

/// Default limit on assembly nesting
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Errors that abort a resolution run
#[derive(Debug, Error, Diagnostic)]
pub enum MergeError {
    #[error("failed to read assembly '{name}' ({location})")]
    #[diagnostic(
        code(bommerge::sheet),
        help("check that the file is a readable csv, tsv, xlsx, xls or ods spreadsheet")
    )]
    Sheet {
        name: String,
        location: String,
        #[source]
        source: SheetError,
    },

    #[error("cyclic assembly reference: {chain}")]
    #[diagnostic(
        code(bommerge::cycle),
        help("an assembly cannot contain itself, directly or through its sub-assemblies")
    )]
    CyclicReference { chain: String },

    #[error("assembly nesting deeper than {max_depth} levels at '{name}'")]
    #[diagnostic(
        code(bommerge::depth),
        help("raise max_depth in the configuration if the structure really is this deep")
    )]
    DepthExceeded { name: String, max_depth: usize },

    #[error("assembly '{0}' is not among the loaded files")]
    #[diagnostic(code(bommerge::unknown_assembly))]
    UnknownAssembly(String),

    #[error("assembly name '{name}' is used by more than one file")]
    #[diagnostic(
        code(bommerge::duplicate_assembly),
        help("rename one of the files or pass it as NAME=PATH")
    )]
    DuplicateAssembly { name: String },
}

/// Everything one resolution run produces
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Total quantity per part over the whole tree
    pub parts: PartsTotal,

    /// One record per item occurrence, in traversal order
    pub relations: Vec<RelationRecord>,

    /// Sub-assembly references that matched no loaded assembly
    pub unresolved: Vec<UnresolvedReference>,

    /// Pre-order traversal, dangling references included
    pub visits: Vec<Visit>,
}

impl Resolution {
    /// Registered assemblies the traversal never reached, in registry order
    pub fn unreached<'r>(&self, registry: &'r AssemblyRegistry) -> Vec<&'r str> {
        let reached: HashSet<String> = self
            .visits
            .iter()
            .filter(|v| v.resolved)
            .map(|v| normalize_name(&v.name))
            .collect();

        registry
            .names()
            .filter(|name| !reached.contains(&normalize_name(name)))
            .collect()
    }
}

/// Resolves assembly trees against one registry
pub struct Resolver<'a> {
    registry: &'a AssemblyRegistry,
    labels: &'a SectionLabels,
    max_depth: usize,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a AssemblyRegistry, labels: &'a SectionLabels) -> Self {
        Self {
            registry,
            labels,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Resolve the tree rooted at `root`, seeding the path with `multiplier`
    pub fn resolve(&self, root: &str, multiplier: f64) -> Result<Resolution, MergeError> {
        self.resolve_with_parents(root, multiplier, &[])
    }

    /// Resolve with assemblies above the root already on the path
    ///
    /// `parents` are outermost first. The last one becomes the parent of the
    /// root's own items, and all of them take part in cycle detection and
    /// the depth limit.
    pub fn resolve_with_parents(
        &self,
        root: &str,
        multiplier: f64,
        parents: &[AssemblyNode],
    ) -> Result<Resolution, MergeError> {
        let root = root.trim();
        let (root, resource) = self
            .registry
            .get(root)
            .ok_or_else(|| MergeError::UnknownAssembly(root.to_string()))?;

        let mut path = parents.to_vec();
        let mut resolution = Resolution::default();
        self.visit(root, resource, multiplier, 0, &mut path, &mut resolution)?;

        info!(
            root,
            parts = resolution.parts.len(),
            relations = resolution.relations.len(),
            unresolved = resolution.unresolved.len(),
            "assembly tree resolved"
        );
        Ok(resolution)
    }

    fn visit(
        &self,
        name: &str,
        resource: &AssemblyResource,
        multiplier: f64,
        depth: usize,
        path: &mut Vec<AssemblyNode>,
        out: &mut Resolution,
    ) -> Result<(), MergeError> {
        let key = normalize_name(name);
        if path.iter().any(|node| normalize_name(&node.name) == key) {
            let mut chain: Vec<&str> = path.iter().map(|node| node.name.as_str()).collect();
            chain.push(name);
            return Err(MergeError::CyclicReference {
                chain: chain.join(" -> "),
            });
        }
        if path.len() >= self.max_depth {
            return Err(MergeError::DepthExceeded {
                name: name.to_string(),
                max_depth: self.max_depth,
            });
        }

        let grid = resource.grid().map_err(|source| MergeError::Sheet {
            name: name.to_string(),
            location: resource.describe(),
            source,
        })?;

        out.visits.push(Visit {
            depth,
            name: name.to_string(),
            multiplier,
            resolved: true,
        });
        path.push(AssemblyNode::new(name, multiplier));

        // Raw counts: the multiplier is applied once, when descending
        let subassemblies = extract(
            grid,
            SectionKind::Subassemblies,
            self.labels.label(SectionKind::Subassemblies),
            1.0,
        );
        for sub in subassemblies {
            let sub_multiplier = multiplier * sub.quantity;
            match self.registry.get(&sub.name) {
                Some((registered, sub_resource)) => {
                    self.visit(registered, sub_resource, sub_multiplier, depth + 1, path, out)?;
                }
                None => {
                    warn!(
                        parent = name,
                        reference = sub.name.as_str(),
                        "sub-assembly not among the loaded files, skipping"
                    );
                    out.visits.push(Visit {
                        depth: depth + 1,
                        name: sub.name.clone(),
                        multiplier: sub_multiplier,
                        resolved: false,
                    });
                    out.unresolved.push(UnresolvedReference {
                        parent: name.to_string(),
                        name: sub.name,
                        quantity: sub_multiplier,
                    });
                }
            }
        }

        let current = &path[path.len() - 1];
        let parent = path.len().checked_sub(2).map(|i| &path[i]);
        self.collect_items(grid, parent, current, out);

        path.pop();
        Ok(())
    }

    /// Treat every registered assembly as a root of its own, without
    /// descending into sub-assemblies
    ///
    /// Each sheet contributes its items once, scaled by `multiplier`.
    pub fn resolve_flat(&self, multiplier: f64) -> Result<Resolution, MergeError> {
        let mut resolution = Resolution::default();

        for (name, resource) in self.registry.iter() {
            let grid = resource.grid().map_err(|source| MergeError::Sheet {
                name: name.to_string(),
                location: resource.describe(),
                source,
            })?;
            resolution.visits.push(Visit {
                depth: 0,
                name: name.to_string(),
                multiplier,
                resolved: true,
            });
            self.collect_items(grid, None, &AssemblyNode::new(name, multiplier), &mut resolution);
        }

        info!(
            assemblies = self.registry.len(),
            parts = resolution.parts.len(),
            "flat merge done"
        );
        Ok(resolution)
    }

    /// Add the item sections of `grid` to the totals and the ledger
    fn collect_items(
        &self,
        grid: &SheetGrid,
        parent: Option<&AssemblyNode>,
        current: &AssemblyNode,
        out: &mut Resolution,
    ) {
        for kind in SectionKind::ITEM_SECTIONS {
            for item in extract(grid, kind, self.labels.label(kind), current.multiplier) {
                out.parts.add(&item.name, item.quantity);
                out.relations.push(RelationRecord::new(parent, current, item));
            }
        }
    }
}
