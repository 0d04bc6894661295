//! Assembly registry - named spreadsheets available to one resolution run

use std::cell::OnceCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::core::grid::{read_first_sheet, SheetError, SheetGrid};
use crate::core::resolver::MergeError;

/// One assembly spreadsheet
///
/// File-backed resources are read on first use and cached; the grid never
/// changes afterwards.
#[derive(Debug)]
pub enum AssemblyResource {
    File {
        path: PathBuf,
        grid: OnceCell<SheetGrid>,
    },
    Grid(SheetGrid),
}

impl AssemblyResource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        AssemblyResource::File {
            path: path.into(),
            grid: OnceCell::new(),
        }
    }

    pub fn from_grid(grid: SheetGrid) -> Self {
        AssemblyResource::Grid(grid)
    }

    /// The first sheet of the resource
    pub fn grid(&self) -> Result<&SheetGrid, SheetError> {
        match self {
            AssemblyResource::Grid(grid) => Ok(grid),
            AssemblyResource::File { path, grid } => {
                if let Some(cached) = grid.get() {
                    return Ok(cached);
                }
                let loaded = read_first_sheet(path)?;
                Ok(grid.get_or_init(|| loaded))
            }
        }
    }

    /// Where the resource came from, for messages
    pub fn describe(&self) -> String {
        match self {
            AssemblyResource::File { path, .. } => path.display().to_string(),
            AssemblyResource::Grid(_) => "<in-memory sheet>".to_string(),
        }
    }
}

/// Registry lookup key: trimmed and lower-cased
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Assembly name derived from a file path (its stem)
pub fn name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().trim().to_string())
        .unwrap_or_default()
}

#[derive(Debug)]
struct RegistryEntry {
    name: String,
    resource: AssemblyResource,
}

/// Assemblies of one run, looked up case-insensitively by trimmed name
#[derive(Debug, Default)]
pub struct AssemblyRegistry {
    entries: HashMap<String, RegistryEntry>,
    order: Vec<String>,
}

impl AssemblyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `(name, resource)` pairs
    pub fn from_entries<I, S>(entries: I) -> Result<Self, MergeError>
    where
        I: IntoIterator<Item = (S, AssemblyResource)>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for (name, resource) in entries {
            registry.insert(name, resource)?;
        }
        Ok(registry)
    }

    /// Register an assembly. Names colliding after normalization are rejected.
    pub fn insert(&mut self, name: impl Into<String>, resource: AssemblyResource) -> Result<(), MergeError> {
        let name = name.into().trim().to_string();
        let key = normalize_name(&name);

        if self.entries.contains_key(&key) {
            return Err(MergeError::DuplicateAssembly { name });
        }

        self.order.push(key.clone());
        self.entries.insert(key, RegistryEntry { name, resource });
        Ok(())
    }

    /// Look up an assembly, returning its registered name and resource
    pub fn get(&self, name: &str) -> Option<(&str, &AssemblyResource)> {
        self.entries
            .get(&normalize_name(name))
            .map(|e| (e.name.as_str(), &e.resource))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&normalize_name(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key))
            .map(|e| e.name.as_str())
    }

    /// Registered names with their resources, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssemblyResource)> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key))
            .map(|e| (e.name.as_str(), &e.resource))
    }
}
