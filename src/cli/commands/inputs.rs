//! Input spreadsheets shared by the merge and tree commands

use miette::{IntoDiagnostic, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::helpers::{parse_qty_arg, split_file_arg};
use crate::core::grid::is_spreadsheet;
use crate::core::registry::{name_from_path, AssemblyRegistry, AssemblyResource};

#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Assembly spreadsheets as PATH or NAME=PATH (named after the file stem
    /// by default; the first one is the root unless --root is given)
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// Also load every spreadsheet under this directory
    #[arg(long, short = 'd')]
    pub dir: Option<PathBuf>,

    /// Name of the root assembly
    #[arg(long, short = 'r')]
    pub root: Option<String>,

    /// Number of root assemblies to build
    #[arg(long, default_value = "1", value_parser = parse_qty_arg)]
    pub qty: f64,
}

/// Registry and root name built from the command line
#[derive(Debug)]
pub struct LoadedInputs {
    pub registry: AssemblyRegistry,
    pub root: String,
}

impl InputArgs {
    pub fn load(&self) -> Result<LoadedInputs> {
        let mut registry = AssemblyRegistry::new();
        let mut explicit_paths = HashSet::new();
        let mut first = None;

        for arg in &self.files {
            let (name, path) = split_file_arg(arg);
            let name = name.unwrap_or_else(|| name_from_path(&path));
            if let Ok(canonical) = path.canonicalize() {
                explicit_paths.insert(canonical);
            }
            debug!(name = name.as_str(), path = %path.display(), "registering assembly");
            first.get_or_insert_with(|| name.clone());
            registry.insert(name, AssemblyResource::from_path(path))?;
        }

        if let Some(dir) = &self.dir {
            for path in scan_dir(dir)? {
                let already_listed = path
                    .canonicalize()
                    .map_or(false, |c| explicit_paths.contains(&c));
                if already_listed {
                    continue;
                }
                let name = name_from_path(&path);
                debug!(name = name.as_str(), path = %path.display(), "registering assembly");
                first.get_or_insert_with(|| name.clone());
                registry.insert(name, AssemblyResource::from_path(path))?;
            }
        }

        let root = match (&self.root, first) {
            (Some(root), _) => root.trim().to_string(),
            (None, Some(first)) => first,
            (None, None) => {
                return Err(miette::miette!(
                    help = "pass spreadsheet files or --dir <DIR>",
                    "no assembly spreadsheets given"
                ))
            }
        };

        Ok(LoadedInputs { registry, root })
    }
}

/// Spreadsheets under `dir`, sorted by path. Office lock files (`~$...`) are
/// skipped.
fn scan_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(miette::miette!("not a directory: {}", dir.display()));
    }

    let mut paths = Vec::new();
    for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.into_diagnostic()?;
        let lock_file = entry.file_name().to_string_lossy().starts_with("~$");
        if entry.file_type().is_file() && !lock_file && is_spreadsheet(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}
