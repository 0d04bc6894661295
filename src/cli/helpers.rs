//! Shared helper functions for CLI commands

use std::path::{Path, PathBuf};

use crate::core::section::parse_decimal;
use crate::entities::AssemblyNode;

/// Format a quantity in its shortest form
///
/// Rounded to 9 decimals first so accumulated float noise
/// (`0.30000000000000004`) prints as `0.3`.
pub fn format_qty(qty: f64) -> String {
    let rounded = (qty * 1e9).round() / 1e9;
    // Avoid printing "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{}", rounded)
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Split a file argument into an optional assembly name and a path
///
/// `NAME=PATH` names the assembly explicitly; a plain path (or anything that
/// exists on disk as written) is named after its file stem later.
pub fn split_file_arg(arg: &str) -> (Option<String>, PathBuf) {
    if !Path::new(arg).exists() {
        if let Some((name, path)) = arg.split_once('=') {
            if !name.trim().is_empty() && !path.trim().is_empty() {
                return (Some(name.trim().to_string()), PathBuf::from(path.trim()));
            }
        }
    }
    (None, PathBuf::from(arg))
}

/// Parse a quantity given on the command line (`2`, `2.5`, `2,5`)
pub fn parse_qty_arg(s: &str) -> Result<f64, String> {
    match parse_decimal(s) {
        Some(q) if q > 0.0 => Ok(q),
        Some(_) => Err(format!("quantity must be positive: '{}'", s)),
        None => Err(format!("not a quantity: '{}'", s)),
    }
}

/// Parse a parent assembly given as `NAME` or `NAME=QTY`
pub fn parse_parent_arg(s: &str) -> Result<AssemblyNode, String> {
    let (name, qty) = match s.rsplit_once('=') {
        Some((name, qty)) => (name, parse_qty_arg(qty)?),
        None => (s, 1.0),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing assembly name in '{}'", s));
    }
    Ok(AssemblyNode::new(name, qty))
}
