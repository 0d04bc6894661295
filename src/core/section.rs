//! Labeled sections of an assembly sheet
//!
//! An assembly sheet lists its contents in sections introduced by a label
//! cell ("Сборочные единицы", "Стандартные изделия", "Прочие изделия"). The
//! row under the label is a column header; data rows follow until the first
//! blank row. The label's column holds names, the column to its right holds
//! quantities.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::grid::{Cell, SheetGrid};
use crate::entities::PartEntry;

/// What to do with a row whose quantity is missing or unparsable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityPolicy {
    /// Count the row once
    DefaultToOne,
    /// Drop the row
    Skip,
}

/// The sections an assembly sheet may contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// References to other assemblies
    Subassemblies,
    /// Standard catalog parts
    StandardItems,
    /// Miscellaneous purchased parts
    MiscItems,
}

impl SectionKind {
    pub const ALL: [SectionKind; 3] = [
        SectionKind::Subassemblies,
        SectionKind::StandardItems,
        SectionKind::MiscItems,
    ];

    /// Sections whose rows are counted as parts
    pub const ITEM_SECTIONS: [SectionKind; 2] = [SectionKind::StandardItems, SectionKind::MiscItems];

    pub fn default_label(self) -> &'static str {
        match self {
            SectionKind::Subassemblies => "сборочные единицы",
            SectionKind::StandardItems => "стандартные изделия",
            SectionKind::MiscItems => "прочие изделия",
        }
    }

    /// Item rows append a populated left-hand cell to the name
    /// (`Bolt` next to `M6` becomes `Bolt_M6`). Sub-assembly names are used
    /// bare because they are looked up in the registry.
    pub fn composite_names(self) -> bool {
        !matches!(self, SectionKind::Subassemblies)
    }

    /// Sub-assembly references without a count are single instances;
    /// parts without a count are not counted at all.
    pub fn quantity_policy(self) -> QuantityPolicy {
        match self {
            SectionKind::Subassemblies => QuantityPolicy::DefaultToOne,
            SectionKind::StandardItems | SectionKind::MiscItems => QuantityPolicy::Skip,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SectionKind::Subassemblies => "Sub-assemblies",
            SectionKind::StandardItems => "Standard items",
            SectionKind::MiscItems => "Miscellaneous items",
        }
    }
}

/// Label substrings used to find each section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SectionLabels {
    pub subassemblies: String,
    pub standard_items: String,
    pub misc_items: String,
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self {
            subassemblies: SectionKind::Subassemblies.default_label().to_string(),
            standard_items: SectionKind::StandardItems.default_label().to_string(),
            misc_items: SectionKind::MiscItems.default_label().to_string(),
        }
    }
}

impl SectionLabels {
    pub fn label(&self, kind: SectionKind) -> &str {
        match kind {
            SectionKind::Subassemblies => &self.subassemblies,
            SectionKind::StandardItems => &self.standard_items,
            SectionKind::MiscItems => &self.misc_items,
        }
    }
}

/// Position of a section's label cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionLocation {
    pub row: usize,
    pub col: usize,
}

/// Find the first cell (row-major) whose lower-cased text contains `label`
pub fn locate(grid: &SheetGrid, label: &str) -> Option<SectionLocation> {
    let needle = label.to_lowercase();

    grid.rows().iter().enumerate().find_map(|(row, cells)| {
        cells
            .iter()
            .position(|cell| !cell.is_blank() && cell.to_string().to_lowercase().contains(&needle))
            .map(|col| SectionLocation { row, col })
    })
}

/// Read the entries of one section, each quantity scaled by `multiplier`
///
/// Returns nothing when the label is absent.
pub fn extract(grid: &SheetGrid, kind: SectionKind, label: &str, multiplier: f64) -> Vec<PartEntry> {
    let Some(location) = locate(grid, label) else {
        debug!(section = kind.display_name(), label, "section not found");
        return Vec::new();
    };
    debug!(
        section = kind.display_name(),
        row = location.row,
        col = location.col,
        "section found"
    );

    let mut entries = Vec::new();

    // Skip the label row and the column header below it
    for (row_index, row) in grid.rows().iter().enumerate().skip(location.row + 2) {
        if row.iter().all(Cell::is_blank) {
            break;
        }

        if let Some((name, quantity)) = read_row(row, location.col, kind) {
            entries.push(PartEntry::new(name, quantity * multiplier));
        } else {
            debug!(section = kind.display_name(), row = row_index, "row skipped");
        }
    }

    entries
}

fn read_row(row: &[Cell], col: usize, kind: SectionKind) -> Option<(String, f64)> {
    let mut name = non_blank(row.get(col))?;

    if kind.composite_names() && col > 0 {
        if let Some(left) = non_blank(row.get(col - 1)) {
            name = format!("{}_{}", name, left);
        }
    }

    let quantity = match row.get(col + 1).and_then(parse_quantity) {
        Some(q) => q,
        None => match kind.quantity_policy() {
            QuantityPolicy::DefaultToOne => 1.0,
            QuantityPolicy::Skip => return None,
        },
    };

    Some((name, quantity))
}

fn non_blank(cell: Option<&Cell>) -> Option<String> {
    cell.map(Cell::trimmed).filter(|s| !s.is_empty())
}

/// Quantity held by a cell
///
/// Numbers are taken as is. Text accepts `,` or `.` as the decimal separator
/// and reads the leading number, ignoring anything after it (`"3 pcs"` is 3).
pub fn parse_quantity(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Empty => None,
        Cell::Number(n) => Some(*n).filter(|n| n.is_finite()),
        Cell::Text(s) => parse_decimal(s),
    }
}

/// Parse the leading decimal number of `text`, `,` or `.` as separator
pub fn parse_decimal(text: &str) -> Option<f64> {
    let normalized = text.trim().replacen(',', ".", 1);
    let prefix = leading_number(&normalized);
    if prefix.is_empty() {
        return None;
    }
    prefix.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn leading_number(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return "";
    }

    // Exponent only counts when digits follow it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}
