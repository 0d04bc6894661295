//! `bommerge sections` command - what one spreadsheet contributes
//!
//! Useful when a sheet seems to be ignored: shows where each section label
//! was found and which rows it yields at multiplier 1.

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

use super::{load_config, resolve_format};
use crate::cli::table::{CellValue, Table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::grid::{read_first_sheet, SheetGrid};
use crate::core::section::{extract, locate, SectionKind, SectionLabels, SectionLocation};
use crate::entities::PartEntry;

#[derive(clap::Args, Debug)]
pub struct SectionsArgs {
    /// Spreadsheet to inspect
    pub file: PathBuf,
}

/// One section as found in a sheet
#[derive(Debug, Serialize)]
pub(crate) struct SectionSummary {
    pub section: SectionKind,
    pub label: String,
    pub location: Option<SectionLocation>,
    pub entries: Vec<PartEntry>,
}

pub fn run(args: SectionsArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let labels = config.section_labels();
    let grid = read_first_sheet(&args.file).into_diagnostic()?;
    let summaries = summarize(&grid, &labels);

    let format = resolve_format(global, &config);
    if format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&summaries).into_diagnostic()?;
        println!("{}", json);
        return Ok(());
    }

    for (i, summary) in summaries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let place = match summary.location {
            Some(loc) => format!(
                "label '{}' at row {}, column {}",
                summary.label,
                loc.row + 1,
                loc.col + 1
            ),
            None => format!("label '{}' not found", summary.label),
        };
        println!("{} ({})", style(summary.section.display_name()).bold(), place);

        if summary.entries.is_empty() {
            continue;
        }
        let mut table = Table::new(["Name", "Qty"]);
        for entry in &summary.entries {
            table.push_row(vec![
                CellValue::Text(entry.name.clone()),
                CellValue::Qty(entry.quantity),
            ]);
        }
        print!("{}", table.render(format)?);
    }

    Ok(())
}

pub(crate) fn summarize(grid: &SheetGrid, labels: &SectionLabels) -> Vec<SectionSummary> {
    SectionKind::ALL
        .iter()
        .map(|&kind| {
            let label = labels.label(kind);
            SectionSummary {
                section: kind,
                label: label.to_string(),
                location: locate(grid, label),
                entries: extract(grid, kind, label, 1.0),
            }
        })
        .collect()
}
