//! `bommerge merge` command - merged part quantities for an assembly tree

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use super::inputs::InputArgs;
use super::{load_config, resolve_format};
use crate::cli::helpers::parse_parent_arg;
use crate::cli::table::{CellValue, Table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::report::{MergedReport, RELATION_HEADERS};
use crate::core::Resolver;
use crate::entities::AssemblyNode;

/// File names used with --output-dir
pub const MERGED_ITEMS_FILE: &str = "merged_items.csv";
pub const RELATIONS_FILE: &str = "relations.csv";

#[derive(clap::Args, Debug)]
pub struct MergeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Assembly above the root, as NAME or NAME=QTY (repeat, outermost first)
    #[arg(long = "parent", value_name = "NAME[=QTY]", value_parser = parse_parent_arg)]
    pub parents: Vec<AssemblyNode>,

    /// Sum the items of every loaded sheet once, ignoring sub-assembly references
    #[arg(long, conflicts_with_all = ["parents", "root"])]
    pub flat: bool,

    /// Also print the parent/child/item relations table
    #[arg(long)]
    pub relations: bool,

    /// Write merged_items.csv and relations.csv into this directory
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,
}

pub fn run(args: MergeArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let inputs = args.input.load()?;
    let labels = config.section_labels();

    let resolver = Resolver::new(&inputs.registry, &labels).with_max_depth(config.max_depth());
    let resolution = if args.flat {
        resolver.resolve_flat(args.input.qty)?
    } else {
        resolver.resolve_with_parents(&inputs.root, args.input.qty, &args.parents)?
    };
    let report = MergedReport::build(&resolution);

    match resolve_format(global, &config) {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
            println!("{}", json);
        }
        format => {
            print!("{}", items_table(&report).render(format)?);
            if args.relations {
                println!();
                print!("{}", relations_table(&report).render(format)?);
            }
        }
    }

    if let Some(dir) = &args.output_dir {
        write_report_files(&report, dir)?;
        if !global.quiet {
            eprintln!(
                "{} Report written to: {}",
                style("✓").green(),
                dir.display()
            );
        }
    }

    if !global.quiet {
        for reference in &report.unresolved {
            eprintln!(
                "{} '{}' listed in '{}' matched no loaded assembly",
                style("!").yellow(),
                reference.name,
                reference.parent
            );
        }
        for name in resolution.unreached(&inputs.registry) {
            eprintln!(
                "{} '{}' is not used by '{}' and was left out (see --flat)",
                style("!").yellow(),
                name,
                inputs.root
            );
        }
        eprintln!(
            "{} part(s) across {} assembly occurrence(s)",
            style(report.items.len()).cyan(),
            style(resolution.visits.iter().filter(|v| v.resolved).count()).cyan()
        );
    }

    Ok(())
}

/// Item, grand total, then one column per containing assembly
pub(crate) fn items_table(report: &MergedReport) -> Table {
    let mut table = Table::new(report.item_headers());
    for item in &report.items {
        let mut row = vec![CellValue::Text(item.name.clone()), CellValue::Qty(item.total)];
        row.extend(
            report
                .assemblies
                .iter()
                .map(|a| CellValue::OptionalQty(item.quantity_in(a))),
        );
        table.push_row(row);
    }
    table
}

/// The relation ledger, one row per item occurrence
pub(crate) fn relations_table(report: &MergedReport) -> Table {
    let mut table = Table::new(RELATION_HEADERS);
    for rec in &report.relations {
        table.push_row(vec![
            rec.parent.clone().map_or(CellValue::Empty, CellValue::Text),
            CellValue::OptionalQty(rec.parent_qty),
            CellValue::Text(rec.child.clone()),
            CellValue::Qty(rec.child_qty),
            CellValue::Text(rec.item.clone()),
            CellValue::Qty(rec.item_qty),
        ]);
    }
    table
}

/// Write both tables as CSV files, creating `dir` if needed
pub(crate) fn write_report_files(report: &MergedReport, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).into_diagnostic()?;
    items_table(report).write_csv(&dir.join(MERGED_ITEMS_FILE))?;
    relations_table(report).write_csv(&dir.join(RELATIONS_FILE))?;
    Ok(())
}
