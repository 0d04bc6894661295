//! `bommerge tree` command - the resolved assembly tree

use miette::{IntoDiagnostic, Result};

use super::inputs::InputArgs;
use super::{load_config, resolve_format};
use crate::cli::helpers::format_qty;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Resolver;
use crate::entities::Visit;

#[derive(clap::Args, Debug)]
pub struct TreeArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub fn run(args: TreeArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let inputs = args.input.load()?;
    let labels = config.section_labels();

    let resolution = Resolver::new(&inputs.registry, &labels)
        .with_max_depth(config.max_depth())
        .resolve(&inputs.root, args.input.qty)?;

    match resolve_format(global, &config) {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&resolution.visits).into_diagnostic()?;
            println!("{}", json);
        }
        _ => print!("{}", render_tree(&resolution.visits)),
    }

    Ok(())
}

/// Draw a pre-order visit list as an indented tree
pub(crate) fn render_tree(visits: &[Visit]) -> String {
    let mut output = String::new();
    // continues[d]: the branch at depth d has siblings still to come
    let mut continues: Vec<bool> = Vec::new();

    for (i, visit) in visits.iter().enumerate() {
        let mut label = format!("{} (qty: {})", visit.name, format_qty(visit.multiplier));
        if visit.is_dangling() {
            label.push_str(" [NOT FOUND]");
        }

        if visit.depth == 0 {
            output.push_str(&label);
            output.push('\n');
            continue;
        }

        let is_last = is_last_sibling(visits, i);
        for depth in 1..visit.depth {
            let open = continues.get(depth).copied().unwrap_or(false);
            output.push_str(if open { "│  " } else { "   " });
        }
        output.push_str(if is_last { "└─ " } else { "├─ " });
        output.push_str(&label);
        output.push('\n');

        if continues.len() <= visit.depth {
            continues.resize(visit.depth + 1, false);
        }
        continues[visit.depth] = !is_last;
    }

    output
}

fn is_last_sibling(visits: &[Visit], index: usize) -> bool {
    let depth = visits[index].depth;
    for later in &visits[index + 1..] {
        if later.depth < depth {
            return true;
        }
        if later.depth == depth {
            return false;
        }
    }
    true
}
