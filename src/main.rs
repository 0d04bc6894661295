use clap::Parser;
use miette::Result;
use bommerge::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head` or `grep -q` panics on a broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    bommerge::cli::logging::init(&global);

    match cli.command {
        Commands::Merge(args) => bommerge::cli::commands::merge::run(args, &global),
        Commands::Tree(args) => bommerge::cli::commands::tree::run(args, &global),
        Commands::Sections(args) => bommerge::cli::commands::sections::run(args, &global),
        Commands::Completions(args) => bommerge::cli::commands::completions::run(args),
    }
}
