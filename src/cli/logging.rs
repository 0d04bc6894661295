//! Log output for the command-line tool
//!
//! Library code logs through `tracing`; the binary routes it to stderr so
//! report output on stdout stays clean for piping.

use tracing::level_filters::LevelFilter;

use crate::cli::GlobalOpts;

/// Level implied by the global flags: warnings by default, `-v` info,
/// `-vv` debug, `-q` nothing
pub fn level_for(global: &GlobalOpts) -> LevelFilter {
    if global.quiet {
        return LevelFilter::OFF;
    }
    match global.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

/// Install the stderr subscriber. Safe to call more than once.
pub fn init(global: &GlobalOpts) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for(global))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
