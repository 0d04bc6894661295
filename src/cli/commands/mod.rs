//! Command implementations

pub mod completions;
pub mod inputs;
pub mod merge;
pub mod sections;
pub mod tree;

use clap::ValueEnum;
use miette::{IntoDiagnostic, Result};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;

/// Load configuration, honouring `--config`
pub(crate) fn load_config(global: &GlobalOpts) -> Result<Config> {
    Config::load(global.config.as_deref()).into_diagnostic()
}

/// Resolve `auto` to the configured default format, falling back to markdown
pub(crate) fn resolve_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    match global.format {
        OutputFormat::Auto => config
            .default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f.trim(), true).ok())
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(OutputFormat::Md),
        f => f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(format: OutputFormat) -> GlobalOpts {
        GlobalOpts {
            format,
            quiet: false,
            verbose: 0,
            config: None,
        }
    }

    #[test]
    fn test_explicit_format_wins() {
        let config = Config {
            default_format: Some("json".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_format(&global(OutputFormat::Csv), &config), OutputFormat::Csv);
    }

    #[test]
    fn test_auto_uses_configured_default() {
        let config = Config {
            default_format: Some("TSV".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_format(&global(OutputFormat::Auto), &config), OutputFormat::Tsv);
    }

    #[test]
    fn test_auto_falls_back_to_markdown() {
        let config = Config {
            default_format: Some("yaml".to_string()),
            ..Config::default()
        };
        assert_eq!(resolve_format(&global(OutputFormat::Auto), &config), OutputFormat::Md);
        assert_eq!(
            resolve_format(&global(OutputFormat::Auto), &Config::default()),
            OutputFormat::Md
        );
    }
}
