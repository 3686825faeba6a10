//! CLI argument parsing using clap.
//!
//! Contains the Cli struct and the Commands enum.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

fn heading(text: &str) -> String {
    use console::style;

    if console::colors_enabled() {
        format!("{}", style(text).cyan().bold())
    } else {
        text.to_string()
    }
}

/// Create custom help text with consistent styling
fn create_custom_help() -> String {
    let mut help = String::new();

    help.push_str(&heading("Quick Start:"));
    help.push('\n');
    help.push_str("  $ regdoc init                          # Create .regdoc/settings.toml\n");
    help.push_str("  $ regdoc generate registry.json        # HTML pages into output_dir\n");
    help.push_str("  $ regdoc generate registry.json --cpp --list -o out\n");
    help.push_str("  $ regdoc inspect registry.json --json  # Dump the computed index\n\n");

    help.push_str("Generate documentation from an exported binding registry.\n\n");

    help.push_str(&heading("Usage:"));
    help.push_str(" regdoc [OPTIONS] <COMMAND>\n\n");

    help.push_str(&heading("Commands:"));
    help.push('\n');
    help.push_str("  init          Set up .regdoc directory\n");
    help.push_str("  config        Display active settings\n");
    help.push_str("  generate      Render HTML, C++ stubs and the completion list\n");
    help.push_str("  inspect       Show classes, groups and the hierarchy\n");
    help.push_str("  help          Print this message or the help of the given subcommand(s)\n\n");

    help.push_str("See 'regdoc help <command>' for more information on a specific command.\n\n");

    help.push_str(&heading("Options:"));
    help.push('\n');
    help.push_str("  -c, --config <CONFIG>  Path to custom settings.toml file\n");
    help.push_str("  -h, --help             Print help\n");
    help.push_str("  -V, --version          Print version\n");

    help
}

/// Binding registry documentation generator
#[derive(Parser, Debug)]
#[command(
    name = "regdoc",
    version = env!("CARGO_PKG_VERSION"),
    about = "Binding registry documentation generator",
    long_about = "Generate documentation from an exported binding registry.",
    next_line_help = true,
    styles = clap_cargo_style(),
    override_help = create_custom_help()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .regdoc directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    #[command(about = "Display active settings")]
    Config,

    /// Generate documentation from a registry snapshot
    #[command(
        about = "Render HTML, C++ stubs and the completion list",
        long_about = "Render documentation for a registry snapshot.\n\n\
                      Without --html/--cpp/--list the formats enabled in settings are generated.\n\
                      With any of them, exactly the given formats are generated."
    )]
    Generate {
        /// Registry snapshot (JSON)
        #[arg(value_name = "REGISTRY")]
        registry: PathBuf,

        /// Generate the HTML pages
        #[arg(long)]
        html: bool,

        /// Generate the C++ stub files
        #[arg(long)]
        cpp: bool,

        /// Generate the completion list
        #[arg(long)]
        list: bool,

        /// Output directory (overrides config)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Log errors only and skip the summary
        #[arg(short, long)]
        silent: bool,
    },

    /// Inspect the computed index without writing files
    #[command(about = "Show classes, groups and the hierarchy")]
    Inspect {
        /// Registry snapshot (JSON)
        #[arg(value_name = "REGISTRY")]
        registry: PathBuf,

        /// List entries ordered by registry group
        #[arg(long)]
        by_group: bool,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Whether the command asks for errors-only logging.
    pub fn is_silent(&self) -> bool {
        matches!(self, Commands::Generate { silent: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "regdoc", "generate", "reg.json", "--cpp", "--list", "-o", "out", "--silent",
        ])
        .unwrap();
        assert!(cli.command.is_silent());
        match cli.command {
            Commands::Generate {
                registry,
                html,
                cpp,
                list,
                output,
                ..
            } => {
                assert_eq!(registry, PathBuf::from("reg.json"));
                assert!(!html);
                assert!(cpp);
                assert!(list);
                assert_eq!(output, Some(PathBuf::from("out")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["regdoc", "inspect", "reg.json", "-c", "alt.toml", "--json"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        assert!(!cli.command.is_silent());
    }
}
