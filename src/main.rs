use clap::Parser;

use regdoc::cli::commands::{generate, init, inspect};
use regdoc::cli::{Cli, Commands};
use regdoc::io::{ExitCode, OutputFormat};
use regdoc::{Settings, logging};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Init needs no configuration
    if let Commands::Init { force } = cli.command {
        logging::init();
        return init::run_init(force).into();
    }

    let config = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            logging::init();
            eprintln!("Configuration error: {e}");
            return ExitCode::ConfigError.into();
        }
    };

    if config.silent || cli.command.is_silent() {
        logging::init_with_config(&config.logging.silenced());
    } else {
        logging::init_with_config(&config.logging);
    }

    let code = match cli.command {
        Commands::Init { .. } => ExitCode::Success,
        Commands::Config => init::run_config(&config),
        Commands::Generate {
            registry,
            html,
            cpp,
            list,
            output,
            silent,
        } => generate::run(
            generate::GenerateArgs {
                registry,
                html,
                cpp,
                list,
                output,
                silent,
            },
            config,
        ),
        Commands::Inspect {
            registry,
            by_group,
            json,
        } => inspect::run(
            &registry,
            by_group,
            OutputFormat::from_json_flag(json),
            &config,
        ),
    };

    code.into()
}
