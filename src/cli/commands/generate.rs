//! Generate command - render documentation for a registry snapshot.

use std::path::PathBuf;

use console::style;

use crate::config::Settings;
use crate::io::ExitCode;
use crate::registry::JsonFileSource;
use crate::run::{GenerateError, RunSummary, generate_from};

/// Arguments for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    pub registry: PathBuf,
    pub html: bool,
    pub cpp: bool,
    pub list: bool,
    pub output: Option<PathBuf>,
    pub silent: bool,
}

impl GenerateArgs {
    fn selects_formats(&self) -> bool {
        self.html || self.cpp || self.list
    }
}

/// Fold command-line flags into the loaded settings.
///
/// Any format flag replaces the configured format selection entirely.
pub fn apply_overrides(settings: &mut Settings, args: &GenerateArgs) {
    if args.selects_formats() {
        settings.output.html = args.html;
        settings.output.cpp_stub = args.cpp;
        settings.output.completion_list = args.list;
    }
    if let Some(dir) = &args.output {
        settings.output_dir = dir.clone();
    }
    if args.silent {
        settings.silent = true;
    }
}

/// Run the generate command.
pub fn run(args: GenerateArgs, mut settings: Settings) -> ExitCode {
    apply_overrides(&mut settings, &args);

    let source = JsonFileSource::new(&args.registry);
    match generate_from(&source, &settings) {
        Ok(summary) => {
            if !settings.silent {
                print_summary(&summary);
            }
            ExitCode::Success
        }
        Err(e) => report_failure(e, &args),
    }
}

fn report_failure(e: GenerateError, args: &GenerateArgs) -> ExitCode {
    let code = e.exit_code();
    if let GenerateError::Stage { completed, .. } = &e {
        for done in completed {
            eprintln!("  {} {} ({} files kept)", style("done").dim(), done.stage, done.report.len());
        }
    }
    let err = anyhow::Error::new(e).context(format!(
        "Failed to generate documentation for {}",
        args.registry.display()
    ));
    eprintln!("{} {err:#}", style("Error:").red().bold());
    code
}

fn print_summary(summary: &RunSummary) {
    println!(
        "{} {} classes, {} class groups, {} functions",
        style("Indexed").green().bold(),
        summary.classes,
        summary.class_groups,
        summary.functions
    );
    for stage in &summary.stages {
        println!("  {:<16} {:>5} files", stage.stage.to_string(), stage.report.len());
    }
    println!(
        "{} {} files to {} in {}ms",
        style("Wrote").green().bold(),
        summary.files_written(),
        summary.output_dir.display(),
        summary.elapsed_ms
    );
}
