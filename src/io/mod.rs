//! Input/Output handling for the CLI.
//!
//! This module provides:
//! - Consistent exit codes
//! - Text and JSON output selection for inspection commands

pub mod exit_code;

pub use exit_code::ExitCode;

/// Output format for commands that print data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}
