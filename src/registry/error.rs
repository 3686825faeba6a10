use std::path::PathBuf;
use thiserror::Error;

use crate::io::ExitCode;

/// Failures to obtain a registry snapshot. These are fatal for a run.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Registry snapshot not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Cannot read registry snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed registry snapshot {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported registry snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

impl RegistryError {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::RegistryError
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
