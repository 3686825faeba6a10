//! Process exit codes.
//!
//! Stable values so scripts driving the generator can tell a broken registry
//! snapshot from a bad configuration.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    /// The registry snapshot could not be loaded.
    RegistryError = 3,
    /// The configuration could not be loaded or written.
    ConfigError = 4,
}

impl ExitCode {
    pub fn is_success(self) -> bool {
        self == ExitCode::Success
    }

    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "success",
            ExitCode::GeneralError => "general error",
            ExitCode::RegistryError => "registry error",
            ExitCode::ConfigError => "configuration error",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        // all values fit in a u8
        std::process::ExitCode::from(code as u8)
    }
}
