//! Error handling for the zeropack CLI.
//!
//! Thin wrapper over the library error types with a miette conversion at
//! the very top, so fatal errors render as readable diagnostics instead of
//! a debug dump.

use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration resolution failed (bad `-f`, `--define`, ...).
    #[error("Configuration error: {0}")]
    Config(#[from] zeropack_config::ConfigError),

    /// Build failed in the bundler.
    #[error(transparent)]
    Build(#[from] zeropack_bundler::Error),

    /// Invalid command-line arguments or combinations.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O errors from file system operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors (`--raw` output).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Convert a CliError into a miette report for terminal rendering.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Build(zeropack_bundler::Error::NoEntry) => miette::miette!(
            help = "specify an entry module, add a \"source\" field to package.json, or create src/index.js",
            "no entry module found"
        ),
        CliError::Build(zeropack_bundler::Error::Compile(diag)) => {
            miette::miette!("{diag}")
        }
        CliError::Config(e) => miette::miette!("Configuration error: {e}"),
        _ => miette::miette!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_entry_report_carries_help_text() {
        let report =
            cli_error_to_miette(CliError::Build(zeropack_bundler::Error::NoEntry));
        let rendered = format!("{report:?}");
        assert!(rendered.contains("no entry module found"));
    }
}
