//! Error types for configuration resolution.
//!
//! Most of the resolution engine is deliberately infallible: missing or
//! malformed manifests degrade to synthesized defaults with a warning, and
//! output-path resolution always falls through to a computed default. The
//! errors here cover the few places that can genuinely fail: bad CLI values
//! and filesystem access during setup.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An unrecognized value was passed to `--format`.
    #[error("unknown output format: {0:?} (expected one of: modern, es, esm, cjs, umd)")]
    UnknownFormat(String),

    /// An unrecognized value was passed to `--target`.
    #[error("unknown target: {0:?} (expected \"node\" or \"web\")")]
    UnknownTarget(String),

    /// An entry pattern was not a valid filesystem glob.
    #[error("invalid entry pattern {pattern:?}: {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// A mapping argument (`--globals`, `--define`, `--alias`) was malformed.
    #[error("invalid mapping argument {0:?} (expected key=value[,key=value...])")]
    BadMapping(String),

    /// An `--external` entry was not a valid regular expression.
    #[error("invalid external pattern {pattern:?}: {source}")]
    BadExternal {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// I/O errors from filesystem access during setup.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
