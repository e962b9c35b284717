//! Command-line interface definition for zeropack.
//!
//! Defined with clap v4 derive macros. The build arguments are flattened
//! onto the top level so that `zeropack src/index.js` works without naming
//! the `build` subcommand, matching the zero-config spirit of the tool.

mod commands;
#[cfg(test)]
mod tests;

use clap::Parser;

pub use commands::{BuildArgs, Command, WatchArgs};

/// Zeropack - zero-configuration bundler for tiny modules
#[derive(Parser, Debug)]
#[command(
    name = "zeropack",
    version,
    about = "Zero-configuration bundler for tiny modules",
    long_about = "Zeropack bundles a library into CommonJS, ESM, UMD, and modern-ESM\n\
                  outputs, inferring entries and output paths from package.json.\n\
                  Running it with no subcommand performs a build.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Build arguments used when no subcommand is given
    #[command(flatten)]
    pub build: BuildArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}
