//! Zeropack CLI - zero-configuration bundling for tiny modules.
//!
//! This crate provides the command-line interface for zeropack. Almost all
//! behavior is driven by the package manifest; the CLI's job is to parse
//! overrides, hand them to the resolver, run the orchestrator, and print a
//! build summary people actually read.
//!
//! Modules:
//!
//! - [`cli`] - clap argument definitions, including the default-subcommand
//!   behavior (`zeropack src/index.js` is `zeropack build src/index.js`)
//! - [`commands`] - command implementations
//! - [`error`] - CLI error types and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages and size/duration formatting

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
