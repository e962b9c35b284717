//! Zeropack CLI entry point.
//!
//! Parses arguments, initializes logging, and dispatches to the command
//! implementations. A bare `zeropack [entries...]` invocation is treated
//! as `zeropack build`.

use clap::Parser;
use miette::Result;
use zeropack_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors();

    let result = match args.command {
        Some(cli::Command::Build(build_args)) => commands::build_execute(build_args).await,
        Some(cli::Command::Watch(watch_args)) => commands::watch_execute(watch_args).await,
        // No subcommand: build with the top-level arguments.
        None => commands::build_execute(args.build).await,
    };

    result.map_err(error::cli_error_to_miette)
}
