//! Logging setup for the zeropack CLI.
//!
//! Structured logging via the `tracing` ecosystem. Verbosity comes from
//! the global flags, with `RUST_LOG` as an escape hatch for precise
//! filtering.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Call once at startup, before any logging happens. Level selection:
///
/// 1. `--verbose`: debug level for zeropack crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG` environment variable
/// 4. Default: info level for zeropack crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("zeropack=debug,zeropack_bundler=debug,zeropack_config=debug,zeropack_cli=debug")
    } else if quiet {
        EnvFilter::new("zeropack=error,zeropack_bundler=error,zeropack_config=error,zeropack_cli=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("zeropack=info,zeropack_bundler=info,zeropack_config=info,zeropack_cli=info")
        })
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
