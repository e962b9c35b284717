//! CLI command implementations.

mod build;
mod watch;

pub use build::execute as build_execute;
pub use watch::execute as watch_execute;

use crate::cli::BuildArgs;
use crate::error::Result;
use zeropack_config::{BuildOptions, Format, Target};

/// Merge parsed CLI arguments into resolver options.
pub(crate) fn build_options(args: &BuildArgs, watch: bool) -> Result<BuildOptions> {
    let mut entries = args.entries.clone();
    entries.extend(args.entry.iter().cloned());

    let defaults = BuildOptions::default();
    let formats = match args.format.as_deref() {
        Some(raw) => Format::parse_list(raw)?,
        None => defaults.formats,
    };

    Ok(BuildOptions {
        cwd: args.cwd.clone(),
        entries,
        formats,
        target: Target::parse(&args.target)?,
        compress: !args.no_compress,
        external: args.external.clone(),
        globals: args.globals.clone(),
        define: args.define.clone(),
        alias: args.alias.clone(),
        strict: args.strict,
        sourcemap: !args.no_sourcemap,
        output: args.output.clone(),
        name: args.name.clone(),
        css_modules: args.css_modules,
        watch,
    })
}
