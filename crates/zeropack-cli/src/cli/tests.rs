use clap::Parser;

use super::{Cli, Command};

#[test]
fn bare_invocation_is_a_build() {
    let cli = Cli::parse_from(["zeropack"]);
    assert!(cli.command.is_none());
    assert!(cli.build.entries.is_empty());
}

#[test]
fn positional_entries_without_subcommand() {
    let cli = Cli::parse_from(["zeropack", "src/index.js", "src/worker.js"]);
    assert!(cli.command.is_none());
    assert_eq!(cli.build.entries, vec!["src/index.js", "src/worker.js"]);
}

#[test]
fn explicit_build_subcommand() {
    let cli = Cli::parse_from(["zeropack", "build", "-f", "cjs,es", "-o", "lib"]);
    let Some(Command::Build(args)) = cli.command else {
        panic!("expected build subcommand");
    };
    assert_eq!(args.format.as_deref(), Some("cjs,es"));
    assert_eq!(args.output.as_deref(), Some(std::path::Path::new("lib")));
}

#[test]
fn watch_subcommand_carries_build_args() {
    let cli = Cli::parse_from(["zeropack", "watch", "--no-compress", "src/index.ts"]);
    let Some(Command::Watch(args)) = cli.command else {
        panic!("expected watch subcommand");
    };
    assert!(args.build.no_compress);
    assert_eq!(args.build.entries, vec!["src/index.ts"]);
}

#[test]
fn compress_flag_pair_overrides_in_order() {
    let cli = Cli::parse_from(["zeropack", "--no-compress", "--compress"]);
    assert!(cli.build.compress);
    assert!(!cli.build.no_compress);

    let cli = Cli::parse_from(["zeropack", "--compress", "--no-compress"]);
    assert!(cli.build.no_compress);
}

#[test]
fn global_flags_apply_after_subcommand() {
    let cli = Cli::parse_from(["zeropack", "build", "--verbose"]);
    assert!(cli.verbose);
}
