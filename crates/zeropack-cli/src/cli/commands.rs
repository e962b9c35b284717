use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Available zeropack subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the package once
    ///
    /// Bundles the entry modules into every requested output format,
    /// deriving entries and output paths from package.json.
    Build(BuildArgs),

    /// Rebuild on every source change
    ///
    /// Runs an initial build, then watches the package directory and
    /// rebuilds whenever a source file changes.
    Watch(WatchArgs),
}

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Entry modules or glob patterns
    ///
    /// Defaults to the manifest `source` field, then `src/index.*`, then
    /// `index.*`, then the manifest `module` field.
    #[arg(value_name = "ENTRY")]
    pub entries: Vec<String>,

    /// Additional entry modules (repeatable)
    #[arg(short = 'i', long = "entry", value_name = "ENTRY")]
    pub entry: Vec<String>,

    /// Output file or directory
    ///
    /// Defaults to the manifest `main` field, or `dist/`.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Comma-separated output formats (modern, es, cjs, umd)
    ///
    /// `cjs` always builds first so its minifier name cache seeds the
    /// other formats.
    #[arg(short = 'f', long, value_name = "FORMATS")]
    pub format: Option<String>,

    /// Build target: web or node
    #[arg(long, default_value = "web", value_name = "TARGET")]
    pub target: String,

    /// External module patterns, or "none" to bundle everything
    ///
    /// Defaults to peerDependencies plus dependencies.
    #[arg(long, value_name = "PATTERNS")]
    pub external: Option<String>,

    /// UMD global names for externals (react=React,...)
    #[arg(long, value_name = "MAP")]
    pub globals: Option<String>,

    /// Compile-time constant substitutions (A=1,@assign=Object.assign,...)
    #[arg(long, value_name = "MAP")]
    pub define: Option<String>,

    /// Import specifier rewrites (react=preact/compat,...)
    #[arg(long, value_name = "MAP")]
    pub alias: Option<String>,

    /// Force minification on (default)
    #[arg(long, overrides_with = "no_compress")]
    pub compress: bool,

    /// Disable minification
    #[arg(long = "no-compress", overrides_with = "compress")]
    pub no_compress: bool,

    /// Keep strict-mode semantics in the output wrappers
    #[arg(long)]
    pub strict: bool,

    /// Emit source maps (default)
    #[arg(long, overrides_with = "no_sourcemap")]
    pub sourcemap: bool,

    /// Disable source maps
    #[arg(long = "no-sourcemap", overrides_with = "sourcemap")]
    pub no_sourcemap: bool,

    /// UMD/AMD global name
    ///
    /// Defaults to the manifest `amdName` field, or an identifier derived
    /// from the package name.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Package directory to build
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub cwd: PathBuf,

    /// Force CSS Modules on or off
    ///
    /// Unset scopes only files named `*.module.css`.
    #[arg(long, value_name = "BOOL")]
    pub css_modules: Option<bool>,

    /// Print the resolved build report as JSON instead of the summary
    #[arg(long)]
    pub raw: bool,
}

// Mirrors the clap `default_value` attributes so `BuildArgs::default()`
// matches what parsing an empty command line produces.
impl Default for BuildArgs {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            entry: Vec::new(),
            output: None,
            format: None,
            target: "web".to_string(),
            external: None,
            globals: None,
            define: None,
            alias: None,
            compress: false,
            no_compress: false,
            strict: false,
            sourcemap: false,
            no_sourcemap: false,
            name: None,
            cwd: PathBuf::from("."),
            css_modules: None,
            raw: false,
        }
    }
}

/// Arguments for the watch command
#[derive(Args, Debug, Default)]
pub struct WatchArgs {
    #[command(flatten)]
    pub build: BuildArgs,
}
