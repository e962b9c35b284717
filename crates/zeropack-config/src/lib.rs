//! # zeropack-config
//!
//! The build-configuration resolution engine for zeropack.
//!
//! Given a working directory, a package manifest, and CLI overrides, this
//! crate answers three questions deterministically and without I/O failures:
//!
//! 1. **What are the entry modules?** ([`entries::resolve`]): explicit glob
//!    patterns, the manifest `source` field, or directory convention.
//! 2. **Where does each (entry, format) artifact go?** ([`output`]): a
//!    precedence cascade over the conditional `exports` map, legacy manifest
//!    fields, and a synthesized default.
//! 3. **What does the merged configuration look like?** ([`Project::resolve`]):
//!    manifest loading with synthesized defaults, format normalization,
//!    and the primary output path.
//!
//! Resolution is pure apart from reading the manifest and probing for entry
//! files; calling it twice with identical inputs yields identical results.

pub mod entries;
pub mod error;
pub mod exports;
pub mod manifest;
pub mod mappings;
pub mod options;
pub mod output;
pub mod paths;
pub mod project;

mod ident;

pub use error::{ConfigError, Result};
pub use exports::ExportsField;
pub use ident::{remove_scope, safe_variable_name};
pub use manifest::{MangleConfig, PackageManifest};
pub use mappings::{Alias, Define, ExternalPattern};
pub use options::{BuildOptions, Format, Target};
pub use output::{resolve_main, OutputPaths, ResolveMainContext};
pub use project::Project;
