//! Top-level project resolution: manifest + options → resolved build inputs.

use std::path::{Path, PathBuf};

use path_clean::PathClean;

use crate::entries;
use crate::error::Result;
use crate::ident::{remove_scope, safe_variable_name};
use crate::manifest::{self, PackageManifest};
use crate::options::{BuildOptions, Format};
use crate::output::{OutputPaths, ResolveMainContext};

/// A fully resolved build: the manifest, the entry set, and the primary
/// output path, all derived once up front and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Project {
    pub options: BuildOptions,
    /// Absolute working directory.
    pub cwd: PathBuf,
    pub manifest: PackageManifest,
    /// Whether a real manifest file was found (drives operator warnings).
    pub has_manifest: bool,
    pub package_name: String,
    /// UMD/AMD global name: `--name`, the manifest `amdName`, or an
    /// identifier derived from the package name.
    pub global_name: String,
    /// Absolute primary output file; per-format paths are derived from it.
    pub output: PathBuf,
    /// Resolved absolute entry modules, in build order.
    pub entries: Vec<PathBuf>,
}

impl Project {
    /// Resolve a project from merged build options.
    ///
    /// Never fails on missing or malformed manifests; the only error
    /// sources are invalid CLI values and filesystem access during entry
    /// discovery.
    pub fn resolve(options: BuildOptions) -> Result<Self> {
        let cwd = if options.cwd.is_absolute() {
            options.cwd.clone()
        } else {
            std::env::current_dir()?.join(&options.cwd)
        }
        .clean();

        let (manifest, has_manifest) = manifest::load(&cwd);
        let package_name = manifest.name.clone();
        let global_name = options
            .name
            .clone()
            .or_else(|| manifest.amd_name.clone())
            .unwrap_or_else(|| safe_variable_name(&package_name));

        // Primary output file: -o override, legacy main, or dist/. A bare
        // directory gains a scopeless-package-name filename.
        let seed = options
            .output
            .clone()
            .or_else(|| manifest.main.as_deref().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("dist"));
        let mut output = cwd.join(seed).clean();
        if !has_file_extension(&output) || output.is_dir() {
            output = output.join(format!("{}.js", remove_scope(&package_name)));
        }

        let entries = entries::resolve(&options, &manifest, &cwd)?;

        Ok(Project {
            options,
            cwd,
            manifest,
            has_manifest,
            package_name,
            global_name,
            output,
            entries,
        })
    }

    pub fn multiple_entries(&self) -> bool {
        self.entries.len() > 1
    }

    /// Directory all artifacts land under, for the build report header.
    pub fn output_dir(&self) -> &Path {
        self.output.parent().unwrap_or(&self.cwd)
    }

    /// The requested formats (already normalized and `cjs`-first ordered).
    pub fn formats(&self) -> &[Format] {
        &self.options.formats
    }

    /// Per-format output paths for one entry, relative to `cwd`.
    pub fn output_paths(&self, entry: &Path) -> OutputPaths {
        OutputPaths::resolve(ResolveMainContext {
            manifest: &self.manifest,
            cwd: &self.cwd,
            entry,
            entries: &self.entries,
            output: &self.output,
        })
    }
}

/// Mirrors the `\.[a-z]+$` convention check: a path "has an extension" for
/// output-seeding purposes only when it ends in a plain alphabetic one.
fn has_file_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_lowercase()))
}
