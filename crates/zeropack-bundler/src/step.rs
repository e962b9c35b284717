//! Declarative build-step model.
//!
//! A [`BuildStep`] is a fully-resolved description of one compiler
//! invocation: one entry module, one output format, plus everything the
//! pipeline needs to run without consulting the manifest again. Steps are
//! plain data so they can be inspected, logged, and tested without touching
//! a compiler.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::external::ExternalPolicy;
use zeropack_config::{Format, Target};

/// How the CommonJS wrapper exposes module exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Let the wrapper infer the export shape.
    Auto,
    /// The default export becomes `module.exports`, with named exports
    /// attached as properties. Used when an entry mixes both kinds.
    Default,
}

/// CSS Modules scoping policy for imported stylesheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CssModulesMode {
    /// Scope every stylesheet.
    All,
    /// Scope no stylesheet.
    None,
    /// Scope only files matching `*.module.css` (and friends).
    ByFilename,
}

/// Minifier settings for the terminal stage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MinifyOptions {
    /// Mangle top-level bindings. Safe for module formats where the top
    /// level is not global scope.
    pub toplevel: bool,
    /// Property-mangling configuration from the manifest, if any.
    pub mangle: Option<Value>,
    /// Name-cache contents fed *into* the minifier. The orchestrator owns
    /// the merged result coming back out.
    pub name_cache: Option<Value>,
    pub compress: bool,
}

/// Where one step's output lands and how it is shaped.
#[derive(Debug, Clone, Serialize)]
pub struct OutputTarget {
    /// Absolute path of the main artifact.
    pub file: PathBuf,
    pub export_mode: ExportMode,
    /// Global variable name for UMD builds.
    pub global_name: String,
    /// Import specifier -> global variable, for externals kept out of a
    /// UMD bundle.
    pub globals: IndexMap<String, String>,
    /// Emit `"use strict"` / keep strict semantics in the wrapper.
    pub strict: bool,
    pub sourcemap: bool,
}

/// One transform stage in a step's pipeline.
///
/// Stages are always present in their canonical order; a stage that does
/// not apply to the step is carried with `enabled: false` rather than
/// omitted, so the pipeline shape is stable and positions are meaningful.
#[derive(Debug, Clone, Serialize)]
pub struct Stage {
    pub kind: StageKind,
    pub enabled: bool,
}

impl Stage {
    pub fn new(kind: StageKind, enabled: bool) -> Self {
        Self { kind, enabled }
    }
}

/// The canonical transform stages, in pipeline order.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "stage", rename_all = "kebab-case")]
pub enum StageKind {
    /// Import-specifier rewrites from `--alias`.
    Alias { aliases: IndexMap<String, String> },
    /// Stylesheet handling.
    Styles {
        /// Extract CSS to a sibling file instead of inlining.
        extract: bool,
        modules: CssModulesMode,
    },
    /// TypeScript syntax support and declaration output.
    TypeScript,
    /// Flow type stripping.
    Flow,
    /// Syntax downleveling to the step's target.
    Transpile {
        target: Target,
        /// Modern output skips most downleveling.
        modern: bool,
    },
    /// Bare-specifier resolution inside `node_modules`.
    NodeResolve { browser: bool },
    /// CommonJS-to-ESM interop for dependencies.
    CommonJs,
    /// Compile-time constant substitution from `--define`.
    Define { definitions: IndexMap<String, String> },
    /// Terminal minification.
    Minify(MinifyOptions),
}

/// A fully-resolved compiler invocation.
#[derive(Debug, Clone, Serialize)]
pub struct BuildStep {
    /// Absolute path of the entry module.
    pub entry: PathBuf,
    pub format: Format,
    /// True for the step whose minifier name-cache result is persisted
    /// back to disk. Exactly one step per build is primary.
    pub is_primary: bool,
    pub output: OutputTarget,
    #[serde(skip)]
    pub external: ExternalPolicy,
    pub stages: Vec<Stage>,
    /// Shebang line stripped from the entry source, re-emitted verbatim at
    /// the top of the artifact.
    pub shebang: Option<String>,
}

impl BuildStep {
    /// The stage list with disabled stages filtered out, for pipelines that
    /// only care about what actually runs.
    pub fn active_stages(&self) -> impl Iterator<Item = &StageKind> {
        self.stages
            .iter()
            .filter(|stage| stage.enabled)
            .map(|stage| &stage.kind)
    }

    /// Whether the terminal minify stage is enabled.
    pub fn minifies(&self) -> bool {
        self.active_stages()
            .any(|kind| matches!(kind, StageKind::Minify(_)))
    }
}
