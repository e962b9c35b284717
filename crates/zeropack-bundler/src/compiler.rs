//! Compiler seam.
//!
//! The orchestrator does not bundle JavaScript itself; it hands each
//! [`BuildStep`](crate::BuildStep) to a [`Compiler`] implementation and
//! writes back what comes out. The trait keeps the plan layer testable and
//! lets the actual transform engine evolve independently.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::step::StageKind;
use crate::{BuildStep, CompileDiagnostic};

/// Opaque parsed-module cache threaded between sequential steps.
///
/// The orchestrator treats this as a black box: it passes the cache from
/// one step's output to the next step's input without inspecting it.
#[derive(Debug, Default, Clone)]
pub struct ModuleCache {
    modules: HashMap<PathBuf, CachedModule>,
}

#[derive(Debug, Clone)]
struct CachedModule {
    source: String,
}

impl ModuleCache {
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Cached source text for a module, if present.
    pub fn source_of(&self, path: &std::path::Path) -> Option<&str> {
        self.modules.get(path).map(|module| module.source.as_str())
    }
}

/// One emitted file.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Absolute output path.
    pub file: PathBuf,
    pub code: String,
    /// Serialized source map, written to `<file>.map` when present.
    pub map: Option<String>,
}

/// Result of compiling one step.
#[derive(Debug, Default)]
pub struct CompileOutput {
    pub artifacts: Vec<Artifact>,
    /// Module cache to thread into the next step.
    pub cache: Option<ModuleCache>,
    /// Minifier name-cache contents after this step.
    pub name_cache: Option<Value>,
    /// Non-fatal diagnostics, surfaced by the caller.
    pub warnings: Vec<String>,
}

/// The transform engine behind the orchestrator.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Compiles one step, optionally reusing a module cache from an
    /// earlier step of the same build.
    async fn compile(
        &self,
        step: &BuildStep,
        cache: Option<ModuleCache>,
    ) -> Result<CompileOutput, CompileDiagnostic>;
}

/// A compiler that copies entry sources through without bundling.
///
/// Applies the `define` substitutions textually and re-emits the shebang,
/// which is enough for plan-level integration tests and for smoke-testing
/// output path resolution end to end.
pub struct PassthroughCompiler;

#[async_trait]
impl Compiler for PassthroughCompiler {
    async fn compile(
        &self,
        step: &BuildStep,
        cache: Option<ModuleCache>,
    ) -> Result<CompileOutput, CompileDiagnostic> {
        let source = tokio::fs::read_to_string(&step.entry)
            .await
            .map_err(|err| {
                let mut diag = CompileDiagnostic::message(format!(
                    "could not read entry module: {err}"
                ));
                diag.file = Some(step.entry.clone());
                diag
            })?;

        // The assembler already lifted the shebang into the step.
        let mut body = if source.starts_with("#!") {
            match source.split_once('\n') {
                Some((_, rest)) => rest.to_string(),
                None => String::new(),
            }
        } else {
            source.clone()
        };

        for kind in step.active_stages() {
            if let StageKind::Define { definitions } = kind {
                for (find, replace) in definitions {
                    body = body.replace(find.as_str(), replace);
                }
            }
        }

        let mut code = String::new();
        if let Some(shebang) = &step.shebang {
            code.push_str(shebang);
            code.push('\n');
        }
        code.push_str(&body);

        let mut cache = cache.unwrap_or_default();
        cache
            .modules
            .insert(step.entry.clone(), CachedModule { source });

        Ok(CompileOutput {
            artifacts: vec![Artifact {
                file: step.output.file.clone(),
                code,
                map: None,
            }],
            cache: Some(cache),
            name_cache: None,
            warnings: Vec::new(),
        })
    }
}
