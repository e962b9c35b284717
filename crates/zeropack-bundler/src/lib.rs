//! # zeropack-bundler
//!
//! Build plan assembly and orchestration for zeropack.
//!
//! The [`assemble`] module turns a resolved [`zeropack_config::Project`]
//! into declarative [`BuildStep`]s: one per (entry, format) pair, each
//! carrying its output target, external-module policy, and an ordered list
//! of tagged transform stages. The [`orchestrator`] executes those steps
//! through the [`Compiler`] seam, sequentially in one-shot mode with the
//! module cache threaded forward, or as independent watch sessions.
//!
//! ```no_run
//! use std::sync::Arc;
//! use zeropack_bundler::{Orchestrator, PassthroughCompiler};
//! use zeropack_config::{BuildOptions, Project};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let project = Project::resolve(BuildOptions::default())?;
//! let orchestrator = Orchestrator::new(Arc::new(PassthroughCompiler));
//! let report = orchestrator.run(&project).await?;
//! println!("{} artifact(s)", report.artifacts.len());
//! # Ok(()) }
//! ```

pub mod assemble;
pub mod compiler;
pub mod external;
pub mod name_cache;
pub mod orchestrator;
pub mod report;
pub mod step;
pub mod watch;

pub use assemble::assemble;
pub use compiler::{Artifact, CompileOutput, Compiler, ModuleCache, PassthroughCompiler};
pub use external::ExternalPolicy;
pub use orchestrator::{Orchestrator, WatchEvent, WatchHandle};
pub use report::{ArtifactSize, BuildReport};
pub use step::{BuildStep, CssModulesMode, ExportMode, MinifyOptions, OutputTarget, Stage, StageKind};

use std::path::PathBuf;

/// A structured fatal diagnostic from the compiler pipeline.
///
/// Carries the originating plugin/transform name and source location when
/// the pipeline can provide them, so the operator sees *where* a build
/// broke, not just that it did.
#[derive(Debug, Clone)]
pub struct CompileDiagnostic {
    pub message: String,
    pub plugin: Option<String>,
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    /// A short source excerpt around the failure.
    pub frame: Option<String>,
}

impl CompileDiagnostic {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            plugin: None,
            file: None,
            line: None,
            column: None,
            frame: None,
        }
    }
}

impl std::fmt::Display for CompileDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(plugin) = &self.plugin {
            write!(f, "[{plugin}] ")?;
        }
        write!(f, "{}", self.message)?;
        if let Some(file) = &self.file {
            write!(f, " ({}", file.display())?;
            if let (Some(line), Some(column)) = (self.line, self.column) {
                write!(f, ":{line}:{column}")?;
            }
            write!(f, ")")?;
        }
        if let Some(frame) = &self.frame {
            write!(f, "\n{frame}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileDiagnostic {}

/// Error type for plan assembly and orchestration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No entry module could be discovered; reported, not panicked, but an
    /// unsuccessful build for exit-code purposes.
    #[error("no entry module found")]
    NoEntry,

    /// Fatal error from the compiler pipeline; aborts remaining steps.
    #[error("{0}")]
    Compile(#[from] CompileDiagnostic),

    /// Configuration resolution failed (bad CLI values).
    #[error(transparent)]
    Config(#[from] zeropack_config::ConfigError),

    /// I/O failure during the compile/write phase. Setup-time I/O problems
    /// degrade to defaults instead of surfacing here.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File watcher setup failed.
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
