//! Build orchestration.
//!
//! Runs assembled steps through the compiler sequentially, threading the
//! module cache from each step into the next so shared modules parse once
//! per build. Modern steps run uncached because their parse settings
//! differ from the downleveled formats. Watch mode wraps the same run loop
//! behind a debounced file watcher.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::compiler::{Compiler, ModuleCache};
use crate::report::BuildReport;
use crate::watch::{FileChange, FileWatcher};
use crate::{assemble, name_cache, Error, Result};
use zeropack_config::{Format, Project};

/// Events emitted by a watch session.
#[derive(Debug)]
pub enum WatchEvent {
    /// A relevant file changed; a rebuild is starting.
    Changed(PathBuf),
    /// A rebuild finished successfully.
    Completed(BuildReport),
    /// A rebuild failed; the session stays alive for the next change.
    Failed(String),
}

/// Handle to a running watch session.
pub struct WatchHandle {
    shutdown: oneshot::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl WatchHandle {
    /// Stops the session and its watcher.
    pub fn stop(self) {
        let _ = self.shutdown.send(());
        self.task.abort();
    }
}

/// Drives assembled build steps through a [`Compiler`].
pub struct Orchestrator {
    compiler: Arc<dyn Compiler>,
}

impl Orchestrator {
    pub fn new(compiler: Arc<dyn Compiler>) -> Self {
        Self { compiler }
    }

    /// Runs one full build: assemble, compile each step in order, write
    /// artifacts, and persist the minifier name cache from the primary
    /// step.
    pub async fn run(&self, project: &Project) -> Result<BuildReport> {
        if project.entries.is_empty() {
            return Err(Error::NoEntry);
        }

        let steps = assemble::assemble(project)?;
        let mut report = BuildReport {
            package_name: project.package_name.clone(),
            output_dir: project.output_dir().to_path_buf(),
            artifacts: Vec::new(),
            warnings: Vec::new(),
        };

        let mut cache: Option<ModuleCache> = None;
        for step in &steps {
            let modern = step.format == Format::Modern;
            debug!(
                entry = %step.entry.display(),
                format = step.format.as_str(),
                cached = !modern && cache.is_some(),
                "compiling step"
            );

            let step_cache = if modern { None } else { cache.take() };
            let output = self.compiler.compile(step, step_cache).await?;
            if !modern {
                cache = output.cache;
            }

            for artifact in &output.artifacts {
                if let Some(parent) = artifact.file.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(&artifact.file, &artifact.code).await?;
                if step.output.sourcemap {
                    if let Some(map) = &artifact.map {
                        let map_file = sourcemap_path(&artifact.file);
                        tokio::fs::write(&map_file, map).await?;
                    }
                }
                report.record(&project.cwd, &artifact.file, &artifact.code);
            }

            if step.is_primary {
                if let Some(merged) = &output.name_cache {
                    name_cache::store(&project.cwd, merged);
                }
            }

            for warning in output.warnings {
                warn!("{warning}");
                report.warnings.push(warning);
            }
        }

        info!(
            package = %report.package_name,
            artifacts = report.artifacts.len(),
            "build complete"
        );
        Ok(report)
    }

    /// Starts a watch session for the project.
    ///
    /// The initial build runs immediately; afterwards each debounced file
    /// change re-resolves the project (so manifest edits take effect) and
    /// rebuilds the full step set. Events arrive on the returned channel.
    pub fn watch(
        &self,
        project: Project,
    ) -> Result<(WatchHandle, mpsc::Receiver<WatchEvent>)> {
        // The primary step writes mangle.json back into cwd; without the
        // ignore, every rebuild would trigger the next one.
        let (watcher, mut changes) = FileWatcher::new(
            project.cwd.clone(),
            vec![
                project.output_dir().to_path_buf(),
                name_cache::cache_path(&project.cwd),
            ],
            100,
        )?;

        let (events_tx, events_rx) = mpsc::channel(16);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let compiler = Arc::clone(&self.compiler);
        let options = project.options.clone();

        let task = tokio::spawn(async move {
            // Keep the watcher alive for the whole session.
            let _watcher = watcher;
            let orchestrator = Orchestrator::new(compiler);

            match orchestrator.run(&project).await {
                Ok(report) => {
                    let _ = events_tx.send(WatchEvent::Completed(report)).await;
                }
                Err(err) => {
                    let _ = events_tx.send(WatchEvent::Failed(err.to_string())).await;
                }
            }

            loop {
                let change = tokio::select! {
                    change = changes.recv() => match change {
                        Some(change) => change,
                        None => break,
                    },
                    _ = &mut shutdown_rx => break,
                };

                let path = change.path().to_path_buf();
                if !is_source_change(&change) {
                    continue;
                }
                if events_tx.send(WatchEvent::Changed(path)).await.is_err() {
                    break;
                }

                let event = match Project::resolve(options.clone()) {
                    Ok(project) => match orchestrator.run(&project).await {
                        Ok(report) => WatchEvent::Completed(report),
                        Err(err) => WatchEvent::Failed(err.to_string()),
                    },
                    Err(err) => WatchEvent::Failed(err.to_string()),
                };
                if events_tx.send(event).await.is_err() {
                    break;
                }
            }
        });

        Ok((
            WatchHandle {
                shutdown: shutdown_tx,
                task,
            },
            events_rx,
        ))
    }
}

/// Directory create/modify churn does not trigger builds. Removals always
/// do, since a removed path can no longer be stat'd to tell file from
/// directory.
fn is_source_change(change: &FileChange) -> bool {
    match change {
        FileChange::Removed(_) => true,
        FileChange::Created(path) | FileChange::Modified(path) => !path.is_dir(),
    }
}

fn sourcemap_path(file: &std::path::Path) -> PathBuf {
    let mut name = file.as_os_str().to_os_string();
    name.push(".map");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sourcemap_path_appends_suffix() {
        assert_eq!(
            sourcemap_path(std::path::Path::new("/p/dist/index.esm.js")),
            PathBuf::from("/p/dist/index.esm.js.map")
        );
    }
}
