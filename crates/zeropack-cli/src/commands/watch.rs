//! Watch command implementation.

use std::sync::Arc;

use crate::cli::WatchArgs;
use crate::error::Result;
use crate::ui;
use zeropack_bundler::{Orchestrator, PassthroughCompiler, WatchEvent};
use zeropack_config::Project;

/// Execute a watch session: initial build, then rebuild on every source
/// change until Ctrl-C.
pub async fn execute(args: WatchArgs) -> Result<()> {
    let options = super::build_options(&args.build, true)?;
    let project = Project::resolve(options)?;

    if !project.has_manifest {
        ui::warning(&format!(
            "no package.json found in {}; using defaults",
            project.cwd.display()
        ));
    }

    let cwd = project.cwd.clone();
    ui::info(&format!("Watching {} for changes...", cwd.display()));

    let orchestrator = Orchestrator::new(Arc::new(PassthroughCompiler));
    let (handle, mut events) = orchestrator.watch(project)?;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(WatchEvent::Changed(path)) => {
                    let rel = path.strip_prefix(&cwd).unwrap_or(&path);
                    ui::info(&format!("Changed: {}", rel.display()));
                }
                Some(WatchEvent::Completed(report)) => {
                    for warning in &report.warnings {
                        ui::warning(warning);
                    }
                    ui::print_build_report(&report, &cwd);
                }
                Some(WatchEvent::Failed(message)) => {
                    // Stay alive; the next save may fix it.
                    ui::error(&message);
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                ui::info("Stopping watch mode");
                break;
            }
        }
    }

    handle.stop();
    Ok(())
}
