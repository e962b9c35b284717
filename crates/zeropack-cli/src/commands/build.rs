//! Build command implementation.

use std::sync::Arc;
use std::time::Instant;

use serde_json::json;

use crate::cli::BuildArgs;
use crate::error::Result;
use crate::ui;
use zeropack_bundler::{Orchestrator, PassthroughCompiler};
use zeropack_config::Project;

/// Execute a one-shot build.
///
/// 1. Merge CLI arguments into build options
/// 2. Resolve the project (manifest, entries, output paths)
/// 3. Run the orchestrator over the assembled steps
/// 4. Print the size summary (or `--raw` JSON on stdout)
pub async fn execute(args: BuildArgs) -> Result<()> {
    let start = Instant::now();

    let options = super::build_options(&args, false)?;
    let project = Project::resolve(options)?;
    tracing::debug!(
        entries = project.entries.len(),
        output = %project.output.display(),
        "project resolved"
    );

    if !project.has_manifest {
        ui::warning(&format!(
            "no package.json found in {}; using defaults",
            project.cwd.display()
        ));
    }

    let orchestrator = Orchestrator::new(Arc::new(PassthroughCompiler));
    let report = orchestrator.run(&project).await?;

    for warning in &report.warnings {
        ui::warning(warning);
    }

    if args.raw {
        let payload = json!({
            "name": report.package_name,
            "outputDir": report.output_dir,
            "artifacts": report
                .artifacts
                .iter()
                .map(|a| {
                    json!({
                        "file": a.file,
                        "size": a.raw,
                        "gzip": a.gzip,
                    })
                })
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        ui::print_build_report(&report, &project.cwd);
    }

    ui::success(&format!(
        "Built in {}",
        ui::format_duration(start.elapsed())
    ));
    Ok(())
}
