//! Formatting utilities for sizes, durations, and the build summary.

use std::time::Duration;

use owo_colors::OwoColorize;
use zeropack_bundler::BuildReport;

/// Format a byte count in the most readable unit (B, KB, MB, GB).
///
/// ```
/// use zeropack_cli::ui::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(500), "500 B");
/// assert_eq!(format_size(1024), "1.00 KB");
/// assert_eq!(format_size(1_048_576), "1.00 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_idx = 0;
    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", size as u64, UNITS[unit_idx])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Format a duration in the most readable unit (ms, s, m:s).
///
/// ```
/// use std::time::Duration;
/// use zeropack_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Print the per-artifact size summary to stderr.
///
/// ```text
/// Build "demo-lib" to dist:
///     1.2 KB: demo-lib.js.gz
///     1.1 KB: demo-lib.module.js.gz
/// ```
pub fn print_build_report(report: &BuildReport, cwd: &std::path::Path) {
    let dir = report
        .output_dir
        .strip_prefix(cwd)
        .unwrap_or(&report.output_dir);
    eprintln!(
        "Build {} to {}:",
        format!("\"{}\"", report.package_name).cyan(),
        dir.display().to_string().cyan()
    );

    let width = report
        .artifacts
        .iter()
        .map(|a| format_size(a.gzip).len())
        .max()
        .unwrap_or(0);
    for artifact in &report.artifacts {
        let name = artifact
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| artifact.file.display().to_string());
        // Pad before coloring so the ANSI codes do not skew alignment.
        let size = format!("{:>pad$}", format_size(artifact.gzip), pad = width + 4);
        eprintln!("{}: {}.gz", size.green().bold(), name);
    }
}
