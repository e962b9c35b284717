//! Build reporting.
//!
//! Collects the artifacts a build produced with their raw and gzipped
//! sizes, so the CLI can print the familiar per-bundle size summary.

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

/// Size measurements for one emitted file.
#[derive(Debug, Clone)]
pub struct ArtifactSize {
    /// Output path, relative to the package root where possible.
    pub file: PathBuf,
    pub raw: u64,
    pub gzip: u64,
}

/// Summary of one completed build.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub package_name: String,
    /// Directory the summary header points at.
    pub output_dir: PathBuf,
    pub artifacts: Vec<ArtifactSize>,
    pub warnings: Vec<String>,
}

impl BuildReport {
    pub fn record(&mut self, cwd: &Path, file: &Path, code: &str) {
        let rel = file.strip_prefix(cwd).unwrap_or(file).to_path_buf();
        self.artifacts.push(ArtifactSize {
            file: rel,
            raw: code.len() as u64,
            gzip: gzip_size(code.as_bytes()),
        });
    }
}

/// Size of `bytes` after gzip at the default level, matching what a
/// typical server would send on the wire.
pub fn gzip_size(bytes: &[u8]) -> u64 {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    // Writing to a Vec cannot fail.
    let _ = encoder.write_all(bytes);
    encoder.finish().map(|v| v.len() as u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gzip_size_is_smaller_for_repetitive_input() {
        let input = "export default 1;\n".repeat(200);
        let gz = gzip_size(input.as_bytes());
        assert!(gz > 0);
        assert!(gz < input.len() as u64);
    }

    #[test]
    fn record_relativizes_paths() {
        let mut report = BuildReport::default();
        report.record(
            Path::new("/pkg"),
            Path::new("/pkg/dist/index.js"),
            "export default 1;",
        );
        assert_eq!(report.artifacts[0].file, PathBuf::from("dist/index.js"));
        assert_eq!(report.artifacts[0].raw, 17);
    }
}
