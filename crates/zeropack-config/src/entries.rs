//! Entry-point discovery.
//!
//! Determines the set of source entry files for a build, either from
//! explicit CLI patterns or by manifest/directory convention.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::manifest::PackageManifest;
use crate::options::BuildOptions;

/// Resolve the build's entry modules.
///
/// Explicit patterns are expanded as filesystem globs relative to `cwd`,
/// preserving pattern order. Without explicit patterns the fallback chain
/// is: manifest `source` field, `src/index.{ts,tsx,js}` when a `src`
/// directory exists, `index.{ts,tsx,js}`, then the manifest `module` field.
/// Resolved directories gain an `index.js` suffix, and duplicates are
/// dropped while preserving first-seen order.
///
/// An empty result is valid; the orchestrator reports it as "no entry
/// module found" rather than failing here.
pub fn resolve(
    options: &BuildOptions,
    manifest: &PackageManifest,
    cwd: &Path,
) -> Result<Vec<PathBuf>> {
    let patterns = if !options.entries.is_empty() {
        options.entries.clone()
    } else {
        conventional_patterns(manifest, cwd)
    };

    let mut entries: Vec<PathBuf> = Vec::new();
    for pattern in &patterns {
        for path in expand(pattern, cwd)? {
            let path = if path.is_dir() { path.join("index.js") } else { path };
            if !entries.contains(&path) {
                entries.push(path);
            }
        }
    }

    debug!("resolved {} entry module(s)", entries.len());
    Ok(entries)
}

fn conventional_patterns(manifest: &PackageManifest, cwd: &Path) -> Vec<String> {
    let source = manifest.source_entries();
    if !source.is_empty() {
        return source;
    }
    if cwd.join("src").is_dir() {
        if let Some(found) = existing_js_or_ts(cwd, "src/index") {
            return vec![found];
        }
    }
    if let Some(found) = existing_js_or_ts(cwd, "index") {
        return vec![found];
    }
    if let Some(module) = &manifest.module {
        return vec![module.clone()];
    }
    Vec::new()
}

/// Probe `{stem}.ts`, `{stem}.tsx`, `{stem}.js` in that priority and return
/// the first that exists on disk.
fn existing_js_or_ts(cwd: &Path, stem: &str) -> Option<String> {
    ["ts", "tsx", "js"]
        .iter()
        .map(|ext| format!("{stem}.{ext}"))
        .find(|candidate| cwd.join(candidate).is_file())
}

fn expand(pattern: &str, cwd: &Path) -> Result<Vec<PathBuf>> {
    let absolute = if Path::new(pattern).is_absolute() {
        PathBuf::from(pattern)
    } else {
        cwd.join(pattern)
    };

    let matches = glob::glob(&absolute.to_string_lossy()).map_err(|source| {
        ConfigError::BadPattern {
            pattern: pattern.to_string(),
            source,
        }
    })?;

    Ok(matches.filter_map(|m| m.ok()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export default 1;\n").unwrap();
    }

    #[test]
    fn explicit_patterns_win_over_conventions() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/index.js"));
        touch(&dir.path().join("src/other.js"));

        let options = BuildOptions {
            entries: vec!["src/other.js".to_string()],
            ..Default::default()
        };
        let entries = resolve(&options, &PackageManifest::default(), dir.path()).unwrap();
        assert_eq!(entries, vec![dir.path().join("src/other.js")]);
    }

    #[test]
    fn glob_patterns_expand_in_order() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/a.js"));
        touch(&dir.path().join("src/b.js"));

        let options = BuildOptions {
            entries: vec!["src/*.js".to_string()],
            ..Default::default()
        };
        let entries = resolve(&options, &PackageManifest::default(), dir.path()).unwrap();
        assert_eq!(
            entries,
            vec![dir.path().join("src/a.js"), dir.path().join("src/b.js")]
        );
    }

    #[test]
    fn source_field_beats_directory_convention() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/index.js"));
        touch(&dir.path().join("lib/main.js"));

        let mut manifest = PackageManifest::default();
        manifest.source = Some(serde_json::json!("lib/main.js"));

        let entries = resolve(&BuildOptions::default(), &manifest, dir.path()).unwrap();
        assert_eq!(entries, vec![dir.path().join("lib/main.js")]);
    }

    #[test]
    fn src_index_prefers_typescript() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/index.ts"));
        touch(&dir.path().join("src/index.js"));

        let entries =
            resolve(&BuildOptions::default(), &PackageManifest::default(), dir.path()).unwrap();
        assert_eq!(entries, vec![dir.path().join("src/index.ts")]);
    }

    #[test]
    fn falls_back_to_root_index_then_module_field() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("index.js"));

        let entries =
            resolve(&BuildOptions::default(), &PackageManifest::default(), dir.path()).unwrap();
        assert_eq!(entries, vec![dir.path().join("index.js")]);

        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("lib/mod.esm.js"));
        let mut manifest = PackageManifest::default();
        manifest.module = Some("lib/mod.esm.js".to_string());

        let entries = resolve(&BuildOptions::default(), &manifest, dir.path()).unwrap();
        assert_eq!(entries, vec![dir.path().join("lib/mod.esm.js")]);
    }

    #[test]
    fn directories_gain_an_index_suffix() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/index.js"));

        let options = BuildOptions {
            entries: vec!["src".to_string()],
            ..Default::default()
        };
        let entries = resolve(&options, &PackageManifest::default(), dir.path()).unwrap();
        assert_eq!(entries, vec![dir.path().join("src/index.js")]);
    }

    #[test]
    fn duplicates_are_dropped_preserving_order() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("src/a.js"));

        let options = BuildOptions {
            entries: vec!["src/a.js".to_string(), "src/*.js".to_string()],
            ..Default::default()
        };
        let entries = resolve(&options, &PackageManifest::default(), dir.path()).unwrap();
        assert_eq!(entries, vec![dir.path().join("src/a.js")]);
    }

    #[test]
    fn zero_entries_is_a_valid_result() {
        let dir = TempDir::new().unwrap();
        let entries =
            resolve(&BuildOptions::default(), &PackageManifest::default(), dir.path()).unwrap();
        assert!(entries.is_empty());
    }
}
