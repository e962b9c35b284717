//! Package manifest model and never-failing loader.
//!
//! The manifest (`package.json`) is the primary configuration source for a
//! zero-config build. Loading never fails: a missing or unparseable file
//! degrades to a synthetic manifest named after the containing directory,
//! and the caller is told whether a real file was found so it can decide
//! whether to warn the operator.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Parsed `package.json`, restricted to the fields the resolver consumes.
///
/// Unknown fields are ignored. Fields whose shape varies across the
/// ecosystem (`exports`, `minify`, `mangle`, `syntax`) are kept as raw JSON
/// and interpreted through accessor methods so that one exotic field never
/// invalidates the whole manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: String,
    pub main: Option<String>,
    pub module: Option<String>,
    #[serde(rename = "jsnext:main")]
    pub jsnext_main: Option<String>,
    #[serde(rename = "cjs:main")]
    pub cjs_main: Option<String>,
    #[serde(rename = "umd:main")]
    pub umd_main: Option<String>,
    pub unpkg: Option<String>,
    pub esmodule: Option<String>,
    pub syntax: Option<Value>,
    pub exports: Option<Value>,
    #[serde(rename = "type")]
    pub module_type: Option<String>,
    pub source: Option<Value>,
    pub dependencies: IndexMap<String, String>,
    pub peer_dependencies: IndexMap<String, String>,
    pub minify: Option<Value>,
    pub mangle: Option<Value>,
    pub amd_name: Option<String>,
    pub types: Option<String>,
    pub typings: Option<String>,
}

/// Property-mangling configuration from the manifest `minify`/`mangle` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(default)]
pub struct MangleConfig {
    /// Only mangle property names matching this pattern.
    pub regex: Option<String>,
    /// Property names that must never be mangled.
    pub reserved: Vec<String>,
}

impl PackageManifest {
    /// Whether the package declares `"type": "module"`.
    pub fn is_module_type(&self) -> bool {
        self.module_type.as_deref() == Some("module")
    }

    /// `syntax.esmodules`, when present and a string.
    pub fn syntax_esmodules(&self) -> Option<&str> {
        self.syntax.as_ref()?.get("esmodules")?.as_str()
    }

    /// The `source` field as an ordered list of entry paths.
    pub fn source_entries(&self) -> Vec<String> {
        match &self.source {
            Some(Value::String(s)) => vec![s.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Mangle configuration, honoring the `minify` field with the legacy
    /// `mangle` field as a fallback. `true` enables mangling with defaults;
    /// anything unrecognized disables it.
    pub fn mangle_config(&self) -> Option<MangleConfig> {
        let value = self.minify.as_ref().or(self.mangle.as_ref())?;
        match value {
            Value::Bool(true) => Some(MangleConfig::default()),
            Value::Object(_) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }
}

/// Read the manifest at `{cwd}/package.json`.
///
/// Returns the manifest and whether a manifest file was actually found.
/// All read and parse failures are converted into the "absent" case with a
/// synthesized name, so this never fails and never aborts a build.
pub fn load(cwd: &Path) -> (PackageManifest, bool) {
    let path = cwd.join("package.json");
    let fallback_name = || {
        cwd.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "package".to_string())
    };

    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(
                "no package.json found, assuming a package name of {:?}",
                fallback_name()
            );
            if err.kind() != std::io::ErrorKind::NotFound {
                debug!("reading {} failed: {err}", path.display());
            }
            return (
                PackageManifest {
                    name: fallback_name(),
                    ..Default::default()
                },
                false,
            );
        }
    };

    let mut manifest: PackageManifest = match serde_json::from_str(&raw) {
        Ok(manifest) => manifest,
        Err(err) => {
            warn!(
                "failed to parse package.json ({err}), assuming a package name of {:?}",
                fallback_name()
            );
            return (
                PackageManifest {
                    name: fallback_name(),
                    ..Default::default()
                },
                false,
            );
        }
    };

    if manifest.name.is_empty() {
        manifest.name = fallback_name();
        warn!(
            "missing package.json \"name\" field, assuming {:?}",
            manifest.name
        );
    }

    (manifest, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_reads_recognized_fields() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{
                "name": "mod",
                "main": "./dist/mod.js",
                "module": "./dist/mod.mjs",
                "umd:main": "./dist/mod.umd.js",
                "type": "module",
                "peerDependencies": { "react": "^18" },
                "amdName": "Mod"
            }"#,
        )
        .unwrap();

        let (manifest, found) = load(dir.path());
        assert!(found);
        assert_eq!(manifest.name, "mod");
        assert_eq!(manifest.main.as_deref(), Some("./dist/mod.js"));
        assert_eq!(manifest.umd_main.as_deref(), Some("./dist/mod.umd.js"));
        assert!(manifest.is_module_type());
        assert!(manifest.peer_dependencies.contains_key("react"));
        assert_eq!(manifest.amd_name.as_deref(), Some("Mod"));
    }

    #[test]
    fn load_synthesizes_name_from_directory() {
        let dir = TempDir::new().unwrap();
        let proj = dir.path().join("proj");
        fs::create_dir(&proj).unwrap();

        let (manifest, found) = load(&proj);
        assert!(!found);
        assert_eq!(manifest.name, "proj");
    }

    #[test]
    fn load_recovers_from_invalid_json() {
        let dir = TempDir::new().unwrap();
        let proj = dir.path().join("broken");
        fs::create_dir(&proj).unwrap();
        fs::write(proj.join("package.json"), "{ not json").unwrap();

        let (manifest, found) = load(&proj);
        assert!(!found);
        assert_eq!(manifest.name, "broken");
    }

    #[test]
    fn load_fills_in_missing_name() {
        let dir = TempDir::new().unwrap();
        let proj = dir.path().join("unnamed");
        fs::create_dir(&proj).unwrap();
        fs::write(proj.join("package.json"), r#"{"main": "index.js"}"#).unwrap();

        let (manifest, found) = load(&proj);
        assert!(found);
        assert_eq!(manifest.name, "unnamed");
    }

    #[test]
    fn mangle_config_accepts_bool_and_object() {
        let mut manifest = PackageManifest::default();
        assert_eq!(manifest.mangle_config(), None);

        manifest.mangle = Some(serde_json::json!(true));
        assert_eq!(manifest.mangle_config(), Some(MangleConfig::default()));

        manifest.minify = Some(serde_json::json!({ "regex": "^_", "reserved": ["__html"] }));
        let config = manifest.mangle_config().unwrap();
        assert_eq!(config.regex.as_deref(), Some("^_"));
        assert_eq!(config.reserved, vec!["__html".to_string()]);
    }

    #[test]
    fn source_entries_accepts_string_and_list() {
        let mut manifest = PackageManifest::default();
        manifest.source = Some(serde_json::json!("src/index.js"));
        assert_eq!(manifest.source_entries(), vec!["src/index.js".to_string()]);

        manifest.source = Some(serde_json::json!(["src/a.js", "src/b.js"]));
        assert_eq!(manifest.source_entries().len(), 2);
    }
}
