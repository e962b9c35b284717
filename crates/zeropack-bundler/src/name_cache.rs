//! Minifier name-cache persistence.
//!
//! Property mangling must pick the same short names across every output
//! format and across rebuilds, or consumers mixing formats see mismatched
//! property names. The cache lives in `mangle.json` next to the manifest
//! (an alternate `.mangle.json` is honored when present) and is loaded
//! once per build, fed into every minifying step, and written back from
//! the primary step's result.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

const CACHE_FILES: &[&str] = &["mangle.json", ".mangle.json"];

/// Locates the name-cache file for a package root.
///
/// Prefers an existing file; defaults to `mangle.json` when neither
/// candidate exists yet.
pub fn cache_path(cwd: &Path) -> PathBuf {
    for name in CACHE_FILES {
        let candidate = cwd.join(name);
        if candidate.is_file() {
            return candidate;
        }
    }
    cwd.join(CACHE_FILES[0])
}

/// Loads the name cache. Missing or malformed files degrade to `None`
/// rather than failing the build.
pub fn load(cwd: &Path) -> Option<Value> {
    let path = cache_path(cwd);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(_) => return None,
    };
    match serde_json::from_str::<Value>(&text) {
        Ok(value) => {
            debug!(path = %path.display(), "loaded minifier name cache");
            Some(value)
        }
        Err(err) => {
            warn!(path = %path.display(), %err, "ignoring unreadable name cache");
            None
        }
    }
}

/// Persists the merged name cache. Write failures are reported as
/// warnings; a failed cache write never fails the build.
pub fn store(cwd: &Path, value: &Value) {
    let path = cache_path(cwd);
    let text = match serde_json::to_string_pretty(value) {
        Ok(text) => text,
        Err(err) => {
            warn!(%err, "could not serialize name cache");
            return;
        }
    };
    if let Err(err) = std::fs::write(&path, text) {
        warn!(path = %path.display(), %err, "could not write name cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn missing_cache_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(load(dir.path()).is_none());
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let cache = json!({"props": {"props": {"$_state": "a"}}});
        store(dir.path(), &cache);
        assert_eq!(load(dir.path()), Some(cache));
    }

    #[test]
    fn dotfile_variant_is_preferred_when_present() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".mangle.json"), "{}").unwrap();
        assert_eq!(cache_path(dir.path()), dir.path().join(".mangle.json"));
    }

    #[test]
    fn malformed_cache_is_ignored() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("mangle.json"), "{not json").unwrap();
        assert!(load(dir.path()).is_none());
    }
}
