//! File system watcher with debouncing for watch mode.
//!
//! Watches the package directory and filters changes down to source files,
//! ignoring node_modules, the output directory, and hidden paths.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::Result;

/// File change event type.
#[derive(Debug, Clone)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    /// The path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// Recursive directory watcher with per-path debouncing.
///
/// Changes are sent through a channel; rapid successive events on the same
/// file inside the debounce window are dropped so one save does not fan
/// out into several rebuilds.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    pub fn new(
        root: PathBuf,
        ignore_paths: Vec<PathBuf>,
        debounce_ms: u64,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        let (tx, rx) = mpsc::channel(100);

        let debounce = Duration::from_millis(debounce_ms);
        let mut last_event: Option<(PathBuf, Instant)> = None;
        let root_for_handler = root.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                for path in &event.paths {
                    if Self::should_ignore(path, &root_for_handler, &ignore_paths) {
                        continue;
                    }

                    let now = Instant::now();
                    if let Some((last_path, last_time)) = &last_event {
                        if last_path == path && now.duration_since(*last_time) < debounce {
                            continue;
                        }
                    }
                    last_event = Some((path.clone(), now));

                    let change = match event.kind {
                        notify::EventKind::Create(_) => FileChange::Created(path.clone()),
                        notify::EventKind::Modify(_) => FileChange::Modified(path.clone()),
                        notify::EventKind::Remove(_) => FileChange::Removed(path.clone()),
                        _ => continue,
                    };

                    let _ = tx.blocking_send(change);
                }
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    fn should_ignore(path: &Path, root: &Path, ignore_paths: &[PathBuf]) -> bool {
        // Only react to paths inside the watched root.
        let Ok(rel) = path.strip_prefix(root) else {
            return true;
        };

        if ignore_paths.iter().any(|ignored| path.starts_with(ignored)) {
            return true;
        }

        for component in rel.components() {
            if let Some(name) = component.as_os_str().to_str() {
                if name == "node_modules" {
                    return true;
                }
                if name.starts_with('.') && name != "." && name != ".." {
                    return true;
                }
            }
        }

        false
    }

    /// The root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_node_modules() {
        let root = PathBuf::from("/pkg");
        let path = PathBuf::from("/pkg/node_modules/dep/index.js");
        assert!(FileWatcher::should_ignore(&path, &root, &[]));
        assert!(!FileWatcher::should_ignore(
            &PathBuf::from("/pkg/src/index.js"),
            &root,
            &[]
        ));
    }

    #[test]
    fn ignores_output_directory() {
        let root = PathBuf::from("/pkg");
        let ignore = vec![PathBuf::from("/pkg/dist")];
        assert!(FileWatcher::should_ignore(
            &PathBuf::from("/pkg/dist/index.js"),
            &root,
            &ignore
        ));
        assert!(!FileWatcher::should_ignore(
            &PathBuf::from("/pkg/src/index.js"),
            &root,
            &ignore
        ));
    }

    #[test]
    fn ignores_single_file_entries_like_the_name_cache() {
        let root = PathBuf::from("/pkg");
        let ignore = vec![PathBuf::from("/pkg/mangle.json")];
        assert!(FileWatcher::should_ignore(
            &PathBuf::from("/pkg/mangle.json"),
            &root,
            &ignore
        ));
        assert!(!FileWatcher::should_ignore(
            &PathBuf::from("/pkg/package.json"),
            &root,
            &ignore
        ));
    }

    #[test]
    fn ignores_hidden_paths_and_outside_root() {
        let root = PathBuf::from("/pkg");
        assert!(FileWatcher::should_ignore(
            &PathBuf::from("/pkg/.git/config"),
            &root,
            &[]
        ));
        assert!(FileWatcher::should_ignore(
            &PathBuf::from("/elsewhere/file.js"),
            &root,
            &[]
        ));
    }

    #[test]
    fn file_change_exposes_path() {
        let path = PathBuf::from("/pkg/src/index.js");
        assert_eq!(FileChange::Modified(path.clone()).path(), path.as_path());
        assert_eq!(FileChange::Removed(path.clone()).path(), path.as_path());
    }
}
