//! External-module policy.
//!
//! Decides, per import specifier, whether a module is bundled or left as a
//! runtime dependency. Package names cover their whole subpath space
//! (`lodash` externalizes `lodash/fp` too); custom patterns from
//! `--external` are anchored the same way.

use std::path::{Path, PathBuf};

use regex::Regex;
use zeropack_config::{ExternalPattern, Target};

/// Builtins that are external on every target. Bundling these never works
/// in any runtime, so the policy does not wait for `--target node`.
const ALWAYS_EXTERNAL_BUILTINS: &[&str] = &["dns", "fs", "path", "url"];

/// The remaining node builtins, external when targeting node.
const NODE_BUILTINS: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "domain",
    "events",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "util",
    "v8",
    "vm",
    "worker_threads",
    "zlib",
];

enum Matcher {
    /// Exact package name; also matches `name/<subpath>`.
    Name(String),
    /// User pattern, matched against the whole specifier with an implicit
    /// `(end | "/")` suffix so `foo` covers `foo/bar`.
    Pattern(Regex),
}

/// Compiled external policy for one build step.
#[derive(Default)]
pub struct ExternalPolicy {
    matchers: Vec<Matcher>,
    node_target: bool,
    /// Relative imports that resolve to sibling entry modules stay external
    /// so multi-entry builds do not duplicate shared code.
    sibling_entries: Vec<PathBuf>,
    /// `import "."` is external in multi-entry builds (it resolves to a
    /// sibling artifact), and `"."` itself shows up as a specifier there.
    dot_external: bool,
    /// Whether the node_modules resolver should run at all. Off by
    /// default: unlisted bare imports are an error surfaced by the
    /// compiler, not silently bundled.
    pub resolve_node_modules: bool,
}

impl ExternalPolicy {
    /// Builds the policy from parsed `--external` patterns.
    ///
    /// `resolve_node_modules` is enabled when the user took explicit
    /// control of externals (`--external none` or an explicit list);
    /// in the default dependencies-are-external mode nothing needs
    /// resolving out of `node_modules`.
    pub fn new(
        patterns: &[ExternalPattern],
        target: Target,
        explicit: bool,
    ) -> Self {
        let matchers = patterns
            .iter()
            .map(|pattern| match pattern {
                ExternalPattern::Name(name) => Matcher::Name(name.clone()),
                ExternalPattern::Pattern(re) => {
                    // Recompile with the subpath-aware anchor; the inner
                    // pattern was already validated at parse time.
                    let anchored = format!("^(?:{})($|/)", re.as_str());
                    Matcher::Pattern(
                        Regex::new(&anchored).unwrap_or_else(|_| re.clone()),
                    )
                }
            })
            .collect();
        Self {
            matchers,
            node_target: target == Target::Node,
            sibling_entries: Vec::new(),
            dot_external: false,
            resolve_node_modules: explicit,
        }
    }

    /// Registers the other entry modules of a multi-entry build.
    pub fn with_siblings(mut self, siblings: Vec<PathBuf>) -> Self {
        self.dot_external = !self.sibling_entries.is_empty() || !siblings.is_empty();
        self.sibling_entries = siblings;
        self
    }

    /// Whether `specifier`, imported from `importer`, stays external.
    pub fn is_external(&self, specifier: &str, importer: Option<&Path>) -> bool {
        if self.dot_external && specifier == "." {
            return true;
        }
        if specifier.starts_with('.') || specifier.starts_with('/') {
            return self.is_sibling(specifier, importer);
        }
        let bare = specifier.strip_prefix("node:").unwrap_or(specifier);
        let builtin = package_name(bare);
        if ALWAYS_EXTERNAL_BUILTINS.contains(&builtin) {
            return true;
        }
        if self.node_target && NODE_BUILTINS.contains(&builtin) {
            return true;
        }
        self.matchers.iter().any(|matcher| match matcher {
            Matcher::Name(name) => {
                specifier == name
                    || specifier
                        .strip_prefix(name.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            Matcher::Pattern(re) => re.is_match(specifier),
        })
    }

    fn is_sibling(&self, specifier: &str, importer: Option<&Path>) -> bool {
        let Some(importer) = importer else {
            return false;
        };
        let Some(dir) = importer.parent() else {
            return false;
        };
        let resolved = path_clean::clean(dir.join(specifier));
        self.sibling_entries.iter().any(|entry| {
            entry == &resolved
                || entry.with_extension("") == resolved.with_extension("")
        })
    }
}

impl std::fmt::Debug for ExternalPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self
            .matchers
            .iter()
            .map(|matcher| match matcher {
                Matcher::Name(name) => name.clone(),
                Matcher::Pattern(re) => format!("/{}/", re.as_str()),
            })
            .collect();
        f.debug_struct("ExternalPolicy")
            .field("matchers", &names)
            .field("node_target", &self.node_target)
            .field("siblings", &self.sibling_entries.len())
            .field("resolve_node_modules", &self.resolve_node_modules)
            .finish()
    }
}

impl Clone for ExternalPolicy {
    fn clone(&self) -> Self {
        Self {
            matchers: self
                .matchers
                .iter()
                .map(|matcher| match matcher {
                    Matcher::Name(name) => Matcher::Name(name.clone()),
                    Matcher::Pattern(re) => Matcher::Pattern(re.clone()),
                })
                .collect(),
            node_target: self.node_target,
            sibling_entries: self.sibling_entries.clone(),
            dot_external: self.dot_external,
            resolve_node_modules: self.resolve_node_modules,
        }
    }
}

/// First path segment of a bare specifier (scope-aware).
fn package_name(specifier: &str) -> &str {
    if let Some(rest) = specifier.strip_prefix('@') {
        // `@scope/name`: the package name spans two segments.
        let mut slashes = rest.match_indices('/');
        if let (Some(_), Some((second, _))) = (slashes.next(), slashes.next()) {
            return &specifier[..second + 1];
        }
        return specifier;
    }
    specifier.split('/').next().unwrap_or(specifier)
}
