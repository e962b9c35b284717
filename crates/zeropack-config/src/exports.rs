//! Conditional `exports` map modeling and resolution.
//!
//! The manifest `exports` field selects an output path per resolution
//! condition (`import`, `require`, `umd`, ...) and per subpath (`.`,
//! `./utils`, ...). Values nest arbitrarily: a string leaf, an ordered
//! fallback array, or a condition/subpath object. Unlike Node's runtime
//! resolution, the *caller's* condition list defines precedence here: the
//! first condition that yields a matching leaf wins.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

/// Self-referential manifests must not loop; real maps are a few levels deep.
const MAX_DEPTH: usize = 32;

/// An `exports` map value as a tagged structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportsField {
    /// A concrete output path.
    Leaf(String),
    /// An ordered fallback list; the first entry that resolves wins.
    Fallback(Vec<ExportsField>),
    /// A condition or subpath map, in declaration order.
    Conditional(IndexMap<String, ExportsField>),
}

impl ExportsField {
    /// Convert the raw JSON field into the tagged form.
    ///
    /// `null`, booleans, and numbers are not valid exports values and are
    /// dropped; inside fallback arrays that simply skips them.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(ExportsField::Leaf(s.clone())),
            Value::Array(items) => Some(ExportsField::Fallback(
                items.iter().filter_map(ExportsField::from_value).collect(),
            )),
            Value::Object(map) => Some(ExportsField::Conditional(
                map.iter()
                    .filter_map(|(k, v)| ExportsField::from_value(v).map(|f| (k.clone(), f)))
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Resolve an output path for `export_path` using an ordered condition
    /// list, optionally filtering `default`-condition leaves by an expected
    /// filename pattern.
    pub fn walk(
        &self,
        export_path: &str,
        conditions: &[&str],
        default_pattern: Option<&Regex>,
    ) -> Option<String> {
        self.walk_inner(export_path, conditions, default_pattern, "default", 0)
    }

    fn walk_inner(
        &self,
        export_path: &str,
        conditions: &[&str],
        default_pattern: Option<&Regex>,
        condition: &str,
        depth: usize,
    ) -> Option<String> {
        if depth > MAX_DEPTH {
            warn!("exports map nests deeper than {MAX_DEPTH} levels, giving up");
            return None;
        }
        match self {
            ExportsField::Leaf(path) => {
                if condition == "default" {
                    if let Some(pattern) = default_pattern {
                        if !pattern.is_match(path) {
                            return None;
                        }
                    }
                }
                Some(path.clone())
            }
            ExportsField::Fallback(items) => items.iter().find_map(|item| {
                item.walk_inner(export_path, conditions, default_pattern, condition, depth + 1)
            }),
            ExportsField::Conditional(map) => {
                if let Some(subpath) = map.get(export_path) {
                    if let Some(found) = subpath.walk_inner(
                        export_path,
                        conditions,
                        default_pattern,
                        condition,
                        depth + 1,
                    ) {
                        return Some(found);
                    }
                }
                for condition in conditions.iter().copied() {
                    let Some(value) = map.get(condition) else {
                        continue;
                    };
                    if let Some(found) = value.walk_inner(
                        export_path,
                        conditions,
                        default_pattern,
                        condition,
                        depth + 1,
                    ) {
                        return Some(found);
                    }
                }
                None
            }
        }
    }
}

/// Walk a raw JSON `exports` field. Returns `None` for absent or malformed
/// maps; resolution then falls through to legacy manifest fields.
pub fn walk(
    exports: Option<&Value>,
    export_path: &str,
    conditions: &[&str],
    default_pattern: Option<&Regex>,
) -> Option<String> {
    ExportsField::from_value(exports?)?.walk(export_path, conditions, default_pattern)
}
