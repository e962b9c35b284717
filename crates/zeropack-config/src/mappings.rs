//! Parsers for the mapping-style CLI arguments.
//!
//! `--globals`, `--define`, and `--alias` all share the
//! `key=value[,key=value...]` shape; `--external` is a comma-separated
//! pattern list with two magic values handled by the caller.

use indexmap::IndexMap;
use regex::Regex;

use crate::error::{ConfigError, Result};
use crate::manifest::PackageManifest;

/// One source-level substitution derived from `--define`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Define {
    /// The expression to search for.
    pub find: String,
    /// The replacement, already coerced to a literal or raw expression.
    pub replace: String,
}

/// One module-specifier rewrite derived from `--alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub find: String,
    pub replacement: String,
}

/// A single external-module matcher.
#[derive(Debug, Clone)]
pub enum ExternalPattern {
    /// A package name; also matches its subpaths (`name/...`).
    Name(String),
    /// A user-supplied regular expression from `--external`.
    Pattern(Regex),
}

/// Parse `$=jQuery,React=react` into ordered key/value pairs.
pub fn parse_mapping_argument(input: &str) -> Result<IndexMap<String, String>> {
    let mut map = IndexMap::new();
    for pair in input.split(',') {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| ConfigError::BadMapping(pair.to_string()))?;
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}

/// Parse `--define` pairs, coercing values the intuitive way:
///
/// - a quoted value is a string literal;
/// - an `@`-prefixed key replaces occurrences of an *expression* with the
///   raw value (`@assign=Object.assign`);
/// - `true`/`false` and integers stay literals (`--define A=1` produces
///   `1`, not `"1"`);
/// - anything else becomes a string literal.
pub fn parse_defines(input: &str) -> Result<Vec<Define>> {
    parse_mapping_argument(input)?
        .into_iter()
        .map(|(key, value)| Ok(to_replacement_expression(&key, &value)))
        .collect()
}

fn to_replacement_expression(key: &str, value: &str) -> Define {
    // --define A="1",B='true' produces a string literal.
    if value.len() >= 2 {
        let bytes = value.as_bytes();
        let quote = bytes[0];
        if (quote == b'"' || quote == b'\'') && bytes[bytes.len() - 1] == quote {
            let inner = &value[1..value.len() - 1];
            return Define {
                find: key.to_string(),
                replace: serde_json::to_string(inner).unwrap_or_default(),
            };
        }
    }

    // --define @assign=Object.assign replaces expressions with expressions.
    if let Some(expression) = key.strip_prefix('@') {
        return Define {
            find: expression.to_string(),
            replace: value.to_string(),
        };
    }

    // --define A=1,B=true produces int/boolean literals.
    let lowered = value.to_ascii_lowercase();
    let is_literal = lowered == "true"
        || lowered == "false"
        || (!value.is_empty() && value.chars().all(|c| c.is_ascii_digit()));
    if is_literal {
        return Define {
            find: key.to_string(),
            replace: value.to_string(),
        };
    }

    Define {
        find: key.to_string(),
        replace: serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Parse `--alias from=to,from=to` into ordered rewrites.
pub fn parse_aliases(input: &str) -> Result<Vec<Alias>> {
    Ok(parse_mapping_argument(input)?
        .into_iter()
        .map(|(find, replacement)| Alias { find, replacement })
        .collect())
}

/// Compute the external-module matcher set.
///
/// `Some("none")` bundles everything. An explicit pattern list adds the
/// package's peer dependencies plus each pattern compiled as a regular
/// expression. Unset externalizes peers plus all runtime dependencies.
pub fn parse_externals(
    external: Option<&str>,
    manifest: &PackageManifest,
) -> Result<Vec<ExternalPattern>> {
    let peers = manifest
        .peer_dependencies
        .keys()
        .cloned()
        .map(ExternalPattern::Name);

    match external {
        Some("none") => Ok(Vec::new()),
        Some(list) => {
            let mut patterns: Vec<ExternalPattern> = peers.collect();
            for raw in list.split(',') {
                let regex = Regex::new(raw).map_err(|source| ConfigError::BadExternal {
                    pattern: raw.to_string(),
                    source,
                })?;
                patterns.push(ExternalPattern::Pattern(regex));
            }
            Ok(patterns)
        }
        None => Ok(peers
            .chain(
                manifest
                    .dependencies
                    .keys()
                    .cloned()
                    .map(ExternalPattern::Name),
            )
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_argument_preserves_order() {
        let map = parse_mapping_argument("$=jQuery,React=react").unwrap();
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs[0], (&"$".to_string(), &"jQuery".to_string()));
        assert_eq!(pairs[1], (&"React".to_string(), &"react".to_string()));
    }

    #[test]
    fn mapping_argument_rejects_missing_value() {
        assert!(parse_mapping_argument("justakey").is_err());
    }

    #[test]
    fn defines_coerce_literals() {
        let defines = parse_defines("A=1,B=true,C=hello").unwrap();
        assert_eq!(defines[0], Define { find: "A".into(), replace: "1".into() });
        assert_eq!(defines[1], Define { find: "B".into(), replace: "true".into() });
        assert_eq!(defines[2], Define { find: "C".into(), replace: "\"hello\"".into() });
    }

    #[test]
    fn quoted_defines_stay_strings() {
        let defines = parse_defines("A=\"1\"").unwrap();
        assert_eq!(defines[0], Define { find: "A".into(), replace: "\"1\"".into() });
    }

    #[test]
    fn at_prefixed_defines_replace_expressions() {
        let defines = parse_defines("@assign=Object.assign").unwrap();
        assert_eq!(
            defines[0],
            Define { find: "assign".into(), replace: "Object.assign".into() }
        );
    }

    #[test]
    fn aliases_split_pairwise() {
        let aliases = parse_aliases("preact=react,a=b").unwrap();
        assert_eq!(aliases[0].find, "preact");
        assert_eq!(aliases[0].replacement, "react");
        assert_eq!(aliases.len(), 2);
    }

    #[test]
    fn externals_none_bundles_everything() {
        let mut manifest = PackageManifest::default();
        manifest.peer_dependencies.insert("react".into(), "^18".into());
        let patterns = parse_externals(Some("none"), &manifest).unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn externals_default_to_peers_plus_dependencies() {
        let mut manifest = PackageManifest::default();
        manifest.dependencies.insert("x".into(), "1".into());
        manifest.peer_dependencies.insert("y".into(), "1".into());
        let patterns = parse_externals(None, &manifest).unwrap();
        let names: Vec<_> = patterns
            .iter()
            .map(|p| match p {
                ExternalPattern::Name(n) => n.as_str(),
                ExternalPattern::Pattern(_) => "<regex>",
            })
            .collect();
        assert_eq!(names, vec!["y", "x"]);
    }

    #[test]
    fn explicit_externals_compile_as_regexes() {
        let mut manifest = PackageManifest::default();
        manifest.peer_dependencies.insert("y".into(), "1".into());
        let patterns = parse_externals(Some("^lodash"), &manifest).unwrap();
        assert_eq!(patterns.len(), 2);
        assert!(matches!(&patterns[1], ExternalPattern::Pattern(_)));
    }
}
