//! Merged build options for one invocation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// One of the four output module shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// CommonJS (`require`/`module.exports`).
    Cjs,
    /// ES modules (`import`/`export`). Accepted under both `es` and `esm`.
    Es,
    /// Universal Module Definition, for script tags and AMD loaders.
    Umd,
    /// ES2017+ modules without legacy down-leveling.
    Modern,
}

impl Format {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "cjs" => Ok(Format::Cjs),
            "es" | "esm" => Ok(Format::Es),
            "umd" => Ok(Format::Umd),
            "modern" => Ok(Format::Modern),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }

    /// Parse a comma-separated format list, normalizing aliases,
    /// deduplicating, and ordering `cjs` first.
    ///
    /// CommonJS is compiled first because later formats reuse its module
    /// cache and refer to its output path for naming.
    pub fn parse_list(value: &str) -> Result<Vec<Self>> {
        let mut formats = Vec::new();
        for part in value.split(',') {
            let format = Format::parse(part)?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        formats.sort_by_key(|f| !matches!(f, Format::Cjs));
        Ok(formats)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Cjs => "cjs",
            Format::Es => "es",
            Format::Umd => "umd",
            Format::Modern => "modern",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target environment for the produced artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Browser-oriented output; platform built-ins are bundled candidates.
    #[default]
    Web,
    /// Node output; platform built-ins are always external.
    Node,
}

impl Target {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "node" => Ok(Target::Node),
            "web" => Ok(Target::Web),
            other => Err(ConfigError::UnknownTarget(other.to_string())),
        }
    }
}

/// The merged configuration for one build invocation.
///
/// Created once from CLI arguments and read-only thereafter; everything
/// derived from it (entries, output path, package name) lives on
/// [`crate::Project`].
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Working directory; made absolute during project resolution.
    pub cwd: PathBuf,
    /// Explicit entry patterns. Empty means "infer from the manifest".
    pub entries: Vec<String>,
    /// Requested output formats, ordered and deduplicated.
    pub formats: Vec<Format>,
    pub target: Target,
    /// Whether to run the minification stage.
    pub compress: bool,
    /// External-module policy string: `"none"`, or a comma-separated
    /// pattern list. `None` externalizes peers plus runtime dependencies.
    pub external: Option<String>,
    /// `--globals` mapping string (`react=React,...`).
    pub globals: Option<String>,
    /// `--define` mapping string (`A=1,@assign=Object.assign,...`).
    pub define: Option<String>,
    /// `--alias` mapping string (`from=to,...`).
    pub alias: Option<String>,
    pub strict: bool,
    pub sourcemap: bool,
    /// Output file or directory override (`-o`).
    pub output: Option<PathBuf>,
    /// UMD/AMD global name override (`--name`).
    pub name: Option<String>,
    /// CSS Modules scoping: forced on, forced off, or by `.module.css`
    /// naming convention when unset.
    pub css_modules: Option<bool>,
    pub watch: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            cwd: PathBuf::from("."),
            entries: Vec::new(),
            formats: vec![Format::Cjs, Format::Modern, Format::Es, Format::Umd],
            target: Target::Web,
            compress: true,
            external: None,
            globals: None,
            define: None,
            alias: None,
            strict: false,
            sourcemap: true,
            output: None,
            name: None,
            css_modules: None,
            watch: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_normalizes_and_dedupes() {
        let formats = Format::parse_list("esm,es,cjs").unwrap();
        assert_eq!(formats, vec![Format::Cjs, Format::Es]);
    }

    #[test]
    fn parse_list_orders_cjs_first() {
        let formats = Format::parse_list("modern,es,umd,cjs").unwrap();
        assert_eq!(formats[0], Format::Cjs);
        // Remaining formats keep their requested order.
        assert_eq!(
            &formats[1..],
            &[Format::Modern, Format::Es, Format::Umd]
        );
    }

    #[test]
    fn parse_rejects_unknown_formats() {
        assert!(Format::parse_list("cjs,wasm").is_err());
    }

    #[test]
    fn target_parses_node_and_web() {
        assert_eq!(Target::parse("node").unwrap(), Target::Node);
        assert_eq!(Target::parse("web").unwrap(), Target::Web);
        assert!(Target::parse("deno").is_err());
    }
}
