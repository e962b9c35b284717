//! Output path resolution: maps (entry, format) to the artifact path.
//!
//! This is the highest-complexity piece of the resolver. For each entry the
//! four format paths are computed together through a precedence cascade:
//!
//! 1. the conditional `exports` map, looked up by the entry's subpath key
//!    with a per-format ordered condition list and filename-pattern filter;
//! 2. legacy manifest fields (`module`, `jsnext:main`, `cjs:main`, `main`,
//!    `umd:main`, `unpkg`, `esmodule`, `syntax.esmodules`), re-stemmed via
//!    [`replace_name`];
//! 3. a synthesized sibling of the primary output path.
//!
//! Resolution never fails; an unmatched tier falls through to the next and
//! the synthesized default always succeeds.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::exports;
use crate::manifest::PackageManifest;
use crate::options::Format;
use crate::paths::{basename, dirname, ensure_relative, join, relative};

static RE_NAME_EXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\.(?:umd|cjs|esm|es|m|mjs|module|modern))?\.(?:[mc]js|[tj]sx?)$").unwrap()
});
static RE_MAIN_STRIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\.(umd|cjs|es|m|module|modern))?\.([mc]js|[tj]sx?)$").unwrap());
static RE_ANY_STRIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\.(umd|cjs|esm?|m|module|modern|20\d\d))?\.([mc]js|[tj]sx?)$").unwrap()
});
static RE_INDEX_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^index\.([mc]js|[tj]sx?)$").unwrap());
static RE_SOURCE_EXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.([mc]js|[tj]sx?)$").unwrap());
static RE_ESM_EXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\.esm?|\.module|\.m)?\.m?js$").unwrap());
static RE_MJS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.mjs$").unwrap());
static RE_M_OR_JS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.m?js$").unwrap());
static RE_JS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.js$").unwrap());
static RE_CJS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.cjs$").unwrap());
static RE_UMD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[.-]umd\.c?js$").unwrap());

const CONDITIONS_MJS: &[&str] = &["import", "module", "default"];
const CONDITIONS_MODERN: &[&str] = &["modern", "esmodules", "import", "module", "default"];
const CONDITIONS_CJS: &[&str] = &["require", "default"];
const CONDITIONS_UMD: &[&str] = &["umd", "default"];
const CONDITIONS_ANY: &[&str] = &[
    "modern", "esmodules", "import", "module", "default", "require", "umd",
];

/// Inputs for one entry's output-path resolution. All paths are absolute;
/// `output` is the already-resolved primary output file for the build.
#[derive(Debug, Clone, Copy)]
pub struct ResolveMainContext<'a> {
    pub manifest: &'a PackageManifest,
    pub cwd: &'a Path,
    pub entry: &'a Path,
    pub entries: &'a [PathBuf],
    pub output: &'a Path,
}

/// The resolved per-format output paths for one entry, relative to `cwd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub cjs: String,
    pub es: String,
    pub umd: String,
    pub modern: String,
}

impl OutputPaths {
    pub fn get(&self, format: Format) -> &str {
        match format {
            Format::Cjs => &self.cjs,
            Format::Es => &self.es,
            Format::Umd => &self.umd,
            Format::Modern => &self.modern,
        }
    }

    /// Resolve all four format paths for one entry.
    pub fn resolve(ctx: ResolveMainContext<'_>) -> Self {
        let pkg = ctx.manifest;
        let entry = ensure_relative(&rel_to_cwd(ctx.cwd, ctx.entry));
        let mut main_no_ext = ensure_relative(&rel_to_cwd(ctx.cwd, ctx.output));

        // Subpath key into the exports map. The entry matching an index.*
        // filename (or the first entry) owns the "." subpath; the rest key
        // by their path relative to the entries' common ancestor directory.
        let mut export_path = ".".to_string();
        let mut is_default_entry = true;
        if ctx.entries.len() > 1 {
            let entry_rels: Vec<String> = ctx
                .entries
                .iter()
                .map(|p| rel_to_cwd(ctx.cwd, p))
                .collect();
            let default_entry = ensure_relative(
                entry_rels
                    .iter()
                    .find(|p| RE_INDEX_ENTRY.is_match(basename(p)))
                    .unwrap_or(&entry_rels[0]),
            );
            is_default_entry = default_entry == entry;

            let common_dir = common_ancestor(&entry_rels);
            let name = if is_default_entry { &main_no_ext } else { &entry };
            main_no_ext = ensure_relative(&join(dirname(&main_no_ext), basename(name)));
            if !is_default_entry {
                let stem = RE_SOURCE_EXT.replace(&entry, "");
                export_path = ensure_relative(&relative(&common_dir, &stem));
            }
        }
        main_no_ext = RE_MAIN_STRIP.replace(&main_no_ext, "").into_owned();

        let is_module = pkg.is_module_type();
        let cjs_ext = if is_module { ".cjs" } else { ".js" };
        let mut esm_ext = if is_module { ".esm.js" } else { ".mjs" }.to_string();

        let mjs_pattern: &Regex = if is_module { &RE_M_OR_JS } else { &RE_MJS };
        let cjs_pattern: &Regex = if is_module { &RE_CJS } else { &RE_JS };

        // Any exports-map hit re-seats the shared stem so synthesized
        // siblings land next to the mapped file.
        let exports = pkg.exports.as_ref();
        if let Some(any_main) = exports::walk(exports, &export_path, CONDITIONS_ANY, None) {
            main_no_ext = RE_ANY_STRIP.replace(&any_main, "").into_owned();
        }

        let modern_mapped =
            exports::walk(exports, &export_path, CONDITIONS_MODERN, Some(mjs_pattern));
        let modern = modern_mapped
            .clone()
            .or_else(|| pkg.syntax_esmodules().map(str::to_string))
            .or_else(|| pkg.esmodule.clone())
            .unwrap_or_else(|| replace_name("x.modern.js", &main_no_ext));
        // The modern path's extension chain decides the synthesized ES
        // extension (".mjs", ".esm.js", ".module.js", ...).
        if let Some(m) = RE_ESM_EXT.find(&modern) {
            esm_ext = m.as_str().to_string();
        }

        let es_mapped = exports::walk(exports, &export_path, CONDITIONS_MJS, Some(mjs_pattern));
        let es = match &es_mapped {
            Some(path) if *path != modern => path.clone(),
            _ => match &pkg.module {
                Some(module) if !module.contains("src/") => replace_name(module, &main_no_ext),
                _ => pkg
                    .jsnext_main
                    .as_deref()
                    .map(|jsnext| replace_name(jsnext, &main_no_ext))
                    .unwrap_or_else(|| replace_name(&format!("x.esm{esm_ext}"), &main_no_ext)),
            },
        };

        let umd_mapped = exports::walk(exports, &export_path, CONDITIONS_UMD, Some(&RE_UMD));
        let umd = umd_mapped
            .clone()
            .or_else(|| pkg.umd_main.clone())
            .or_else(|| pkg.unpkg.clone())
            .unwrap_or_else(|| replace_name(&format!("x.umd{cjs_ext}"), &main_no_ext));

        let cjs_mapped = exports::walk(exports, &export_path, CONDITIONS_CJS, Some(cjs_pattern));
        let cjs = match &cjs_mapped {
            Some(path) if *path != umd => path.clone(),
            _ => pkg
                .cjs_main
                .clone()
                .or_else(|| {
                    if is_default_entry {
                        pkg.main.clone()
                    } else {
                        None
                    }
                })
                .unwrap_or_else(|| replace_name(&format!("x{cjs_ext}"), &main_no_ext)),
        };

        if is_module {
            warn_cjs_extension(pkg, &cjs, &umd);
        }
        lint_exports_disagreement(pkg, es_mapped.as_deref(), cjs_mapped.as_deref(), umd_mapped.as_deref());

        OutputPaths {
            cjs,
            es,
            umd,
            modern,
        }
    }
}

/// Resolve the output path for a single (entry, format) pair.
pub fn resolve_main(ctx: ResolveMainContext<'_>, format: Format) -> String {
    OutputPaths::resolve(ctx).get(format).to_string()
}

/// Keep the template's extension chain but swap its stem for the computed
/// base name: `replace_name("x.esm.js", "./dist/mod")` is `"./dist/mod.esm.js"`.
pub fn replace_name(template: &str, main_no_ext: &str) -> String {
    let ext = RE_NAME_EXT
        .find(basename(template))
        .map(|m| m.as_str())
        .unwrap_or("");
    let dir = dirname(template);
    let rel = relative(dir, main_no_ext);
    ensure_relative(&join(dir, &format!("{rel}{ext}")))
}

/// A package declaring `"type": "module"` whose CommonJS-shaped outputs end
/// in `.js` would be loaded as ESM by Node; warn rather than fail.
fn warn_cjs_extension(pkg: &PackageManifest, cjs: &str, umd: &str) {
    if cjs.to_ascii_lowercase().ends_with(".js") && !cjs.to_ascii_lowercase().ends_with(".cjs") {
        warn!(
            "a package.json with {{\"type\":\"module\"}} should use a .cjs extension for the CommonJS output: {cjs:?}"
        );
    }
    if umd.to_ascii_lowercase().ends_with(".js") && !umd.to_ascii_lowercase().ends_with(".cjs") {
        let field = if pkg.umd_main.is_some() {
            "umd:main"
        } else {
            "unpkg"
        };
        warn!(
            "a package.json with {{\"type\":\"module\"}} should use a .cjs extension for the UMD output ({field}): {umd:?}"
        );
    }
}

/// The exports map wins outright over legacy fields, but a manifest where
/// both are present and point at different files is worth a lint.
fn lint_exports_disagreement(
    pkg: &PackageManifest,
    es: Option<&str>,
    cjs: Option<&str>,
    umd: Option<&str>,
) {
    let pairs: [(&str, Option<&str>, Option<&str>); 3] = [
        ("module", pkg.module.as_deref(), es),
        ("main", pkg.main.as_deref(), cjs),
        ("umd:main", pkg.umd_main.as_deref(), umd),
    ];
    for (field, legacy, mapped) in pairs {
        if let (Some(legacy), Some(mapped)) = (legacy, mapped) {
            if ensure_relative(legacy) != ensure_relative(mapped) {
                warn!(
                    "\"exports\" resolves to {mapped:?} but the legacy {field:?} field points at {legacy:?}; the exports map wins"
                );
            }
        }
    }
}

/// A cwd-relative, forward-slash rendition of an absolute path.
fn rel_to_cwd(cwd: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(cwd).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// The deepest directory containing every entry.
fn common_ancestor(entry_rels: &[String]) -> String {
    let mut acc: Vec<&str> = dirname(&entry_rels[0]).split('/').collect();
    for entry in &entry_rels[1..] {
        let parts: Vec<&str> = dirname(entry).split('/').collect();
        let shared = acc
            .iter()
            .zip(parts.iter())
            .take_while(|(a, b)| a == b)
            .count();
        acc.truncate(shared);
    }
    acc.join("/")
}
