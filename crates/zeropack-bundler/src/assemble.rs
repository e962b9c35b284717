//! Build plan assembly.
//!
//! Expands a resolved [`Project`] into the cross product of entries and
//! formats, one [`BuildStep`] each, with every decision the compiler needs
//! made up front: output path and export mode, external policy, UMD
//! globals, the ordered stage list, and the shebang lifted out of the
//! entry source.

use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::external::ExternalPolicy;
use crate::name_cache;
use crate::step::{
    BuildStep, CssModulesMode, ExportMode, MinifyOptions, OutputTarget, Stage, StageKind,
};
use crate::Result;
use zeropack_config::{
    mappings, safe_variable_name, ExternalPattern, Format, Project, Target,
};

static RE_EXPORT_DEFAULT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bexport\s*default\s*[a-zA-Z_$]").unwrap());
static RE_EXPORT_NAMED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bexport\s*(?:let|const|var|async|function\*?)\s*[a-zA-Z_$*]").unwrap()
});
static RE_EXPORT_BRACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*export\s*\{").unwrap());
static RE_TS_ENTRY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\.[cm]?tsx?$").unwrap());
static RE_JS_IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

/// Expand a project into its ordered build steps.
///
/// Steps are ordered entry-major, format-minor, with formats already in
/// `cjs`-first order; the very first step is the primary one for
/// name-cache persistence.
pub fn assemble(project: &Project) -> Result<Vec<BuildStep>> {
    let options = &project.options;
    let manifest = &project.manifest;

    let defines = match options.define.as_deref() {
        Some(raw) => mappings::parse_defines(raw)?,
        None => Vec::new(),
    };
    let aliases = match options.alias.as_deref() {
        Some(raw) => mappings::parse_aliases(raw)?,
        None => Vec::new(),
    };
    let externals = mappings::parse_externals(options.external.as_deref(), manifest)?;
    let globals_arg = match options.globals.as_deref() {
        Some(raw) => mappings::parse_mapping_argument(raw)?,
        None => IndexMap::new(),
    };
    let explicit_externals = options.external.is_some();
    let name_cache = if options.compress {
        name_cache::load(&project.cwd)
    } else {
        None
    };
    let mangle = manifest
        .mangle_config()
        .map(|config| serde_json::to_value(config).unwrap_or_default());

    let mut steps = Vec::with_capacity(project.entries.len() * project.formats().len());
    for (entry_index, entry) in project.entries.iter().enumerate() {
        let paths = project.output_paths(entry);
        let source = read_entry_source(entry);
        let shebang = extract_shebang(&source);
        let mixed_exports = has_mixed_exports(&source);

        let siblings: Vec<_> = project
            .entries
            .iter()
            .filter(|other| *other != entry)
            .cloned()
            .collect();

        for (format_index, &format) in project.formats().iter().enumerate() {
            let is_primary = entry_index == 0 && format_index == 0;
            let modern = format == Format::Modern;
            let file = project.cwd.join(paths.get(format));

            let external = ExternalPolicy::new(
                &externals,
                options.target,
                explicit_externals,
            )
            .with_siblings(siblings.clone());

            let globals = umd_globals(&externals, &globals_arg);

            // Multi-entry chunks import the default entry through ".";
            // point it at the primary output filename.
            let mut stage_aliases: IndexMap<String, String> = aliases
                .iter()
                .map(|a| (a.find.clone(), a.replacement.clone()))
                .collect();
            if project.multiple_entries() {
                if let Some(name) = project.output.file_name().and_then(|n| n.to_str()) {
                    stage_aliases
                        .entry(".".to_string())
                        .or_insert_with(|| format!("./{name}"));
                }
            }

            let definitions: IndexMap<String, String> = defines
                .iter()
                .map(|d| (d.find.clone(), d.replace.clone()))
                .collect();

            let stages = vec![
                Stage::new(
                    StageKind::Alias {
                        aliases: stage_aliases,
                    },
                    true,
                ),
                Stage::new(
                    StageKind::Styles {
                        // Only the primary step writes the stylesheet;
                        // every format shares the same CSS output.
                        extract: is_primary,
                        modules: css_modules_mode(options.css_modules),
                    },
                    true,
                ),
                Stage::new(StageKind::TypeScript, is_typescript_entry(entry)),
                Stage::new(StageKind::Flow, !is_typescript_entry(entry)),
                Stage::new(
                    StageKind::Transpile {
                        target: options.target,
                        modern,
                    },
                    true,
                ),
                Stage::new(
                    StageKind::NodeResolve {
                        browser: options.target == Target::Web,
                    },
                    external.resolve_node_modules,
                ),
                Stage::new(StageKind::CommonJs, external.resolve_node_modules),
                Stage::new(
                    StageKind::Define {
                        definitions: definitions.clone(),
                    },
                    !definitions.is_empty(),
                ),
                Stage::new(
                    StageKind::Minify(MinifyOptions {
                        // Only module formats own their top level; UMD's
                        // wrapper shares scope with the host page.
                        toplevel: modern || matches!(format, Format::Cjs | Format::Es),
                        mangle: mangle.clone(),
                        name_cache: name_cache.clone(),
                        compress: options.compress,
                    }),
                    options.compress,
                ),
            ];

            debug!(
                entry = %entry.display(),
                format = format.as_str(),
                out = %file.display(),
                "assembled build step"
            );

            steps.push(BuildStep {
                entry: entry.clone(),
                format,
                is_primary,
                output: OutputTarget {
                    file,
                    // ES output has no wrapper, so the interop question
                    // only arises for the other formats.
                    export_mode: if mixed_exports && format != Format::Es {
                        ExportMode::Default
                    } else {
                        ExportMode::Auto
                    },
                    global_name: project.global_name.clone(),
                    globals,
                    strict: options.strict,
                    sourcemap: options.sourcemap,
                },
                external,
                stages,
                shebang: shebang.clone(),
            });
        }
    }

    Ok(steps)
}

/// UMD global-variable map: the `--globals` argument wins, and every
/// plain-named external falls back to an identifier derived from its
/// package name.
fn umd_globals(
    externals: &[ExternalPattern],
    overrides: &IndexMap<String, String>,
) -> IndexMap<String, String> {
    let mut globals = IndexMap::new();
    for pattern in externals {
        if let ExternalPattern::Name(name) = pattern {
            let global = overrides
                .get(name)
                .cloned()
                .unwrap_or_else(|| safe_variable_name(name));
            if RE_JS_IDENT.is_match(&global) {
                globals.insert(name.clone(), global);
            }
        }
    }
    for (name, global) in overrides {
        globals
            .entry(name.clone())
            .or_insert_with(|| global.clone());
    }
    globals
}

fn css_modules_mode(option: Option<bool>) -> CssModulesMode {
    match option {
        Some(true) => CssModulesMode::All,
        Some(false) => CssModulesMode::None,
        None => CssModulesMode::ByFilename,
    }
}

fn is_typescript_entry(entry: &Path) -> bool {
    entry
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| RE_TS_ENTRY.is_match(n))
}

/// Entry source for export-shape and shebang sniffing. Unreadable entries
/// degrade to an empty string; the compiler reports the real error.
fn read_entry_source(entry: &Path) -> String {
    match std::fs::read_to_string(entry) {
        Ok(source) => source,
        Err(err) => {
            warn!(entry = %entry.display(), %err, "could not read entry module");
            String::new()
        }
    }
}

fn extract_shebang(source: &str) -> Option<String> {
    if !source.starts_with("#!") {
        return None;
    }
    Some(source.lines().next().unwrap_or(source).to_string())
}

/// An entry mixing a default export with named exports gets the `default`
/// export mode, so `require()` consumers receive the default value with
/// the named exports attached to it.
fn has_mixed_exports(source: &str) -> bool {
    RE_EXPORT_DEFAULT.is_match(source)
        && (RE_EXPORT_NAMED.is_match(source) || RE_EXPORT_BRACE.is_match(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use zeropack_config::BuildOptions;

    fn project_in(dir: &Path, manifest: &str, options: BuildOptions) -> Project {
        fs::write(dir.join("package.json"), manifest).unwrap();
        Project::resolve(BuildOptions {
            cwd: dir.to_path_buf(),
            ..options
        })
        .unwrap()
    }

    fn write_entry(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn one_step_per_entry_format_pair_cjs_first() {
        let dir = TempDir::new().unwrap();
        write_entry(dir.path(), "src/index.js", "export default 1;\n");
        let project = project_in(
            dir.path(),
            r#"{"name": "lib", "main": "dist/lib.js"}"#,
            BuildOptions::default(),
        );

        let steps = assemble(&project).unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].format, Format::Cjs);
        assert!(steps[0].is_primary);
        assert!(steps[1..].iter().all(|s| !s.is_primary));
    }

    #[test]
    fn mixed_exports_get_default_mode_outside_es() {
        let dir = TempDir::new().unwrap();
        write_entry(
            dir.path(),
            "src/index.js",
            "export const a = 1;\nexport default a;\n",
        );
        let project = project_in(dir.path(), r#"{"name": "lib"}"#, BuildOptions::default());

        let steps = assemble(&project).unwrap();
        for step in &steps {
            let expected = if step.format == Format::Es {
                ExportMode::Auto
            } else {
                ExportMode::Default
            };
            assert_eq!(step.output.export_mode, expected, "{:?}", step.format);
        }
    }

    #[test]
    fn sole_default_export_keeps_auto_mode() {
        let dir = TempDir::new().unwrap();
        write_entry(dir.path(), "src/index.js", "export default function () {}\n");
        let project = project_in(dir.path(), r#"{"name": "lib"}"#, BuildOptions::default());

        let steps = assemble(&project).unwrap();
        assert_eq!(steps[0].output.export_mode, ExportMode::Auto);
    }

    #[test]
    fn shebang_is_lifted_into_the_step() {
        let dir = TempDir::new().unwrap();
        write_entry(
            dir.path(),
            "src/index.js",
            "#!/usr/bin/env node\nconsole.log(1);\n",
        );
        let project = project_in(dir.path(), r#"{"name": "cli"}"#, BuildOptions::default());

        let steps = assemble(&project).unwrap();
        assert_eq!(steps[0].shebang.as_deref(), Some("#!/usr/bin/env node"));
    }

    #[test]
    fn umd_globals_derive_from_named_externals() {
        let dir = TempDir::new().unwrap();
        write_entry(dir.path(), "src/index.js", "export default 1;\n");
        let project = project_in(
            dir.path(),
            r#"{"name": "lib", "peerDependencies": {"react": "*", "@scope/thing": "*"}}"#,
            BuildOptions {
                globals: Some("react=React".to_string()),
                ..BuildOptions::default()
            },
        );

        let steps = assemble(&project).unwrap();
        let globals = &steps[0].output.globals;
        assert_eq!(globals.get("react").map(String::as_str), Some("React"));
        assert_eq!(
            globals.get("@scope/thing").map(String::as_str),
            Some("thing")
        );
    }

    #[test]
    fn typescript_entry_enables_ts_stage_and_disables_flow() {
        let dir = TempDir::new().unwrap();
        write_entry(dir.path(), "src/index.ts", "export default 1;\n");
        let project = project_in(dir.path(), r#"{"name": "lib"}"#, BuildOptions::default());

        let steps = assemble(&project).unwrap();
        let ts = steps[0]
            .stages
            .iter()
            .find(|s| matches!(s.kind, StageKind::TypeScript))
            .unwrap();
        let flow = steps[0]
            .stages
            .iter()
            .find(|s| matches!(s.kind, StageKind::Flow))
            .unwrap();
        assert!(ts.enabled);
        assert!(!flow.enabled);
    }

    #[test]
    fn no_compress_disables_minify_stage() {
        let dir = TempDir::new().unwrap();
        write_entry(dir.path(), "src/index.js", "export default 1;\n");
        let project = project_in(
            dir.path(),
            r#"{"name": "lib"}"#,
            BuildOptions {
                compress: false,
                ..BuildOptions::default()
            },
        );

        let steps = assemble(&project).unwrap();
        assert!(!steps[0].minifies());
    }

    #[test]
    fn multi_entry_dot_alias_points_at_primary_output() {
        let dir = TempDir::new().unwrap();
        write_entry(dir.path(), "src/index.js", "export default 1;\n");
        write_entry(dir.path(), "src/extra.js", "export default 2;\n");
        let project = project_in(
            dir.path(),
            r#"{"name": "lib", "main": "dist/lib.js"}"#,
            BuildOptions {
                entries: vec!["src/index.js".into(), "src/extra.js".into()],
                formats: vec![Format::Cjs],
                ..BuildOptions::default()
            },
        );

        let steps = assemble(&project).unwrap();
        assert_eq!(steps.len(), 2);
        let Stage {
            kind: StageKind::Alias { aliases },
            ..
        } = &steps[1].stages[0]
        else {
            panic!("first stage should be the alias stage");
        };
        assert_eq!(aliases.get(".").map(String::as_str), Some("./lib.js"));
    }

    #[test]
    fn dot_alias_ignores_entry_order() {
        let dir = TempDir::new().unwrap();
        write_entry(dir.path(), "src/index.js", "export default 1;\n");
        write_entry(dir.path(), "src/other.js", "export default 2;\n");
        let project = project_in(
            dir.path(),
            r#"{"name": "mod", "main": "dist/mod.js"}"#,
            BuildOptions {
                // The secondary entry listed first must not hijack ".".
                entries: vec!["src/other.js".into(), "src/index.js".into()],
                formats: vec![Format::Cjs],
                ..BuildOptions::default()
            },
        );

        let steps = assemble(&project).unwrap();
        for step in &steps {
            let Stage {
                kind: StageKind::Alias { aliases },
                ..
            } = &step.stages[0]
            else {
                panic!("first stage should be the alias stage");
            };
            assert_eq!(aliases.get(".").map(String::as_str), Some("./mod.js"));
        }
    }

    #[test]
    fn only_the_primary_step_extracts_css() {
        let dir = TempDir::new().unwrap();
        write_entry(dir.path(), "src/index.js", "export default 1;\n");
        let project = project_in(dir.path(), r#"{"name": "lib"}"#, BuildOptions::default());

        let steps = assemble(&project).unwrap();
        for step in &steps {
            let extract = step
                .stages
                .iter()
                .find_map(|s| match &s.kind {
                    StageKind::Styles { extract, .. } => Some(*extract),
                    _ => None,
                })
                .unwrap();
            assert_eq!(extract, step.is_primary);
        }
    }
}
