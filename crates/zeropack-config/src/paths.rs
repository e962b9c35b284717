//! Helpers for the relative, forward-slash paths used in package manifests.
//!
//! Manifest fields like `main` and `exports` values are posix-style paths
//! relative to the package root regardless of host platform, so the output
//! resolver manipulates them as strings rather than [`std::path::PathBuf`].

/// Prefix a relative path with `./` unless it already starts with a dot.
pub fn ensure_relative(path: &str) -> String {
    if path.starts_with('.') {
        path.to_string()
    } else {
        format!("./{path}")
    }
}

/// The directory portion of a manifest path, `"."` when there is none.
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => ".",
    }
}

/// The final component of a manifest path.
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

fn components(path: &str) -> Vec<&str> {
    path.split('/').filter(|c| !c.is_empty() && *c != ".").collect()
}

/// Join two manifest paths, collapsing `.` and interior `..` segments.
pub fn join(dir: &str, rest: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in components(dir).into_iter().chain(components(rest)) {
        if part == ".." && parts.last().is_some_and(|p| *p != "..") {
            parts.pop();
        } else {
            parts.push(part);
        }
    }
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Compute `to` relative to `from`, both manifest paths rooted at the same
/// package directory.
pub fn relative(from: &str, to: &str) -> String {
    let from = components(from);
    let to = components(to);

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::new();
    for _ in common..from.len() {
        parts.push("..");
    }
    parts.extend(&to[common..]);
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_relative_prefixes_bare_paths() {
        assert_eq!(ensure_relative("dist/index.js"), "./dist/index.js");
        assert_eq!(ensure_relative("./dist/index.js"), "./dist/index.js");
        assert_eq!(ensure_relative("../up.js"), "../up.js");
    }

    #[test]
    fn dirname_and_basename() {
        assert_eq!(dirname("./dist/mod.js"), "./dist");
        assert_eq!(dirname("x.esm.js"), ".");
        assert_eq!(basename("./dist/mod.js"), "mod.js");
        assert_eq!(basename("x.esm.js"), "x.esm.js");
    }

    #[test]
    fn join_collapses_dot_segments() {
        assert_eq!(join("./dist", "mod.mjs"), "dist/mod.mjs");
        assert_eq!(join(".", "dist/mod.js"), "dist/mod.js");
        assert_eq!(join("dist", "../src/b.js"), "src/b.js");
    }

    #[test]
    fn relative_walks_up_and_down() {
        assert_eq!(relative("dist", "./dist/foo"), "foo");
        assert_eq!(relative(".", "./dist/foo"), "dist/foo");
        assert_eq!(relative("dist", "src/b"), "../src/b");
        assert_eq!(relative("a/b", "a/b"), "");
    }
}
