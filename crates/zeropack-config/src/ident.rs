//! Package-name to identifier conversion.

/// Strip an npm scope prefix: `@scope/name` becomes `name`.
pub fn remove_scope(name: &str) -> &str {
    if let Some(rest) = name.strip_prefix('@') {
        if let Some(idx) = rest.find('/') {
            return &rest[idx + 1..];
        }
    }
    name
}

/// Derive a valid JavaScript identifier from a package name.
///
/// The scope is removed, invalid characters are stripped, and the remaining
/// separator-delimited words are camel-cased: `@foo/my-lib` becomes `myLib`.
/// Used as the default UMD global name.
pub fn safe_variable_name(name: &str) -> String {
    let name = remove_scope(name).to_lowercase();

    // Drop leading non-alphabetic and trailing non-alphanumeric runs, and
    // anything that is not a word character, dot, or dash in between.
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let cleaned = cleaned
        .trim_start_matches(|c: char| !c.is_ascii_alphabetic())
        .trim_end_matches(|c: char| !c.is_ascii_alphanumeric());

    let mut out = String::with_capacity(cleaned.len());
    let mut upper_next = false;
    for c in cleaned.chars() {
        if matches!(c, '-' | '_' | '.') {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_scope_prefix() {
        assert_eq!(remove_scope("@foo/bar"), "bar");
        assert_eq!(remove_scope("bar"), "bar");
        assert_eq!(remove_scope("@foo"), "@foo");
    }

    #[test]
    fn camel_cases_package_names() {
        assert_eq!(safe_variable_name("my-lib"), "myLib");
        assert_eq!(safe_variable_name("@foo/my-lib"), "myLib");
        assert_eq!(safe_variable_name("lodash.throttle"), "lodashThrottle");
        assert_eq!(safe_variable_name("123-abc"), "abc");
    }

    #[test]
    fn strips_invalid_characters() {
        assert_eq!(safe_variable_name("my lib!"), "mylib");
        assert_eq!(safe_variable_name("lib-"), "lib");
    }
}
