//! dscript_tspath: Path normalization and extension handling.
//!
//! Paths are plain `/`-separated strings. Backslashes are accepted on input
//! and converted, so the loader behaves the same on every host.

/// Source file extensions the loader looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    /// A `.ts` source file.
    Ts,
    /// A `.d.ts` type definition file.
    Dts,
}

impl Extension {
    /// Get the string representation of this extension (including the dot).
    pub fn as_str(&self) -> &'static str {
        match self {
            Extension::Ts => ".ts",
            Extension::Dts => ".d.ts",
        }
    }
}

/// Convert backslashes to forward slashes.
pub fn normalize_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Normalize a path: unify separators, drop empty and `.` segments and
/// resolve `..` against the preceding segment. A rooted path never climbs
/// above its root.
pub fn normalize_path(path: &str) -> String {
    let path = normalize_slashes(path);
    let root = root_length(&path);
    let (prefix, rest) = path.split_at(root);

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if root > 0 => {}
                _ => segments.push(".."),
            },
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");
    if prefix.is_empty() && joined.is_empty() {
        ".".to_string()
    } else {
        format!("{prefix}{joined}")
    }
}

/// Length of the root of a path: `/`, `C:/` or nothing.
fn root_length(path: &str) -> usize {
    let bytes = path.as_bytes();
    if bytes.first() == Some(&b'/') {
        return 1;
    }
    if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/' {
        return 3;
    }
    0
}

/// Check if a path is rooted (absolute).
pub fn is_rooted(path: &str) -> bool {
    root_length(&normalize_slashes(path)) > 0
}

/// Join two paths and normalize the result. A rooted `relative` replaces
/// `base`.
pub fn combine_paths(base: &str, relative: &str) -> String {
    if is_rooted(relative) || base.is_empty() {
        return normalize_path(relative);
    }
    normalize_path(&format!("{}/{}", base, relative))
}

/// Join several segments left to right.
pub fn join_paths(segments: &[&str]) -> String {
    segments
        .iter()
        .filter(|s| !s.is_empty())
        .fold(String::new(), |acc, segment| combine_paths(&acc, segment))
}

/// The directory holding `path`, without a trailing separator. A path with
/// no directory part yields `.`.
pub fn get_directory_path(path: &str) -> String {
    let normalized = normalize_path(path);
    let root = root_length(&normalized);
    match normalized.rfind('/') {
        Some(last_slash) if last_slash >= root => normalized[..last_slash].to_string(),
        _ if root > 0 => normalized[..root].to_string(),
        _ => ".".to_string(),
    }
}

/// Remove exactly `extension` from the end of `path`; other paths are
/// returned unchanged. `x.d.ts` loses only `.ts` when asked for `Ts`.
pub fn remove_extension(path: &str, extension: Extension) -> &str {
    path.strip_suffix(extension.as_str()).unwrap_or(path)
}

/// Strip a trailing `*` from a search path alias: `lib/*` becomes `lib/`.
pub fn trim_wildcard(alias: &str) -> &str {
    alias.strip_suffix('*').unwrap_or(alias)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("a\\b\\c"), "a/b/c");
        assert_eq!(normalize_path("/a/./b//c/"), "/a/b/c");
        assert_eq!(normalize_path("/a/b/../c"), "/a/c");
        assert_eq!(normalize_path("/../a"), "/a");
        assert_eq!(normalize_path("../a/../../b"), "../../b");
        assert_eq!(normalize_path("a/.."), ".");
        assert_eq!(normalize_path("C:\\x\\..\\y"), "C:/y");
    }

    #[test]
    fn test_get_directory_path() {
        assert_eq!(get_directory_path("/a/b/c.ts"), "/a/b");
        assert_eq!(get_directory_path("/c.ts"), "/");
        assert_eq!(get_directory_path("file.ts"), ".");
        assert_eq!(get_directory_path("lib/file.ts"), "lib");
    }

    #[test]
    fn test_remove_extension() {
        assert_eq!(remove_extension("foo.ts", Extension::Ts), "foo");
        assert_eq!(remove_extension("foo.d.ts", Extension::Dts), "foo");
        assert_eq!(remove_extension("foo.d.ts", Extension::Ts), "foo.d");
        assert_eq!(remove_extension("foo/bar.js", Extension::Ts), "foo/bar.js");
    }

    #[test]
    fn test_is_rooted() {
        assert!(is_rooted("/usr/bin"));
        assert!(is_rooted("C:/Users"));
        assert!(is_rooted("C:\\Users"));
        assert!(!is_rooted("relative/path"));
        assert!(!is_rooted(""));
    }

    #[test]
    fn test_combine_paths() {
        assert_eq!(combine_paths("/a/b", "c.ts"), "/a/b/c.ts");
        assert_eq!(combine_paths("/a/b/", "./c.ts"), "/a/b/c.ts");
        assert_eq!(combine_paths("/a/b", "../c"), "/a/c");
        assert_eq!(combine_paths("", "c.ts"), "c.ts");
        assert_eq!(combine_paths("/a", "/b/c.ts"), "/b/c.ts");
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths(&["/project", "lib/", "strings"]), "/project/lib/strings");
        assert_eq!(join_paths(&["/project", "", "x"]), "/project/x");
    }

    #[test]
    fn test_trim_wildcard() {
        assert_eq!(trim_wildcard("*"), "");
        assert_eq!(trim_wildcard("lib/*"), "lib/");
        assert_eq!(trim_wildcard("lib"), "lib");
    }
}
