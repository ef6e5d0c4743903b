//! Helpers for `/`-delimited drive paths.
//!
//! Paths are kept as plain strings relative to the drive root. They are only
//! percent-encoded, segment by segment, when placed in a Graph URL.

/// Joins `name` under `parent`. An empty parent is the drive root.
pub fn join(parent: &str, name: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let name = name.trim_start_matches('/');
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Strips leading and trailing separators.
pub fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

/// Encodes each segment of `path` for use after `root:/`.
pub fn encode(path: &str) -> String {
    normalize(path)
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
