//! Logical path helpers.
//!
//! Resolution works on root-relative, '/'-separated logical paths. These
//! helpers never touch the filesystem.

/// Appends a trailing '/' unless the path already ends with one.
pub fn slashify(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}

/// Collapses '.', '..' and duplicate separators. '..' pops at most to the
/// root, so a canonicalized path can never escape it.
pub fn canonicalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if path.starts_with('/') {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Splits a slashified path into its segments, dropping trailing empties.
/// An absolute path keeps its leading empty segment, so `"/a/b/"` becomes
/// `["", "a", "b"]`.
pub fn split_segments(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path.split('/').collect();
    while segments.len() > 1 && segments.last() == Some(&"") {
        segments.pop();
    }
    segments
}

/// Joins the first `depth + 1` segments back into a directory prefix, each
/// segment followed by '/'. Depth 0 yields the root.
pub fn ancestor_prefix(segments: &[&str], depth: usize) -> String {
    if segments.is_empty() || depth == 0 {
        return "/".to_string();
    }

    let mut prefix = String::new();
    for segment in segments.iter().take(depth + 1) {
        prefix.push_str(segment);
        prefix.push('/');
    }
    prefix
}
