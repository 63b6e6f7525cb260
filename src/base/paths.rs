//! Module path utilities.
//!
//! A module is the directory component of a document path, so all module
//! comparisons reduce to comparing normalized `/`-separated paths. These
//! functions are pure string manipulation: they never touch the filesystem
//! and behave the same on every host platform.

/// Directory component of a path.
///
/// `"/p/ui/a.tao"` → `"/p/ui"`, `"/a.tao"` → `"/"`, `"a.tao"` → `"."`.
pub fn dirname(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.starts_with('/') { "/" } else { "." };
    }
    match trimmed.rfind('/') {
        None => ".",
        Some(idx) => {
            let dir = trimmed[..idx].trim_end_matches('/');
            if dir.is_empty() { "/" } else { dir }
        }
    }
}

/// Join two path fragments with a single separator.
pub fn join(base: &str, relative: &str) -> String {
    match (base.is_empty(), relative.is_empty()) {
        (true, _) => relative.to_owned(),
        (_, true) => base.to_owned(),
        _ => format!("{base}/{relative}"),
    }
}

/// Normalize a path: collapse separators, resolve `.` and `..`, drop trailing separators.
///
/// The root of an absolute path is `/`. `..` cannot climb above it; in a
/// relative path unmatched `..` segments are kept. An empty relative path is `.`.
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            _ => segments.push(segment),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_owned(),
        (false, false) => joined,
    }
}

/// Resolve a relative module path (`./ui`, `../shared`) against the directory
/// of the referencing document.
pub fn normalize_module_path(base_dir: &str, module_path: &str) -> String {
    normalize(&join(base_dir, module_path))
}

/// Whether a document at `doc_path` belongs to the module `target`.
///
/// A module path names either a single file (`./ui/views` → `/p/ui/views.tao`)
/// or a folder (`./ui` → every document directly inside `/p/ui`). Both sides
/// are compared in normalized form.
pub fn is_module_member(doc_path: &str, target: &str, extension: &str) -> bool {
    let doc = normalize(doc_path);
    let target = normalize(target);

    let exact_file = doc
        .strip_prefix(target.as_str())
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|ext| ext == extension);

    exact_file || dirname(&doc) == target
}
