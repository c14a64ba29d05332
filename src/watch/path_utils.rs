// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::{Component, Path};

/// Convert a path into a string relative to `base`, with forward slashes.
///
/// - Relative inputs are taken as already relative to `base`.
/// - First we try a direct `strip_prefix(base)`.
/// - If that fails (symlinks, different absolute prefixes), we canonicalize
///   both paths and try again.
/// - Otherwise the path lies outside `base` and is expressed with leading
///   `..` segments, e.g. `../other/file.txt`.
///
/// Returns `None` only when no relation can be computed at all (e.g. paths on
/// different Windows drives).
pub fn relative_str(base: &Path, path: &Path) -> Option<String> {
    if path.is_relative() {
        return Some(normalize(path.strip_prefix(".").unwrap_or(path)));
    }

    if let Ok(rel) = path.strip_prefix(base) {
        return Some(normalize(rel));
    }

    // macOS in particular reports /private/var/... for /var/... roots.
    if let (Ok(base_canon), Ok(path_canon)) = (base.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&base_canon) {
            return Some(normalize(rel));
        }
    }

    lexical_relative(base, path)
}

fn lexical_relative(base: &Path, path: &Path) -> Option<String> {
    let base: Vec<Component<'_>> = base.components().collect();
    let target: Vec<Component<'_>> = path.components().collect();

    // Different prefixes (drive letters) cannot be related.
    match (base.first(), target.first()) {
        (Some(a), Some(b)) if a != b => return None,
        _ => {}
    }

    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..base.len() {
        parts.push("..".to_string());
    }
    for comp in &target[common..] {
        parts.push(comp.as_os_str().to_string_lossy().into_owned());
    }

    if parts.is_empty() {
        Some(".".to_string())
    } else {
        Some(parts.join("/"))
    }
}

fn normalize(rel: &Path) -> String {
    let s = rel.to_string_lossy().replace('\\', "/");
    if s.is_empty() { ".".to_string() } else { s }
}
