use std::path::{Path, PathBuf};

use glob::{Pattern, glob};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::utils::relative_display;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of discovering source files.
#[derive(Debug, Default)]
pub struct DiscoveredFiles {
    /// Absolute paths, sorted.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

/// Where to look and what to keep.
#[derive(Debug, Clone, Copy)]
pub struct FileFilter<'a> {
    pub source_dirs: &'a [String],
    pub ignores: &'a [String],
    pub extensions: &'a [String],
}

/// Walk `root` (or each configured source dir under it) for source files.
///
/// Hidden directories are never entered. An empty extension list, or one
/// holding `*`, keeps every file.
pub fn discover_files(root: &Path, filter: FileFilter<'_>) -> DiscoveredFiles {
    let mut result = DiscoveredFiles::default();

    let ignore_patterns: Vec<Pattern> = filter
        .ignores
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!(pattern = %p, error = %e, "invalid ignore pattern");
                None
            }
        })
        .collect();

    for dir in source_roots(root, filter.source_dirs) {
        let walker = WalkDir::new(&dir)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    result.skipped_count += 1;
                    warn!(error = %e, "cannot access path");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let relative = relative_display(root, path);
            let absolute = path.to_string_lossy();
            if ignore_patterns
                .iter()
                .any(|p| p.matches(&relative) || p.matches(&absolute))
            {
                continue;
            }
            if has_extension(path, filter.extensions) {
                result.files.push(path.to_path_buf());
            }
        }
    }

    result.files.sort();
    result.files.dedup();
    debug!(count = result.files.len(), "discovered source files");
    result
}

fn source_roots(root: &Path, source_dirs: &[String]) -> Vec<PathBuf> {
    if source_dirs.is_empty() {
        return vec![root.to_path_buf()];
    }
    let mut paths = Vec::new();
    for dir in source_dirs {
        if is_glob_pattern(dir) {
            let full_pattern = root.join(dir);
            match glob(&full_pattern.to_string_lossy()) {
                Ok(entries) => paths.extend(entries.flatten().filter(|entry| entry.is_dir())),
                Err(e) => warn!(pattern = %dir, error = %e, "invalid glob pattern in 'sourceDir'"),
            }
        } else {
            let path = root.join(dir);
            if path.exists() {
                paths.push(path);
            } else {
                warn!(path = %path.display(), "source directory does not exist");
            }
        }
    }
    paths
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() || extensions.iter().any(|e| e == "*") {
        return true;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.trim_start_matches('.') == ext))
}
