use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use glob::MatchOptions;
use walkdir::WalkDir;

use crate::discovery::pattern::PatternConfig;
use crate::security::ProjectBoundary;
use crate::types::ContextError;

/// Which glob produced a discovery result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOrigin {
    Sharded,
    Whole,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub origin: MatchOrigin,
    /// Canonical, boundary-checked, deduplicated; sorted bytewise.
    pub files: Vec<PathBuf>,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Find the files for one pattern.
///
/// A single sharded match proves the document is split, so the whole-file
/// glob is only tried when the sharded glob yields nothing.
pub fn discover(
    name: &str,
    config: &PatternConfig,
    boundary: &ProjectBoundary,
) -> Result<Discovery, ContextError> {
    let mut seen_real = BTreeSet::new();

    let sharded = expand_glob(&config.sharded, boundary, &mut seen_real)?;
    if !sharded.is_empty() {
        tracing::debug!(pattern = name, count = sharded.len(), "Sharded glob matched");
        return Ok(Discovery {
            origin: MatchOrigin::Sharded,
            files: sharded,
        });
    }

    let whole = expand_glob(&config.whole, boundary, &mut seen_real)?;
    if !whole.is_empty() {
        tracing::debug!(pattern = name, count = whole.len(), "Whole-file glob matched");
        return Ok(Discovery {
            origin: MatchOrigin::Whole,
            files: whole,
        });
    }

    if config.required {
        return Err(ContextError::configuration(
            format!(
                "required pattern '{name}' matched no files (tried sharded '{}' and whole '{}')",
                config.sharded, config.whole
            ),
            "create the document, fix the glob patterns, or set required: false",
        ));
    }

    tracing::debug!(pattern = name, "No files matched");
    Ok(Discovery {
        origin: MatchOrigin::None,
        files: Vec::new(),
    })
}

/// Expand one glob into canonical files inside the boundary.
///
/// The tree under the pattern's literal prefix is walked with symlinks
/// followed; a directory link pointing back at one of its ancestors is
/// reported by the walker and not descended, so cycles terminate.
/// `seen_real` drops files reached a second time through an alias.
pub fn expand_glob(
    pattern: &str,
    boundary: &ProjectBoundary,
    seen_real: &mut BTreeSet<PathBuf>,
) -> Result<Vec<PathBuf>, ContextError> {
    let mut pattern = pattern.trim();
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest;
    }
    if pattern.is_empty() {
        return Ok(Vec::new());
    }

    let matcher = glob::Pattern::new(pattern).map_err(|e| {
        ContextError::configuration(
            format!("invalid glob pattern '{pattern}': {e}"),
            "fix the pattern syntax; see the glob crate's Pattern documentation",
        )
    })?;

    // Absolute patterns match full paths, relative ones match paths
    // relative to the boundary root.
    let absolute = Path::new(pattern).is_absolute();
    let base = if absolute {
        literal_prefix(pattern)
    } else {
        boundary.root().join(literal_prefix(pattern))
    };
    if !base.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&base).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if let Some(ancestor) = err.loop_ancestor() {
                    tracing::warn!(
                        pattern,
                        path = %err.path().map(|p| p.display().to_string()).unwrap_or_default(),
                        ancestor = %ancestor.display(),
                        "Symlink cycle, not descending"
                    );
                } else {
                    tracing::warn!(pattern, error = %err, "Walk entry could not be read, skipping");
                }
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let candidate = if absolute {
            path
        } else {
            match path.strip_prefix(boundary.root()) {
                Ok(rel) => rel,
                Err(_) => continue,
            }
        };
        if !matcher.matches_path_with(candidate, MATCH_OPTIONS) {
            continue;
        }

        let real = match fs::canonicalize(path) {
            Ok(real) => real,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Cannot resolve match, skipping");
                continue;
            }
        };
        if !boundary.contains(&real) {
            tracing::warn!(
                path = %path.display(),
                resolved = %real.display(),
                "Match resolves outside the project boundary, skipping"
            );
            continue;
        }
        if !seen_real.insert(real.clone()) {
            tracing::debug!(path = %path.display(), "Match aliases an already seen file, skipping");
            continue;
        }

        files.push(real);
    }

    files.sort();
    Ok(files)
}

/// `*` stays within one path component; only `**` crosses separators.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Leading components of `pattern` that contain no glob metacharacters.
fn literal_prefix(pattern: &str) -> PathBuf {
    let mut prefix = PathBuf::new();
    for component in Path::new(pattern).components() {
        let text = component.as_os_str().to_string_lossy();
        if text.contains(|c: char| matches!(c, '*' | '?' | '[')) {
            break;
        }
        prefix.push(component);
    }
    prefix
}
