//! Reading order extraction from a navigation document.
//!
//! Only same-directory inline links to documents are honored:
//! `[Intro](intro.md)` and `[Intro](./intro.md)` are references,
//! `[Spec](https://example.com/a.md)` and `[Up](../other/a.md)` are not.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::sort_key::{is_index_file, DOCUMENT_EXTENSION};

static LINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[[^\]]*\]\(\s*([^)\s]+)(?:\s+"[^"]*")?\s*\)"#)
        .expect("LINK_RE regex should compile")
});

/// A link target together with the index line it appeared on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReference {
    pub target: String,
    pub line: String,
    pub line_number: usize,
}

/// Ordered file names referenced by the index at `index_path`.
///
/// Duplicates are preserved. A read failure yields an empty list.
pub fn parse_index(index_path: &Path) -> Vec<String> {
    parse_index_references(index_path)
        .into_iter()
        .map(|r| r.target)
        .collect()
}

pub fn parse_index_references(index_path: &Path) -> Vec<IndexReference> {
    match fs::read_to_string(index_path) {
        Ok(text) => parse_index_text(&text),
        Err(err) => {
            tracing::warn!(
                path = %index_path.display(),
                error = %err,
                "Failed to read index document, treating it as empty"
            );
            Vec::new()
        }
    }
}

pub fn parse_index_text(text: &str) -> Vec<IndexReference> {
    let mut references = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        for caps in LINK_RE.captures_iter(line) {
            let Some(raw) = caps.get(1).map(|m| m.as_str()) else {
                continue;
            };
            if let Some(target) = normalize_target(raw) {
                references.push(IndexReference {
                    target,
                    line: line.to_string(),
                    line_number: idx + 1,
                });
            }
        }
    }

    references
}

fn normalize_target(raw: &str) -> Option<String> {
    let lower = raw.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//") {
        return None;
    }
    if !lower.ends_with(&format!(".{DOCUMENT_EXTENSION}")) {
        return None;
    }

    let mut target = raw;
    while let Some(rest) = target.strip_prefix("./") {
        target = rest;
    }

    if target.contains('/') || target.contains('\\') {
        tracing::debug!(link = target, "Ignoring index link that leaves the shard directory");
        return None;
    }
    if target.is_empty() || is_index_file(target) {
        return None;
    }

    Some(target.to_string())
}
