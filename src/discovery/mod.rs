//! Glob discovery and load-strategy application for named patterns.

pub mod discover;
pub mod pattern;
pub mod strategy;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::document::{load_documents, DocumentReference};
use crate::ordering::DocumentType;
use crate::security::ProjectBoundary;
use crate::sharding::resolve_sharded;
use crate::types::ContextError;

pub use discover::{discover, expand_glob, Discovery, MatchOrigin};
pub use pattern::{PatternConfig, PatternLibrary};
pub use strategy::{apply_strategy, LoadStrategy, AMBIGUITY_LISTING_LIMIT};

/// Discover, filter and load the documents of one pattern.
///
/// Sharded full loads go through the shard resolver directory by directory,
/// so index order is honored and the index itself is left out of the
/// content. Every other case applies the load strategy to the raw matches.
pub fn load_pattern(
    name: &str,
    config: &PatternConfig,
    boundary: &ProjectBoundary,
    topic: Option<&str>,
) -> Result<Vec<DocumentReference>, ContextError> {
    let doc_type = config.document_type(name);
    let discovery = discover(name, config, boundary)?;
    if discovery.is_empty() {
        return Ok(Vec::new());
    }

    let strategy = config.load_strategy.effective(name);
    let paths = if discovery.origin == MatchOrigin::Sharded && strategy == LoadStrategy::FullLoad {
        resolve_by_directory(doc_type, discovery.files, boundary)?
    } else {
        apply_strategy(name, &strategy, doc_type, discovery.files, topic, boundary)?
    };

    load_documents(boundary, &paths)
}

fn resolve_by_directory(
    doc_type: DocumentType,
    files: Vec<PathBuf>,
    boundary: &ProjectBoundary,
) -> Result<Vec<PathBuf>, ContextError> {
    let mut by_dir: BTreeMap<PathBuf, BTreeSet<PathBuf>> = BTreeMap::new();
    for file in files {
        let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
        by_dir.entry(dir).or_default().insert(file);
    }

    let mut ordered = Vec::new();
    for (dir, matched) in by_dir {
        // The resolver sees the whole directory; keep only what the glob matched.
        for path in resolve_sharded(&dir, doc_type, boundary)? {
            if matched.contains(&path) {
                ordered.push(path);
            }
        }
    }
    Ok(ordered)
}
