use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ordering::{
    file_name_of, is_index_file, parse_index, sort_paths, DocumentType, DOCUMENT_EXTENSION,
};
use crate::security::ProjectBoundary;
use crate::types::ContextError;

/// Definitive reading order for the shards in `directory`.
///
/// With an index present, its link order comes first and unreferenced
/// (orphan) shards follow in sort-key order. Without one, every shard is
/// sorted by key. The index itself is never returned. Returned paths are
/// canonical; shards that fail boundary validation are logged and skipped.
pub fn resolve_sharded(
    directory: &Path,
    doc_type: DocumentType,
    boundary: &ProjectBoundary,
) -> Result<Vec<PathBuf>, ContextError> {
    let directory = boundary.validate(directory)?;
    let shards = list_shard_files(&directory)?;

    // Keep the on-disk spelling; `INDEX.md` is an index too.
    let index_name = shards.iter().find(|name| is_index_file(name)).cloned();
    let has_index = index_name.is_some();
    let mut resolved = Vec::with_capacity(shards.len());
    let mut seen_real = BTreeSet::new();

    let mut orphans: Vec<PathBuf> = if let Some(index_name) = &index_name {
        let references = parse_index(&directory.join(index_name));
        let mut referenced = BTreeSet::new();

        for name in references {
            if !referenced.insert(name.clone()) {
                tracing::debug!(shard = %name, "Duplicate index reference ignored");
                continue;
            }
            let candidate = directory.join(&name);
            if !candidate.is_file() {
                tracing::warn!(
                    index = %directory.display(),
                    shard = %name,
                    "Index references a missing shard, skipping"
                );
                continue;
            }
            push_validated(boundary, &candidate, &mut seen_real, &mut resolved);
        }

        shards
            .iter()
            .filter(|name| !is_index_file(name) && !referenced.contains(*name))
            .map(|name| directory.join(name))
            .collect()
    } else {
        shards.iter().map(|name| directory.join(name)).collect()
    };

    sort_paths(doc_type, &mut orphans);
    if has_index && !orphans.is_empty() {
        tracing::debug!(
            directory = %directory.display(),
            count = orphans.len(),
            "Appending shards not listed in the index"
        );
    }
    for orphan in &orphans {
        push_validated(boundary, orphan, &mut seen_real, &mut resolved);
    }

    Ok(resolved)
}

fn push_validated(
    boundary: &ProjectBoundary,
    candidate: &Path,
    seen_real: &mut BTreeSet<PathBuf>,
    out: &mut Vec<PathBuf>,
) {
    match boundary.validate(candidate) {
        Ok(real) => {
            if seen_real.insert(real.clone()) {
                out.push(real);
            } else {
                tracing::debug!(path = %candidate.display(), "Shard aliases an already resolved file");
            }
        }
        Err(err) => {
            tracing::warn!(path = %candidate.display(), error = %err, "Skipping shard");
        }
    }
}

/// Names of document files directly inside `directory`, sorted bytewise.
pub fn list_shard_files(directory: &Path) -> Result<Vec<String>, ContextError> {
    let entries = fs::read_dir(directory).map_err(|e| ContextError::io(directory, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ContextError::io(directory, e))?;
        let path = entry.path();
        let is_doc = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(DOCUMENT_EXTENSION))
            .unwrap_or(false);
        if is_doc && path.is_file() {
            names.push(file_name_of(&path));
        }
    }

    // read_dir order is unspecified
    names.sort();
    Ok(names)
}
