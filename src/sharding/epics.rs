//! Sharded epics carry a numeric identifier in their content header
//! (`# Epic 7: Payments`, or an `epic: 7` front-matter line). Two shards
//! claiming the same identifier abort resolution.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::{load_document, DocumentReference};
use crate::ordering::DocumentType;
use crate::security::ProjectBoundary;
use crate::sharding::resolver::resolve_sharded;
use crate::types::ContextError;

static EPIC_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s{0,3}#{1,6}\s*epic\s+(\d+)\b").expect("EPIC_HEADING_RE regex should compile")
});

static EPIC_FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*epic(?:[_-]?id)?\s*:\s*(\d+)\s*$").expect("EPIC_FIELD_RE regex should compile")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicShard {
    /// `None` when the content declares no identifier.
    pub identifier: Option<u64>,
    pub document: DocumentReference,
}

/// The first epic identifier declared in `content`, if any.
pub fn parse_epic_identifier(content: &str) -> Option<u64> {
    EPIC_HEADING_RE
        .captures(content)
        .or_else(|| EPIC_FIELD_RE.captures(content))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Resolve and load a sharded epics directory in reading order.
pub fn resolve_epics(
    directory: &Path,
    boundary: &ProjectBoundary,
) -> Result<Vec<EpicShard>, ContextError> {
    let paths = resolve_sharded(directory, DocumentType::Epics, boundary)?;

    let mut claimed: BTreeMap<u64, PathBuf> = BTreeMap::new();
    let mut shards = Vec::with_capacity(paths.len());

    for path in paths {
        let Some(document) = load_document(boundary, &path)? else {
            continue;
        };

        let identifier = parse_epic_identifier(&document.content);
        match identifier {
            Some(id) => {
                if let Some(first) = claimed.get(&id) {
                    return Err(ContextError::DuplicateIdentifier {
                        identifier: id,
                        first: first.clone(),
                        second: document.path.clone(),
                    });
                }
                claimed.insert(id, document.path.clone());
            }
            None => {
                tracing::debug!(path = %document.path.display(), "Epic shard declares no identifier");
            }
        }

        shards.push(EpicShard {
            identifier,
            document,
        });
    }

    Ok(shards)
}
