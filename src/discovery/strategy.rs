use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ordering::{
    file_name_of, is_index_file, parse_index_references, sort_paths, DocumentType,
};
use crate::security::ProjectBoundary;
use crate::types::ContextError;

/// At most this many candidates are listed in an ambiguity error.
pub const AMBIGUITY_LISTING_LIMIT: usize = 10;

/// How the matches of one pattern are filtered and ordered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LoadStrategy {
    /// Every match, in sort-key order.
    #[default]
    FullLoad,
    /// Exactly one match, else an ambiguity error.
    SelectiveLoad,
    /// The index plus the referenced files relevant to a topic.
    IndexGuided,
    /// A value this engine does not know. Loads like `FullLoad`.
    Unrecognized(String),
}

impl LoadStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            LoadStrategy::FullLoad => "FULL_LOAD",
            LoadStrategy::SelectiveLoad => "SELECTIVE_LOAD",
            LoadStrategy::IndexGuided => "INDEX_GUIDED",
            LoadStrategy::Unrecognized(raw) => raw,
        }
    }

    /// The strategy actually applied. Unrecognized values degrade to
    /// `FullLoad` with a warning.
    pub fn effective(&self, pattern: &str) -> LoadStrategy {
        match self {
            LoadStrategy::Unrecognized(raw) => {
                tracing::warn!(
                    pattern,
                    load_strategy = %raw,
                    "Unrecognized load strategy, falling back to FULL_LOAD"
                );
                LoadStrategy::FullLoad
            }
            other => other.clone(),
        }
    }
}

impl From<String> for LoadStrategy {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "FULL_LOAD" => LoadStrategy::FullLoad,
            "SELECTIVE_LOAD" => LoadStrategy::SelectiveLoad,
            "INDEX_GUIDED" => LoadStrategy::IndexGuided,
            _ => LoadStrategy::Unrecognized(raw),
        }
    }
}

impl From<LoadStrategy> for String {
    fn from(strategy: LoadStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

impl fmt::Display for LoadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter and order `matches` (canonical, boundary-checked paths) for the
/// pattern `name`.
pub fn apply_strategy(
    name: &str,
    strategy: &LoadStrategy,
    doc_type: DocumentType,
    matches: Vec<PathBuf>,
    topic: Option<&str>,
    boundary: &ProjectBoundary,
) -> Result<Vec<PathBuf>, ContextError> {
    match strategy.effective(name) {
        LoadStrategy::SelectiveLoad => select_single(name, doc_type, matches),
        LoadStrategy::IndexGuided => index_guided(doc_type, matches, topic, boundary),
        LoadStrategy::FullLoad | LoadStrategy::Unrecognized(_) => Ok(full_load(doc_type, matches)),
    }
}

fn full_load(doc_type: DocumentType, mut matches: Vec<PathBuf>) -> Vec<PathBuf> {
    sort_paths(doc_type, &mut matches);
    matches
}

fn select_single(
    name: &str,
    doc_type: DocumentType,
    mut matches: Vec<PathBuf>,
) -> Result<Vec<PathBuf>, ContextError> {
    if matches.len() <= 1 {
        return Ok(matches);
    }

    sort_paths(doc_type, &mut matches);

    let mut message = format!(
        "pattern '{name}' uses SELECTIVE_LOAD but matched {} files:",
        matches.len()
    );
    for path in matches.iter().take(AMBIGUITY_LISTING_LIMIT) {
        message.push_str(&format!("\n  - {}", path.display()));
    }
    if matches.len() > AMBIGUITY_LISTING_LIMIT {
        message.push_str(&format!(
            "\n  ...and {} more",
            matches.len() - AMBIGUITY_LISTING_LIMIT
        ));
    }
    message.push_str(
        "\nNarrow the glob pattern so it matches a single file, or switch load_strategy to FULL_LOAD.",
    );

    Err(ContextError::Ambiguity {
        pattern: name.to_string(),
        candidates: matches,
        message,
    })
}

fn index_guided(
    doc_type: DocumentType,
    matches: Vec<PathBuf>,
    topic: Option<&str>,
    boundary: &ProjectBoundary,
) -> Result<Vec<PathBuf>, ContextError> {
    let mut sorted = full_load(doc_type, matches);

    let Some(pos) = sorted.iter().position(|p| is_index_file(&file_name_of(p))) else {
        tracing::debug!("No index among matches, loading every match");
        return Ok(sorted);
    };
    let index = sorted.remove(pos);
    let index_dir = index.parent().map(Path::to_path_buf).unwrap_or_default();

    let topic = topic.map(normalize_words).filter(|t| !t.is_empty());

    let mut selected = vec![index.clone()];
    let mut seen = BTreeSet::new();
    seen.insert(index.clone());

    for reference in parse_index_references(&index) {
        if let Some(topic) = &topic {
            let name_hit = normalize_words(stem_of(&reference.target)).contains(topic.as_str());
            let text_hit = normalize_words(&reference.line).contains(topic.as_str());
            if !name_hit && !text_hit {
                continue;
            }
        }

        let candidate = index_dir.join(&reference.target);
        if !candidate.is_file() {
            tracing::warn!(
                index = %index.display(),
                shard = %reference.target,
                "Index references a missing file, skipping"
            );
            continue;
        }
        match boundary.validate(&candidate) {
            Ok(real) => {
                if seen.insert(real.clone()) {
                    selected.push(real);
                }
            }
            Err(err) => {
                tracing::warn!(path = %candidate.display(), error = %err, "Skipping indexed file");
            }
        }
    }

    Ok(selected)
}

fn stem_of(file_name: &str) -> &str {
    file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name)
}

/// Lower-case and turn `-`, `_` and `.` separators into spaces.
fn normalize_words(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_' || c == '.')
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
