use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// File name of the navigation document in a sharded directory.
pub const INDEX_FILE_NAME: &str = "index.md";

/// Extension (without the dot) of every document the engine reads.
pub const DOCUMENT_EXTENSION: &str = "md";

static EPIC_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^epic-(\d+)").expect("EPIC_NUMBER_RE regex should compile"));

/// Selects the ordering rule applied to a document's files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Epics,
    Architecture,
    Prd,
    Ux,
    /// Anything else; orders like every non-epic type.
    #[serde(other)]
    Generic,
}

impl DocumentType {
    /// Infer the type from a pattern or document name.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().replace('-', "_").as_str() {
            "epics" | "epic" => DocumentType::Epics,
            "architecture" => DocumentType::Architecture,
            "prd" => DocumentType::Prd,
            "ux" | "ux_design" => DocumentType::Ux,
            _ => DocumentType::Generic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SortClass {
    /// The navigation document.
    Index = 0,
    /// A well-formed filename.
    Matched = 1,
    /// A filename that does not fit the type's naming scheme; always last.
    Unmatched = 2,
}

/// `(class, secondary)` ordering key.
///
/// Field order matters: the derived `Ord` compares class, then the numeric
/// epic value, then the lower-cased name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
    pub class: SortClass,
    pub number: u64,
    pub name: String,
}

pub fn is_index_file(file_name: &str) -> bool {
    file_name.eq_ignore_ascii_case(INDEX_FILE_NAME)
}

pub fn sort_key(doc_type: DocumentType, file_name: &str) -> SortKey {
    let name = file_name.to_lowercase();

    if is_index_file(file_name) {
        return SortKey {
            class: SortClass::Index,
            number: 0,
            name,
        };
    }

    match doc_type {
        DocumentType::Epics => {
            // `epic-10` must follow `epic-2`, hence the parsed number.
            let number = EPIC_NUMBER_RE
                .captures(&name)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<u64>().ok());

            match number {
                Some(number) => SortKey {
                    class: SortClass::Matched,
                    number,
                    name,
                },
                None => SortKey {
                    class: SortClass::Unmatched,
                    number: 0,
                    name,
                },
            }
        }
        _ => SortKey {
            class: SortClass::Matched,
            number: 0,
            name,
        },
    }
}

pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Sort paths by their file name's key, with the full path breaking ties
/// between equal names in different directories.
pub fn sort_paths(doc_type: DocumentType, paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|p| (sort_key(doc_type, &file_name_of(p)), p.clone()));
}
