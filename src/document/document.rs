use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::identifiers::ContentDigest;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Content must be valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// A file read from inside the project boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReference {
    pub path: PathBuf,
    pub content: String,
    pub size: u64,
    pub digest: ContentDigest,
}

impl DocumentReference {
    /// Ingest raw bytes read from `path`.
    ///
    /// `path` must already be canonical and boundary-validated; this is the
    /// only constructor, and it rejects content that is not UTF-8 text.
    pub fn ingest(path: PathBuf, raw_content: Vec<u8>) -> Result<Self, DocumentError> {
        let size = raw_content.len() as u64;
        let content = String::from_utf8(raw_content)?;
        let digest = ContentDigest::from_content(content.as_bytes());

        Ok(DocumentReference {
            path,
            content,
            size,
            digest,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        crate::ordering::file_name_of(&self.path)
    }
}
