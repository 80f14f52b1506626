use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Content hash of a loaded document or of an assembled payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    pub fn from_content(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self::finish(hasher)
    }

    /// Hash a sequence of byte strings. Each part is length-prefixed so that
    /// `["ab", "c"]` and `["a", "bc"]` never collide.
    pub fn from_parts<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update((part.len() as u64).to_be_bytes());
            hasher.update(part);
        }
        Self::finish(hasher)
    }

    fn finish(hasher: Sha256) -> Self {
        let hash = hasher.finalize();
        ContentDigest(format!("sha256:{}", hex::encode(hash)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Payload key for a file-backed entry.
pub fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
