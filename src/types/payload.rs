use serde::{Deserialize, Serialize};

use crate::selection::{ApproxTokenCounter, TokenCounter};
use crate::types::identifiers::ContentDigest;

/// One `(key, content)` unit of the final payload.
///
/// Keys are absolute file paths, or caller-defined virtual keys for content
/// that does not live in a file (an inlined diff, for example).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadEntry {
    pub key: String,
    pub content: String,
}

impl PayloadEntry {
    pub fn new(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            content: content.into(),
        }
    }
}

/// The ordered result of one assembly pass.
///
/// An explicit sequence, never a map: the order of entries is part of the
/// output contract. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextPayload {
    entries: Vec<PayloadEntry>,
}

impl ContextPayload {
    /// Callers outside the assembler must uphold key uniqueness themselves.
    pub(crate) fn from_entries(entries: Vec<PayloadEntry>) -> Self {
        debug_assert!(
            {
                let mut keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
                keys.sort_unstable();
                keys.windows(2).all(|w| w[0] != w[1])
            },
            "payload keys must be unique"
        );
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PayloadEntry> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.content.as_str())
    }

    pub fn entries(&self) -> &[PayloadEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PayloadEntry> {
        self.entries
    }

    /// Approximate token cost of all content, keys excluded.
    pub fn estimated_tokens(&self) -> usize {
        let counter = ApproxTokenCounter;
        self.entries
            .iter()
            .map(|e| counter.count_tokens(&e.content))
            .sum()
    }

    /// Digest over keys and contents in order. Two runs over the same
    /// filesystem state and configuration yield the same fingerprint.
    pub fn fingerprint(&self) -> ContentDigest {
        ContentDigest::from_parts(
            self.entries
                .iter()
                .flat_map(|e| [e.key.as_bytes(), e.content.as_bytes()]),
        )
    }
}

impl<'a> IntoIterator for &'a ContextPayload {
    type Item = &'a PayloadEntry;
    type IntoIter = std::slice::Iter<'a, PayloadEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
