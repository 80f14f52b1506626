use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::discovery::strategy::LoadStrategy;
use crate::ordering::DocumentType;
use crate::types::ContextError;

/// One named discovery unit.
///
/// `sharded` matches the directory-of-files layout, `whole` the single-file
/// fallback. Relative globs are resolved against the project boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    #[serde(default)]
    pub sharded: String,
    #[serde(default)]
    pub whole: String,
    #[serde(default)]
    pub load_strategy: LoadStrategy,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<DocumentType>,
}

impl PatternConfig {
    pub fn new(sharded: impl Into<String>, whole: impl Into<String>) -> Self {
        Self {
            sharded: sharded.into(),
            whole: whole.into(),
            load_strategy: LoadStrategy::FullLoad,
            required: false,
            doc_type: None,
        }
    }

    pub fn with_strategy(mut self, strategy: LoadStrategy) -> Self {
        self.load_strategy = strategy;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_doc_type(mut self, doc_type: DocumentType) -> Self {
        self.doc_type = Some(doc_type);
        self
    }

    /// Explicit type, else inferred from the pattern name.
    pub fn document_type(&self, name: &str) -> DocumentType {
        self.doc_type.unwrap_or_else(|| DocumentType::from_name(name))
    }
}

/// Named patterns shared by every assembly in a workflow.
///
/// Plain data passed by reference; there is no process-wide copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternLibrary {
    patterns: BTreeMap<String, PatternConfig>,
}

impl PatternLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ContextError> {
        serde_json::from_str(json).map_err(|e| {
            ContextError::configuration(
                format!("invalid pattern library: {e}"),
                "expected an object of {sharded, whole, load_strategy, required} entries",
            )
        })
    }

    pub fn insert(&mut self, name: impl Into<String>, config: PatternConfig) {
        self.patterns.insert(name.into(), config);
    }

    pub fn get(&self, name: &str) -> Option<&PatternConfig> {
        self.patterns.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatternConfig)> {
        self.patterns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
