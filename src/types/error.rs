use std::path::PathBuf;

use thiserror::Error;

use crate::security::SecurityError;

/// Every fatal condition the engine can raise.
///
/// Non-fatal conditions (binary files, missing optional content, unknown load
/// strategies, dangling index links) are logged through `tracing` and never
/// surface here.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error("Configuration error: {message} (hint: {hint})")]
    Configuration { message: String, hint: String },

    #[error("Ambiguous match: {message}")]
    Ambiguity {
        pattern: String,
        candidates: Vec<PathBuf>,
        message: String,
    },

    #[error("Duplicate identifier {identifier}: claimed by both {} and {}", first.display(), second.display())]
    DuplicateIdentifier {
        identifier: u64,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Permission denied while reading {}", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContextError {
    pub fn configuration(message: impl Into<String>, hint: impl Into<String>) -> Self {
        ContextError::Configuration {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContextError::Io {
            path: path.into(),
            source,
        }
    }
}
