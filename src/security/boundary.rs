//! Boundary containment for every path the engine touches.
//!
//! Both the boundary and the candidate are canonicalized (symlinks followed)
//! before comparison, so `..` segments and links pointing out of the project
//! cannot slip through a textual prefix check. Resolution failures fail
//! closed.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error(
        "Security violation: {} resolves to {}, outside project boundary {}",
        candidate.display(),
        resolved.display(),
        boundary.display()
    )]
    OutsideBoundary {
        candidate: PathBuf,
        resolved: PathBuf,
        boundary: PathBuf,
    },

    #[error("Security violation: cannot resolve {}: {source}", path.display())]
    ResolutionFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A canonicalized project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectBoundary {
    root: PathBuf,
}

impl ProjectBoundary {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, SecurityError> {
        let root = root.as_ref();
        let canonical = fs::canonicalize(root).map_err(|source| SecurityError::ResolutionFailed {
            path: root.to_path_buf(),
            source,
        })?;
        Ok(Self { root: canonical })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative candidates are interpreted against the boundary root.
    pub fn join(&self, candidate: &Path) -> PathBuf {
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        }
    }

    /// Resolve `candidate` and return its canonical path if it lies inside
    /// the boundary.
    pub fn validate(&self, candidate: impl AsRef<Path>) -> Result<PathBuf, SecurityError> {
        let candidate = candidate.as_ref();
        let joined = self.join(candidate);
        let resolved =
            fs::canonicalize(&joined).map_err(|source| SecurityError::ResolutionFailed {
                path: joined.clone(),
                source,
            })?;

        if !self.contains(&resolved) {
            return Err(SecurityError::OutsideBoundary {
                candidate: candidate.to_path_buf(),
                resolved,
                boundary: self.root.clone(),
            });
        }

        Ok(resolved)
    }

    /// Component-wise containment of an already canonical path.
    pub fn contains(&self, canonical: &Path) -> bool {
        canonical.starts_with(&self.root)
    }
}

/// One-shot validation against a boundary given as a raw path.
pub fn validate(boundary: impl AsRef<Path>, candidate: impl AsRef<Path>) -> Result<PathBuf, SecurityError> {
    ProjectBoundary::new(boundary)?.validate(candidate)
}
