//! Content loading policy shared by every component.
//!
//! Binary (non UTF-8) files are skipped with a log line. A permission failure
//! is fatal: unlike a content-type mismatch it points at a broken environment.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::document::document::{DocumentError, DocumentReference};
use crate::security::ProjectBoundary;
use crate::types::ContextError;

/// Validate and read one file. `Ok(None)` means the file is binary.
pub fn load_document(
    boundary: &ProjectBoundary,
    path: &Path,
) -> Result<Option<DocumentReference>, ContextError> {
    let resolved = boundary.validate(path)?;

    let raw = fs::read(&resolved).map_err(|err| read_error(&resolved, err))?;

    match DocumentReference::ingest(resolved.clone(), raw) {
        Ok(doc) => Ok(Some(doc)),
        Err(DocumentError::InvalidUtf8(_)) => {
            tracing::info!(path = %resolved.display(), "Skipping binary file");
            Ok(None)
        }
    }
}

/// Permission failures get their own variant; everything else is plain I/O.
fn read_error(path: &Path, err: std::io::Error) -> ContextError {
    match err.kind() {
        ErrorKind::PermissionDenied => ContextError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ContextError::io(path, err),
    }
}

/// Load paths in order, dropping binary files.
pub fn load_documents<P: AsRef<Path>>(
    boundary: &ProjectBoundary,
    paths: &[P],
) -> Result<Vec<DocumentReference>, ContextError> {
    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        if let Some(doc) = load_document(boundary, path.as_ref())? {
            docs.push(doc);
        }
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn permission_denied_is_its_own_error() {
        let err = read_error(
            Path::new("/project/docs/locked.md"),
            io::Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        match err {
            ContextError::PermissionDenied { path } => {
                assert_eq!(path, Path::new("/project/docs/locked.md"));
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }
    }

    #[test]
    fn other_read_failures_are_io_errors() {
        let err = read_error(
            Path::new("/project/docs/gone.md"),
            io::Error::new(ErrorKind::NotFound, "missing"),
        );
        assert!(matches!(err, ContextError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_fails_the_load() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("locked.md");
        fs::write(&file, "secret").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores mode bits; nothing to check there.
        if fs::read(&file).is_ok() {
            return;
        }

        let boundary = ProjectBoundary::new(dir.path()).unwrap();
        let err = load_document(&boundary, &file).unwrap_err();
        assert!(matches!(err, ContextError::PermissionDenied { .. }));

        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();
    }
}
