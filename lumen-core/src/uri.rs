//! Input path resolution.
//!
//! `uridecodebin` takes a URI, not a path, so the user-supplied argument
//! is checked for accessibility and turned into an absolute `file://`
//! URI before any pipeline object exists.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum UriError {
    #[error("cannot access {}: {source}", .path.display())]
    Inaccessible {
        path: PathBuf,
        source: io::Error,
    },
    #[error("cannot resolve {}: {source}", .path.display())]
    Unresolvable {
        path: PathBuf,
        source: io::Error,
    },
    #[error("{} does not form a valid file URI", .path.display())]
    InvalidUri { path: PathBuf },
}

/// Resolve a media file path to an absolute `file://` URI.
///
/// The path must exist; the I/O error from the access check is preserved
/// in the returned error.
pub fn file_uri<P: AsRef<Path>>(path: P) -> Result<String, UriError> {
    let path = path.as_ref();

    std::fs::metadata(path).map_err(|source| UriError::Inaccessible {
        path: path.to_path_buf(),
        source,
    })?;

    let absolute = path.canonicalize().map_err(|source| UriError::Unresolvable {
        path: path.to_path_buf(),
        source,
    })?;

    let url = Url::from_file_path(&absolute).map_err(|_| UriError::InvalidUri {
        path: absolute.clone(),
    })?;

    Ok(url.into())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_is_inaccessible() {
        let err = file_uri("/no/such/file.mkv").unwrap_err();
        assert!(matches!(err, UriError::Inaccessible { .. }));
    }

    #[test]
    fn test_missing_path_keeps_io_error() {
        let err = file_uri("/no/such/file.mkv").unwrap_err();
        let UriError::Inaccessible { source, .. } = err else {
            panic!("expected Inaccessible");
        };
        assert_eq!(source.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_existing_file_becomes_file_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"not a real clip").unwrap();

        let uri = file_uri(&path).unwrap();
        assert!(uri.starts_with("file:///"));
        assert!(uri.ends_with("clip.mp4"));
    }

    #[test]
    fn test_relative_path_resolves_absolute() {
        // Unit tests run with the crate directory as cwd.
        let uri = file_uri("Cargo.toml").unwrap();
        assert!(uri.starts_with("file:///"));
        assert!(uri.ends_with("Cargo.toml"));
    }
}
