//! Error types for a page load.
//!
//! Every phase of [`crate::load_page`] fails with a [`PageLoadError`]. Transport
//! and filesystem failures carry enough context (failing URL, parent directory,
//! OS cause) for the CLI to print a one-line diagnostic.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Why an HTTP GET failed.
#[derive(Debug)]
pub enum TransportCause {
    /// libcurl reported an error (DNS, connect, timeout, TLS, ...).
    Curl(curl::Error),
    /// The server answered with a non-2xx status.
    Status(u32),
}

impl fmt::Display for TransportCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportCause::Curl(e) => write!(f, "{}", e),
            TransportCause::Status(code) => write!(f, "HTTP {}", code),
        }
    }
}

impl std::error::Error for TransportCause {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportCause::Curl(e) => Some(e),
            TransportCause::Status(_) => None,
        }
    }
}

/// Human-readable classification of an OS error on a write or mkdir.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsCause {
    DirectoryMissing,
    PermissionDenied,
    AlreadyExists,
    Other,
}

impl FsCause {
    pub fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsCause::DirectoryMissing,
            io::ErrorKind::PermissionDenied => FsCause::PermissionDenied,
            io::ErrorKind::AlreadyExists => FsCause::AlreadyExists,
            _ => FsCause::Other,
        }
    }
}

impl fmt::Display for FsCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            FsCause::DirectoryMissing => "directory does not exist",
            FsCause::PermissionDenied => "permission denied",
            FsCause::AlreadyExists => "file already exists",
            FsCause::Other => "unexpected filesystem error",
        };
        f.write_str(msg)
    }
}

/// One resource download that did not complete.
#[derive(Debug)]
pub struct ResourceFailure {
    pub url: String,
    pub path: PathBuf,
    pub error: PageLoadError,
}

#[derive(Debug, thiserror::Error)]
pub enum PageLoadError {
    #[error("invalid page URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to load '{url}': {cause}")]
    Transport { url: String, cause: TransportCause },

    #[error("cannot write to '{}': {cause}", .dir.display())]
    Filesystem {
        dir: PathBuf,
        cause: FsCause,
        #[source]
        source: io::Error,
    },

    #[error("cannot rewrite markup of '{url}': {reason}")]
    Markup { url: String, reason: String },

    #[error(
        "resources '{first}' and '{second}' both map to local file '{}'",
        .path.display()
    )]
    NamingCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    #[error(
        "{} of {total} resources failed to download (first: {})",
        .failed.len(),
        first_failure(.failed)
    )]
    ResourcesFailed {
        failed: Vec<ResourceFailure>,
        total: usize,
    },

    #[error("download task for '{url}' did not finish: {reason}")]
    TaskJoin { url: String, reason: String },
}

impl PageLoadError {
    /// Builds a `Filesystem` error for an operation on `path`, naming its parent directory.
    pub fn filesystem(path: &Path, source: io::Error) -> Self {
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| path.to_path_buf());
        PageLoadError::Filesystem {
            dir,
            cause: FsCause::from_io(&source),
            source,
        }
    }

    pub fn transport(url: &str, cause: TransportCause) -> Self {
        PageLoadError::Transport {
            url: url.to_string(),
            cause,
        }
    }
}

fn first_failure(failed: &[ResourceFailure]) -> String {
    failed
        .first()
        .map(|f| f.error.to_string())
        .unwrap_or_else(|| "none".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_cause_from_io_kinds() {
        let missing = io::Error::from(io::ErrorKind::NotFound);
        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        let other = io::Error::from(io::ErrorKind::Interrupted);
        assert_eq!(FsCause::from_io(&missing), FsCause::DirectoryMissing);
        assert_eq!(FsCause::from_io(&denied), FsCause::PermissionDenied);
        assert_eq!(FsCause::from_io(&other), FsCause::Other);
    }

    #[test]
    fn filesystem_error_names_parent_dir() {
        let err = PageLoadError::filesystem(
            Path::new("/no/such/dir/page.html"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        match &err {
            PageLoadError::Filesystem { dir, cause, .. } => {
                assert_eq!(dir, Path::new("/no/such/dir"));
                assert_eq!(*cause, FsCause::DirectoryMissing);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "cannot write to '/no/such/dir': directory does not exist"
        );
    }

    #[test]
    fn transport_message_names_url() {
        let err = PageLoadError::transport("https://example.com/a.css", TransportCause::Status(404));
        assert_eq!(
            err.to_string(),
            "failed to load 'https://example.com/a.css': HTTP 404"
        );
    }

    #[test]
    fn resources_failed_summarizes_first() {
        let err = PageLoadError::ResourcesFailed {
            failed: vec![ResourceFailure {
                url: "https://example.com/x.png".into(),
                path: PathBuf::from("/tmp/x.png"),
                error: PageLoadError::transport(
                    "https://example.com/x.png",
                    TransportCause::Status(500),
                ),
            }],
            total: 3,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("1 of 3 resources failed"));
        assert!(msg.contains("HTTP 500"));
    }
}
