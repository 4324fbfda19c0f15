//! Error types for profile assembly
//!
//! This module defines the error types used throughout the ffprofile library.
//! All public functions return [`Result<T, Error>`] for consistent error handling.

use std::path::PathBuf;

/// Errors that can occur while building a profile or reading one back
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The profile directory could not be created
    #[error("Failed to allocate profile directory in {path}: {source}")]
    ProfileAllocation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// user.js could not be written
    #[error("Failed to write preferences to {path}: {source}")]
    PreferenceWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A preference value has no `user.js` representation
    #[error("Invalid value for preference '{key}': {message}")]
    InvalidPreference { key: String, message: String },

    /// Addon source path does not exist
    #[error("Addon not found: {0}")]
    AddonNotFound(PathBuf),

    /// Addon source is neither a directory nor a recognized archive
    #[error("Unsupported addon format (expected a directory or an .xpi/.zip archive): {0}")]
    UnsupportedAddonFormat(PathBuf),

    /// Copy or write failure while installing an addon
    #[error("Addon install failed to {operation} {path}: {source}")]
    InstallIo {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed statement in a preference file
    #[error("Parser error at line {line}, column {column}: {message}")]
    Parser {
        line: usize,
        column: usize,
        message: String,
    },

    /// I/O error while reading a preference file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid glob pattern in query
    #[error("Invalid glob pattern: {0}")]
    InvalidGlobPattern(String),

    /// Browser kind name not recognized
    #[error("Unknown browser kind '{0}'. Expected firefox, thunderbird, or fennec")]
    UnknownBrowserKind(String),
}

/// Result type alias for convenience
///
/// # Example
///
/// ```rust
/// use ffprofile::{parse_user_prefs, Result};
///
/// fn count_prefs(content: &str) -> Result<usize> {
///     let prefs = parse_user_prefs(content)?;
///     Ok(prefs.len())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_error_display_includes_path() {
        let err = Error::AddonNotFound(PathBuf::from("/tmp/missing.xpi"));
        assert_eq!(err.to_string(), "Addon not found: /tmp/missing.xpi");

        let err = Error::InstallIo {
            operation: "copy",
            path: PathBuf::from("/tmp/ext/a.js"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            err.to_string(),
            "Addon install failed to copy /tmp/ext/a.js: denied"
        );
    }

    #[test]
    fn test_io_errors_keep_their_source() {
        let err = Error::PreferenceWrite {
            path: PathBuf::from("/tmp/p/user.js"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert_eq!(err.source().map(|s| s.to_string()), Some("disk full".into()));
    }
}
