//! # File Sources
//!
//! Resolves `files:` entries into a Secret key and the file to read.

use thiserror::Error;

/// A resolved `files:` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    /// Secret key the file content is stored under
    pub key: String,
    /// Path of the encrypted file
    pub path: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocatorError {
    #[error("key name for file path \"{0}\" missing")]
    MissingKey(String),
    #[error("file path for key name \"{0}\" missing")]
    MissingPath(String),
    #[error("key names or file paths cannot contain '='")]
    AmbiguousDelimiter,
}

/// Parse a `path` or `key=path` descriptor
///
/// A bare path is stored under its last path segment.
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn parse_file_source(descriptor: &str) -> Result<FileSource, LocatorError> {
    let components: Vec<&str> = descriptor.split('=').collect();

    match components.as_slice() {
        [path] => Ok(FileSource {
            key: base_name(path).to_string(),
            path: (*path).to_string(),
        }),
        ["", path] => Err(LocatorError::MissingKey((*path).to_string())),
        [key, ""] => Err(LocatorError::MissingPath((*key).to_string())),
        [key, path] => Ok(FileSource {
            key: (*key).to_string(),
            path: (*path).to_string(),
        }),
        _ => Err(LocatorError::AmbiguousDelimiter),
    }
}

/// Last element of a slash-separated path, ignoring trailing slashes
///
/// Returns `.` for an empty path and `/` for a path made only of slashes.
fn base_name(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
