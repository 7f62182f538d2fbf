//! Validation for identifier path segments.
//!
//! Every identifier in a repository URL (repo, namespace, package, version,
//! reference) is a single path segment. The accepted charset excludes path
//! separators, so a valid segment can never climb out of the dist root.

#[derive(Debug, thiserror::Error)]
pub enum InvalidSegment {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{0} is longer than 128 bytes")]
    TooLong(&'static str),
    #[error("{0} contains characters outside [A-Za-z0-9._-]")]
    BadCharset(&'static str),
    #[error("{0} must not start with '.' or contain '..'")]
    Traversal(&'static str),
}

/// Check one identifier segment, naming the offending field in the error
pub fn validate_segment(field: &'static str, value: &str) -> Result<(), InvalidSegment> {
    if value.is_empty() {
        return Err(InvalidSegment::Empty(field));
    }
    if value.len() > 128 {
        return Err(InvalidSegment::TooLong(field));
    }
    if !value
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'-')
    {
        return Err(InvalidSegment::BadCharset(field));
    }
    if value.starts_with('.') || value.contains("..") {
        return Err(InvalidSegment::Traversal(field));
    }
    Ok(())
}
