//! Configuration Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The settings file extension is not one of `json`, `yaml`, `yml` or `toml`.
    #[display("unsupported settings format: {}", _0.display())]
    UnsupportedFormat(#[error(not(source))] PathBuf),
    /// A settings source could not be read or does not describe valid settings.
    #[display("invalid directory settings")]
    Extract,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Settings files are read once; a bad document stays bad.
        false
    }
}
