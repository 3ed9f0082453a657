//! Grouping Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Nothing in this crate is fatal to a
//! folder rendering: [`group_folder`](crate::group_folder) converts every error
//! into a [`Problem`](crate::Problem) and carries on with a best-effort result.

use derive_more::{Display, Error};

/// A grouping error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for grouping operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration defects found while compiling grouping rules.
///
/// These describe what the caller should *fix*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A rule is not a valid regular expression.
    #[display("invalid {rule} pattern: {pattern:?}")]
    InvalidPattern {
        /// Which kind of rule the pattern came from (`blacklist`, `group_by`, ...).
        rule: &'static str,
        /// The offending pattern text.
        pattern: String,
    },
    /// A hierarchical partition was requested without any rules.
    #[display("at least one group_by rule is required")]
    EmptyRules,
    /// Rows must be able to hold at least one element.
    #[display("elements_per_row must be at least 1")]
    InvalidRowCapacity,
    /// A required field is absent from a file template.
    #[display("missing required field: {_0}")]
    MissingField(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Every error here is a configuration defect; the same settings
        // will fail the same way.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        let kind = ErrorKind::InvalidPattern { rule: "group_by", pattern: "([".to_string() };
        assert_eq!(kind.to_string(), r#"invalid group_by pattern: "([""#);
        assert_eq!(ErrorKind::MissingField("group_by").to_string(), "missing required field: group_by");
        assert!(!ErrorKind::EmptyRules.is_retryable());
    }
}
