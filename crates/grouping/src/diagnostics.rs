//! Collected, non-fatal problems.
//!
//! Grouping a folder never fails outright. Anything that goes wrong along the
//! way (a broken rule, a name no rule can place, a malformed sub-tree) is
//! recorded in a [`Diagnostics`] sink that the caller threads through, and the
//! affected part of the result degrades to something that can still be shown.

use crate::error::ErrorKind;
use derive_more::Display;

/// A single recoverable problem encountered while grouping.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Problem {
    /// A rule in the directory settings could not be used.
    #[display("{scope}: {kind}")]
    Configuration {
        /// The settings entry the rule belongs to: `blacklist`, or a bucket key.
        scope: String,
        kind: ErrorKind,
    },
    /// A name did not match the partition rule at its level and was left out.
    #[display("{name:?} does not match {pattern:?}")]
    Unassignable { name: String, pattern: String },
    /// A tree node had a shape the operation does not handle; it was passed
    /// through unchanged.
    #[display("{context}: unexpected {found} node")]
    UnexpectedNode { context: &'static str, found: &'static str },
}

/// Sink collecting [`Problem`]s.
///
/// Every recorded problem is also emitted as a `tracing` warning, so hosts that
/// install a subscriber see problems as they happen.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    problems: Vec<Problem>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, problem: Problem) {
        tracing::warn!(%problem, "grouping problem");
        self.problems.push(problem);
    }

    /// Records a configuration defect for the given settings scope.
    pub fn configuration(&mut self, scope: impl Into<String>, kind: ErrorKind) {
        self.record(Problem::Configuration { scope: scope.into(), kind });
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    /// Names that were excluded because no partition rule matched them.
    pub fn unassignable(&self) -> impl Iterator<Item = &str> {
        self.problems.iter().filter_map(|problem| match problem {
            Problem::Unassignable { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }
}

impl IntoIterator for Diagnostics {
    type Item = Problem;
    type IntoIter = std::vec::IntoIter<Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.problems.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.configuration("blacklist", ErrorKind::EmptyRules);
        diagnostics.record(Problem::Unassignable { name: "avocado".into(), pattern: "^[A-Z]".into() });

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.unassignable().collect::<Vec<_>>(), vec!["avocado"]);
        assert_eq!(diagnostics.problems()[0].to_string(), "blacklist: at least one group_by rule is required");
    }

    #[test]
    fn test_problem_display() {
        let problem = Problem::UnexpectedNode { context: "split", found: "rows" };
        assert_eq!(problem.to_string(), "split: unexpected rows node");
    }
}
