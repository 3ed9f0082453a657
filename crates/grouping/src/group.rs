use crate::matrix::DistanceMatrix;
use crate::pack::{pack_alphabetical, pack_by_distance};
use crate::tree::GroupTree;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::num::NonZeroUsize;
use std::str::FromStr;

/// How the items of a terminal list are packed into rows.
///
/// Unrecognised names are kept verbatim as [`Other`](Self::Other), which leaves
/// items ungrouped rather than failing, so settings written for a newer
/// strategy still render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GroupingMethod {
    /// Rows of names that are close in edit distance.
    #[default]
    Numerical,
    /// Rows of names in sorted order.
    Alphabetical,
    /// Any other strategy name; items pass through as-is.
    Other(String),
}

impl GroupingMethod {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Numerical => "numerical",
            Self::Alphabetical => "alphabetical",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for GroupingMethod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "numerical" => Self::Numerical,
            "alphabetical" => Self::Alphabetical,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for GroupingMethod {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

impl From<GroupingMethod> for String {
    fn from(value: GroupingMethod) -> Self {
        match value {
            GroupingMethod::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for GroupingMethod {
    type Err = Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl Display for GroupingMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Packs `items` into rows of at most `per_row` using `method`.
///
/// Returns [`GroupTree::Rows`] for the known strategies and the untouched items
/// as [`GroupTree::Items`] for anything else.
pub fn group<T: AsRef<str>>(items: Vec<T>, per_row: NonZeroUsize, method: &GroupingMethod) -> GroupTree<T> {
    match method {
        GroupingMethod::Alphabetical => GroupTree::Rows(pack_alphabetical(items, per_row)),
        GroupingMethod::Numerical => {
            let matrix = DistanceMatrix::build(&items);
            GroupTree::Rows(pack_by_distance(items, matrix, per_row))
        },
        GroupingMethod::Other(name) => {
            tracing::debug!(method = %name, items = items.len(), "unrecognised grouping method; leaving items ungrouped");
            GroupTree::Items(items)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[rstest]
    #[case("numerical", GroupingMethod::Numerical)]
    #[case("alphabetical", GroupingMethod::Alphabetical)]
    #[case("by-colour", GroupingMethod::Other("by-colour".to_string()))]
    fn test_method_from_str(#[case] input: &str, #[case] expected: GroupingMethod) {
        let method: GroupingMethod = input.parse().unwrap();
        assert_eq!(method, expected);
        assert_eq!(method.to_string(), input);
    }

    #[test]
    fn test_method_serde() {
        let method: GroupingMethod = serde_json::from_str(r#""alphabetical""#).unwrap();
        assert_eq!(method, GroupingMethod::Alphabetical);
        let json = serde_json::to_string(&GroupingMethod::Other("size".into())).unwrap();
        assert_eq!(json, r#""size""#);
    }

    #[test]
    fn test_dispatches_alphabetical() {
        let grouped = group(vec!["c", "a", "b"], capacity(2), &GroupingMethod::Alphabetical);
        assert_eq!(grouped, GroupTree::Rows(vec![vec!["a", "b"], vec!["c"]]));
    }

    #[test]
    fn test_dispatches_numerical() {
        let grouped = group(vec!["cat.jpg", "dog.jpg"], capacity(1), &GroupingMethod::Numerical);
        assert_eq!(grouped, GroupTree::Rows(vec![vec!["cat.jpg"], vec!["dog.jpg"]]));
    }

    #[test]
    fn test_unknown_method_passes_through() {
        let grouped = group(vec!["b", "a"], capacity(1), &"shuffle".into());
        assert_eq!(grouped, GroupTree::Items(vec!["b", "a"]));
    }
}
