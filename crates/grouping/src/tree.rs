use serde::Serialize;
use std::collections::BTreeMap;

/// A nested grouping of items.
///
/// Terminal nodes are either a flat list of items or a list of rows produced by
/// one of the packers; branches map a partition key to a sub-tree. Serializes
/// untagged, so a presentation layer sees a plain list, a list of lists, or an
/// object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GroupTree<T> {
    /// Items that have not been packed into rows.
    Items(Vec<T>),
    /// Items packed into rows of bounded length.
    Rows(Vec<Vec<T>>),
    /// Sub-trees keyed by partition key.
    Branch(BTreeMap<String, GroupTree<T>>),
}

impl<T> GroupTree<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Branch(_))
    }

    /// Number of branch levels above the deepest terminal node.
    pub fn depth(&self) -> usize {
        match self {
            Self::Items(_) | Self::Rows(_) => 0,
            Self::Branch(children) => 1 + children.values().map(Self::depth).max().unwrap_or(0),
        }
    }

    /// Looks up a direct child of a branch.
    pub fn get(&self, key: &str) -> Option<&GroupTree<T>> {
        match self {
            Self::Branch(children) => children.get(key),
            _ => None,
        }
    }

    /// All items in the tree, branches visited in key order.
    pub fn leaves(&self) -> Vec<&T> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, into: &mut Vec<&'a T>) {
        match self {
            Self::Items(items) => into.extend(items),
            Self::Rows(rows) => into.extend(rows.iter().flatten()),
            Self::Branch(children) => children.values().for_each(|child| child.collect_leaves(into)),
        }
    }

    /// Converts every item, keeping the shape of the tree.
    pub fn map<U>(self, f: &mut impl FnMut(T) -> U) -> GroupTree<U> {
        match self {
            Self::Items(items) => GroupTree::Items(items.into_iter().map(&mut *f).collect()),
            Self::Rows(rows) => {
                GroupTree::Rows(rows.into_iter().map(|row| row.into_iter().map(&mut *f).collect()).collect())
            },
            Self::Branch(children) => {
                GroupTree::Branch(children.into_iter().map(|(key, child)| (key, child.map(&mut *f))).collect())
            },
        }
    }
}

impl<T> From<Vec<T>> for GroupTree<T> {
    fn from(items: Vec<T>) -> Self {
        Self::Items(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GroupTree<&'static str> {
        GroupTree::Branch(BTreeMap::from([
            ("a".to_string(), GroupTree::Rows(vec![vec!["a1", "a2"], vec!["a3"]])),
            (
                "b".to_string(),
                GroupTree::Branch(BTreeMap::from([("x".to_string(), GroupTree::Items(vec!["bx"]))])),
            ),
        ]))
    }

    #[test]
    fn test_depth() {
        assert_eq!(GroupTree::Items(vec![1]).depth(), 0);
        assert_eq!(sample().depth(), 2);
        assert_eq!(GroupTree::<u8>::Branch(BTreeMap::new()).depth(), 1);
    }

    #[test]
    fn test_leaves_in_key_order() {
        assert_eq!(sample().leaves(), vec![&"a1", &"a2", &"a3", &"bx"]);
    }

    #[test]
    fn test_map_keeps_shape() {
        let mapped = sample().map(&mut |s| s.len());
        assert_eq!(mapped.depth(), 2);
        assert_eq!(mapped.get("a"), Some(&GroupTree::Rows(vec![vec![2, 2], vec![2]])));
    }

    #[test]
    fn test_serializes_untagged() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"a":[["a1","a2"],["a3"]],"b":{"x":["bx"]}}"#);
    }
}
