use crate::diagnostics::{Diagnostics, Problem};
use crate::group::{GroupingMethod, group};
use crate::tree::GroupTree;
use std::num::NonZeroUsize;

/// Packs every terminal list of a tree into rows, keeping branch keys as they
/// are.
///
/// Nodes that are already rows are reported as
/// [`Problem::UnexpectedNode`] and returned unchanged.
pub fn split_into_rows<T: AsRef<str>>(
    tree: GroupTree<T>,
    per_row: NonZeroUsize,
    method: &GroupingMethod,
    diagnostics: &mut Diagnostics,
) -> GroupTree<T> {
    match tree {
        GroupTree::Items(items) => group(items, per_row, method),
        GroupTree::Branch(children) => GroupTree::Branch(
            children
                .into_iter()
                .map(|(key, child)| (key, split_into_rows(child, per_row, method, diagnostics)))
                .collect(),
        ),
        rows @ GroupTree::Rows(_) => {
            diagnostics.record(Problem::UnexpectedNode { context: "split_into_rows", found: "rows" });
            rows
        },
    }
}
