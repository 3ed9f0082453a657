//! Packing names into rows of bounded length.
//!
//! Two strategies are available:
//!
//! - [`pack_by_distance`] greedily pulls the closest remaining pair of names
//!   (by edit distance) into the row currently being filled, so names that look
//!   alike end up side by side.
//! - [`pack_alphabetical`] sorts and chunks.
//!
//! Both return every input item exactly once, and never an empty row.

use crate::matrix::DistanceMatrix;
use std::num::NonZeroUsize;

/// Packs names into rows of near neighbours using their distance matrix.
///
/// Repeatedly takes the pair with the smallest remaining distance (ties go to
/// the lowest row, then lowest column) and appends its names, first then
/// second, to the open row. A name is only placed once; a pair whose names are
/// both placed already just gets consumed. Whenever the open row reaches
/// `per_row`, or the last unplaced name is appended, the row is sealed.
///
/// The selected pair is always consumed. Both of its names are exhausted only
/// when no row is left open afterwards; otherwise they stay eligible for
/// pairing with other names.
///
/// The loop ends once every cell is exhausted; each iteration consumes at least
/// the selected pair. Names that never surfaced in a pair (a single input, or
/// names stranded by exhausted partners) are appended afterwards in input order.
///
/// If `matrix` does not describe `names` it is rebuilt from them.
pub fn pack_by_distance<T: AsRef<str>>(names: Vec<T>, matrix: DistanceMatrix, per_row: NonZeroUsize) -> Vec<Vec<T>> {
    let mut matrix = matrix;
    if matrix.len() != names.len() {
        tracing::warn!(names = names.len(), matrix = matrix.len(), "distance matrix size mismatch; rebuilding");
        matrix = DistanceMatrix::build(&names);
    }

    let mut rows = RowBuffer::new(names.len(), per_row);
    while let Some((i, j)) = matrix.minimum() {
        rows.place(i);
        rows.place(j);
        matrix.invalidate(i, j);
        if rows.is_between_rows() {
            matrix.exhaust(i);
            matrix.exhaust(j);
        }
    }
    for index in 0..names.len() {
        rows.place(index);
    }
    rows.finish(names)
}

/// Sorts names by ordinal string comparison and cuts them into rows of `per_row`.
pub fn pack_alphabetical<T: AsRef<str>>(names: Vec<T>, per_row: NonZeroUsize) -> Vec<Vec<T>> {
    let mut names = names;
    names.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
    let mut rows = Vec::with_capacity(names.len().div_ceil(per_row.get()));
    let mut names = names.into_iter().peekable();
    while names.peek().is_some() {
        rows.push(names.by_ref().take(per_row.get()).collect());
    }
    rows
}

/// Tracks which positions are placed and the rows they were placed in.
struct RowBuffer {
    per_row: usize,
    placed: Vec<bool>,
    remaining: usize,
    open: Vec<usize>,
    sealed: Vec<Vec<usize>>,
}

impl RowBuffer {
    fn new(len: usize, per_row: NonZeroUsize) -> Self {
        Self {
            per_row: per_row.get(),
            placed: vec![false; len],
            remaining: len,
            open: Vec::with_capacity(per_row.get()),
            sealed: Vec::new(),
        }
    }

    /// Appends `index` to the open row unless it is placed already, sealing the
    /// row once it is full or nothing remains to be placed.
    fn place(&mut self, index: usize) {
        if self.placed[index] {
            return;
        }
        self.placed[index] = true;
        self.remaining -= 1;
        self.open.push(index);
        if self.open.len() >= self.per_row || self.remaining == 0 {
            self.sealed.push(std::mem::take(&mut self.open));
        }
    }

    /// Whether the last placement sealed a row and nothing is queued.
    fn is_between_rows(&self) -> bool {
        self.open.is_empty()
    }

    fn finish<T>(self, names: Vec<T>) -> Vec<Vec<T>> {
        let mut slots: Vec<Option<T>> = names.into_iter().map(Some).collect();
        self.sealed
            .into_iter()
            .map(|row| row.into_iter().filter_map(|index| slots[index].take()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn pack(names: &[&'static str], per_row: usize) -> Vec<Vec<&'static str>> {
        let names = names.to_vec();
        let matrix = DistanceMatrix::build(&names);
        pack_by_distance(names, matrix, capacity(per_row))
    }

    fn assert_partition(input: &[&'static str], rows: &[Vec<&'static str>], per_row: usize) {
        assert!(rows.iter().all(|row| !row.is_empty() && row.len() <= per_row), "bad row sizes: {rows:?}");
        let mut seen: Vec<_> = rows.iter().flatten().copied().collect();
        let mut expected = input.to_vec();
        seen.sort_unstable();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_one_per_row() {
        assert_eq!(pack(&["cat.jpg", "dog.jpg"], 1), vec![vec!["cat.jpg"], vec!["dog.jpg"]]);
    }

    #[test]
    fn test_similar_names_share_rows() {
        let rows = pack(&["report_a.pdf", "photo_1.png", "report_b.pdf", "photo_2.png"], 2);
        assert_eq!(rows, vec![vec!["report_a.pdf", "report_b.pdf"], vec!["photo_1.png", "photo_2.png"]]);
    }

    #[test]
    fn test_open_row_keeps_pulling_neighbours() {
        // (a1, a2) opens the row, then a1's next neighbour a3 joins it.
        let rows = pack(&["a1", "a2", "a3", "zzzzzz"], 3);
        assert_eq!(rows, vec![vec!["a1", "a2", "a3"], vec!["zzzzzz"]]);
    }

    #[test]
    fn test_names_stay_eligible_while_a_row_is_open() {
        // "photo_b" seals the first row while "photo_a" opens the second, so the
        // placed "q1" names stay eligible and pull "zz9" and "rep" in after it.
        let rows = pack(&["q1", "img_01", "report", "photo_b", "q1", "zz9", "photo_a", "rep"], 3);
        assert_eq!(rows, vec![vec!["q1", "q1", "photo_b"], vec!["photo_a", "zz9", "rep"], vec!["img_01", "report"]]);
    }

    #[test]
    fn test_single_name_is_not_lost() {
        assert_eq!(pack(&["only.txt"], 4), vec![vec!["only.txt"]]);
    }

    #[test]
    fn test_empty_input() {
        assert!(pack(&[], 3).is_empty());
    }

    #[rstest]
    #[case::all_equal(&["a", "b", "c", "d", "e"], 2)]
    #[case::duplicates(&["same", "same", "same"], 2)]
    #[case::capacity_one(&["x1", "x2", "y1", "y22", "zz"], 1)]
    #[case::capacity_exceeds_input(&["one", "two", "three"], 10)]
    #[case::odd_leftover(&["ab", "ac", "ad", "xy", "xz", "q", "qq"], 3)]
    fn test_rows_partition_input(#[case] input: &[&'static str], #[case] per_row: usize) {
        let rows = pack(input, per_row);
        assert_partition(input, &rows, per_row);
    }

    #[test]
    fn test_mismatched_matrix_is_rebuilt() {
        let matrix = DistanceMatrix::build(&["x"]);
        let rows = pack_by_distance(vec!["a", "b", "c"], matrix, capacity(2));
        assert_partition(&["a", "b", "c"], &rows, 2);
    }

    #[test]
    fn test_alphabetical_chunks() {
        let rows = pack_alphabetical(vec!["pear", "Apple", "fig", "banana", "apple"], capacity(2));
        assert_eq!(rows, vec![vec!["Apple", "apple"], vec!["banana", "fig"], vec!["pear"]]);
    }

    #[test]
    fn test_alphabetical_concatenation_is_sorted_input() {
        let input = vec!["d", "a", "c", "b", "e", "a"];
        let rows = pack_alphabetical(input.clone(), capacity(4));
        let mut sorted = input;
        sorted.sort();
        assert_eq!(rows.concat(), sorted);
        assert!(pack_alphabetical(Vec::<&str>::new(), capacity(4)).is_empty());
    }
}
