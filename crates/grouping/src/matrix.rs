//! Pairwise edit distances over a list of names.

/// Cell value marking a pair as unusable: the diagonal, and any pair the row
/// packer has already consumed. Larger than any real edit distance.
pub const EXHAUSTED: usize = usize::MAX;

/// Dense, square, symmetric matrix of Levenshtein distances.
///
/// Owned by a single grouping call; the row packer consumes it by overwriting
/// cells with [`EXHAUSTED`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<usize>,
}

impl DistanceMatrix {
    /// Computes the distance between every pair of names. The diagonal is
    /// [`EXHAUSTED`] so a name is never paired with itself.
    pub fn build<S: AsRef<str>>(names: &[S]) -> Self {
        let size = names.len();
        let mut cells = vec![EXHAUSTED; size * size];
        for i in 0..size {
            for j in (i + 1)..size {
                let distance = levenshtein(names[i].as_ref(), names[j].as_ref());
                cells[i * size + j] = distance;
                cells[j * size + i] = distance;
            }
        }
        Self { size, cells }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.size + j]
    }

    /// The pair holding the smallest usable distance, or `None` once every cell
    /// is exhausted. Ties go to the first cell in row-major order.
    pub fn minimum(&self) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        for (index, &distance) in self.cells.iter().enumerate() {
            if distance == EXHAUSTED {
                continue;
            }
            if best.is_none_or(|(_, lowest)| distance < lowest) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| (index / self.size, index % self.size))
    }

    /// Marks the pair `(i, j)`, in both directions, as consumed.
    pub fn invalidate(&mut self, i: usize, j: usize) {
        self.cells[i * self.size + j] = EXHAUSTED;
        self.cells[j * self.size + i] = EXHAUSTED;
    }

    /// Removes a name from any further pairing by exhausting its row and column.
    pub fn exhaust(&mut self, index: usize) {
        for other in 0..self.size {
            self.invalidate(index, other);
        }
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (0..i).all(|j| self.get(i, j) == self.get(j, i)))
    }
}

/// Levenshtein edit distance over Unicode scalar values (Wagner-Fischer, two rows).
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}
