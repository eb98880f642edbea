//! Binary occupancy grids.

/// A rectangular grid of "ink" cells, stored row-major.
///
/// A glyph matrix is `size × size` for its sampling size; a text matrix is
/// the column-wise concatenation of its glyph matrices, so every row of a
/// text matrix has the same length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OccupancyMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl OccupancyMatrix {
    /// An all-empty matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// The matrix produced for empty text: one row with no columns.
    pub fn empty_row() -> Self {
        Self::new(1, 0)
    }

    /// Threshold an alpha bitmap: a cell is occupied iff its alpha is non-zero.
    ///
    /// `alpha` must hold exactly `rows * cols` samples.
    pub fn from_alpha(rows: usize, cols: usize, alpha: &[u8]) -> Option<Self> {
        (alpha.len() == rows * cols).then(|| Self {
            rows,
            cols,
            cells: alpha.iter().map(|&a| a > 0).collect(),
        })
    }

    /// Build from row slices. Rows must all share the first row's length.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Option<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.iter().any(|r| r.as_ref().len() != cols) {
            return None;
        }
        Some(Self {
            rows: rows.len(),
            cols,
            cells: rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect(),
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols && self.cells[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, occupied: bool) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = occupied;
        }
    }

    /// One row of cells. Panics if `row` is out of range.
    pub fn row(&self, row: usize) -> &[bool] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Number of occupied cells.
    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// `(row, col)` of every occupied cell in row-major order.
    pub fn lit_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(move |(i, _)| (i / cols, i % cols))
    }

    /// Append `other`'s cells to the right of each row.
    ///
    /// Rows missing from `other` contribute nothing; rows beyond `self`'s
    /// row count are dropped, so the row count never changes.
    pub fn append_columns(&mut self, other: &OccupancyMatrix) {
        let cols = self.cols + other.cols;
        let mut cells = Vec::with_capacity(self.rows * cols);
        for r in 0..self.rows {
            cells.extend_from_slice(self.row(r));
            if r < other.rows {
                cells.extend_from_slice(other.row(r));
            } else {
                cells.extend(std::iter::repeat_n(false, other.cols));
            }
        }
        self.cols = cols;
        self.cells = cells;
    }
}

impl std::fmt::Display for OccupancyMatrix {
    /// Renders `#` for occupied cells and `.` for empty ones, one line per row.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for r in 0..self.rows {
            for &cell in self.row(r) {
                f.write_str(if cell { "#" } else { "." })?;
            }
            if r + 1 < self.rows {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_alpha_thresholds_nonzero() {
        let m = OccupancyMatrix::from_alpha(2, 2, &[0, 1, 255, 0]).unwrap();
        assert!(!m.get(0, 0));
        assert!(m.get(0, 1));
        assert!(m.get(1, 0));
        assert_eq!(m.lit_count(), 2);
        assert!(OccupancyMatrix::from_alpha(2, 2, &[0; 3]).is_none());
    }

    #[test]
    fn test_append_columns_keeps_row_count() {
        let mut a = OccupancyMatrix::from_rows(&[[true, false], [false, true]]).unwrap();
        let b = OccupancyMatrix::from_rows(&[[true], [true]]).unwrap();
        a.append_columns(&b);
        assert_eq!(a.rows(), 2);
        assert_eq!(a.cols(), 3);
        assert_eq!(a.to_string(), "#.#\n.##");
    }

    #[test]
    fn test_lit_cells_row_major() {
        let m = OccupancyMatrix::from_rows(&[[false, true], [true, true]]).unwrap();
        let cells: Vec<_> = m.lit_cells().collect();
        assert_eq!(cells, vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_empty_row() {
        let m = OccupancyMatrix::empty_row();
        assert_eq!(m.rows(), 1);
        assert_eq!(m.cols(), 0);
        assert_eq!(m.lit_count(), 0);
        assert_eq!(m.lit_cells().count(), 0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows: Vec<Vec<bool>> = vec![vec![true], vec![true, false]];
        assert!(OccupancyMatrix::from_rows(&rows).is_none());
    }
}
