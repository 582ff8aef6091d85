//! Reduced row-echelon form via Gauss-Jordan elimination.
//!
//! The reduction runs in four passes over a copy of the input:
//!
//! 1. forward elimination, one pivot row at a time (leftmost non-zero column at or
//!    below the pivot row, first non-zero row in that column)
//! 2. all-zero rows are swapped to the bottom
//! 3. back-substitution from the bottom non-zero row up, clearing each pivot column
//! 4. rows are reordered so pivot columns increase from top to bottom

use crate::Matrix;

impl Matrix {
    /// Reduced row-echelon form of `self`, as a new matrix.
    ///
    /// An all-zero matrix is returned unchanged.
    pub fn rref(&self) -> Matrix {
        let mut ech = Echelon::new(self.clone());
        if ech.is_zero() {
            return ech.into_inner();
        }

        ech.forward_eliminate();
        let nonzero_rows = ech.sink_zero_rows();
        for row in (0..nonzero_rows).rev() {
            ech.back_substitute(row);
        }
        ech.order_pivots(nonzero_rows);

        ech.into_inner()
    }
}

/// Row operations over a matrix being reduced.
struct Echelon {
    m: Matrix,
    rows: usize,
    cols: usize,
}

impl Echelon {
    fn new(m: Matrix) -> Self {
        let (rows, cols) = m.shape();
        Self { m, rows, cols }
    }

    fn into_inner(self) -> Matrix {
        self.m
    }

    #[inline]
    fn val(&self, row: usize, col: usize) -> f32 {
        self.m.as_slice()[row * self.cols + col]
    }

    fn is_zero(&self) -> bool {
        self.m.as_slice().iter().all(|&v| v == 0.0)
    }

    fn is_zero_row(&self, row: usize) -> bool {
        (0..self.cols).all(|col| self.val(row, col) == 0.0)
    }

    /// First row `>= from_row` with a non-zero entry in `col`.
    fn nonzero_in_col(&self, col: usize, from_row: usize) -> Option<usize> {
        (from_row..self.rows).find(|&row| self.val(row, col) != 0.0)
    }

    /// Leftmost column with a non-zero entry at or below `from_row`, and that entry's row.
    fn leftmost_pivot(&self, from_row: usize) -> Option<(usize, usize)> {
        (0..self.cols).find_map(|col| self.nonzero_in_col(col, from_row).map(|row| (row, col)))
    }

    /// Divides the non-zero entries of `row` by `by`.
    fn divide_row(&mut self, row: usize, by: f32) {
        let cols = self.cols;
        for v in &mut self.m.data_mut()[row * cols..(row + 1) * cols] {
            if *v != 0.0 {
                *v /= by;
            }
        }
    }

    /// `row[target] -= factor * row[source]`.
    fn sub_row(&mut self, target: usize, source: usize, factor: f32) {
        let cols = self.cols;
        let data = self.m.data_mut();
        for col in 0..cols {
            let s = data[source * cols + col];
            data[target * cols + col] -= factor * s;
        }
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let cols = self.cols;
        let (lo, hi) = (a.min(b), a.max(b));
        let (head, tail) = self.m.data_mut().split_at_mut(hi * cols);
        head[lo * cols..(lo + 1) * cols].swap_with_slice(&mut tail[..cols]);
    }

    fn forward_eliminate(&mut self) {
        for pivot_row in 0..self.rows {
            let Some((row, col)) = self.leftmost_pivot(pivot_row) else {
                // Everything from `pivot_row` down is zero.
                break;
            };

            self.divide_row(row, self.val(row, col));
            for below in row + 1..self.rows {
                let v = self.val(below, col);
                if v != 0.0 {
                    self.divide_row(below, v);
                    self.sub_row(below, row, 1.0);
                }
            }
            self.swap_rows(row, pivot_row);
        }
    }

    /// Moves all-zero rows to the bottom; returns the number of non-zero rows.
    fn sink_zero_rows(&mut self) -> usize {
        let mut bottom = self.rows;
        for row in (0..self.rows).rev() {
            if self.is_zero_row(row) {
                bottom -= 1;
                self.swap_rows(row, bottom);
            }
        }
        bottom
    }

    /// Clears the pivot column of `row` in every other row.
    fn back_substitute(&mut self, row: usize) {
        let Some(col) = (0..self.cols).find(|&col| self.val(row, col) != 0.0) else {
            return;
        };
        for other in 0..self.rows {
            let factor = self.val(other, col);
            if other != row && factor != 0.0 {
                self.sub_row(other, row, factor);
            }
        }
    }

    fn order_pivots(&mut self, mut to_organize: usize) {
        let mut row = 0;
        let mut col = 0;
        while to_organize > 0 && col < self.cols {
            if let Some(found) = self.nonzero_in_col(col, row) {
                self.swap_rows(found, row);
                to_organize -= 1;
                row += 1;
            }
            col += 1;
        }
    }
}
