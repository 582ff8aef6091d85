//! Dense 2-D `f32` matrix.
//!
//! Storage is a single contiguous row-major buffer: element `(row, col)` lives at
//! `row * cols + col`. The buffer length always equals `rows * cols` and both
//! dimensions are always `> 0`.
//!
//! Shapes change only through [`Matrix::transpose`] and [`Matrix::vectorize`].
//! Operations that combine two matrices validate shapes and return [`Result`].

use std::fmt;
use std::io::Read;
use std::ops::Mul;

use crate::matmul::gemm_f32;
use crate::{Error, Result};

/// Values strictly above this render as "on" in the image preview.
pub const RENDER_THRESHOLD: f32 = 0.1;

const ON_GLYPH: &str = "**";
const OFF_GLYPH: &str = "  ";
const CELL_SIZE: usize = std::mem::size_of::<f32>();

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    /// Zero-filled `rows x cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let len = checked_len(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            data: vec![0.0; len],
        })
    }

    /// Build a matrix from a row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self> {
        let len = checked_len(rows, cols)?;
        if data.len() != len {
            return Err(Error::InvalidSize(format!(
                "data length {} does not match {rows}x{cols}",
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Self::new(n, n)?;
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        Ok(m)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of elements (`rows * cols`).
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false: a matrix has at least one element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major view of the elements.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Transpose in place and return `self` for chaining.
    ///
    /// Fills a fresh buffer of the same length, then replaces the old one.
    pub fn transpose(&mut self) -> &mut Self {
        let (rows, cols) = (self.rows, self.cols);
        let mut t = vec![0.0; self.data.len()];
        for t_row in 0..cols {
            for t_col in 0..rows {
                t[t_row * rows + t_col] = self.data[t_col * cols + t_row];
            }
        }
        self.data = t;
        self.rows = cols;
        self.cols = rows;
        self
    }

    /// Reshape to a `(rows * cols) x 1` column, keeping row-major element order.
    pub fn vectorize(&mut self) -> &mut Self {
        self.rows = self.data.len();
        self.cols = 1;
        self
    }

    /// Element-wise (Hadamard) product.
    pub fn dot(&self, other: &Matrix) -> Result<Matrix> {
        self.check_same_shape(other)?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a * b)
            .collect();
        Ok(self.with_data(data))
    }

    /// Frobenius norm.
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Flat row-major index of the largest element; the first one wins on ties.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        let mut best_val = self.data[0];
        for (i, &v) in self.data.iter().enumerate().skip(1) {
            if v > best_val {
                best_val = v;
                best = i;
            }
        }
        best
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    /// Element-wise sum, returned as a new matrix.
    pub fn add(&self, rhs: &Matrix) -> Result<Matrix> {
        self.check_same_shape(rhs)?;
        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(a, b)| a + b)
            .collect();
        Ok(self.with_data(data))
    }

    /// Element-wise accumulate into `self`.
    pub fn add_in_place(&mut self, rhs: &Matrix) -> Result<&mut Self> {
        self.check_same_shape(rhs)?;
        for (a, b) in self.data.iter_mut().zip(&rhs.data) {
            *a += b;
        }
        Ok(self)
    }

    /// Matrix product `self * rhs`, shaped `self.rows x rhs.cols`.
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(Error::MultiplicationSize(format!(
                "{}x{} * {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )));
        }
        let mut out = vec![0.0; self.rows * rhs.cols];
        gemm_f32(
            self.rows, rhs.cols, self.cols, &self.data, &rhs.data, &mut out,
        );
        Ok(Matrix {
            rows: self.rows,
            cols: rhs.cols,
            data: out,
        })
    }

    /// Every element multiplied by `c`.
    pub fn scale(&self, c: f32) -> Matrix {
        self.map(|v| v * c)
    }

    /// Element `(i, j)`.
    pub fn at(&self, i: usize, j: usize) -> Result<f32> {
        let idx = self.flat_index(i, j)?;
        Ok(self.data[idx])
    }

    /// Mutable element `(i, j)`.
    pub fn at_mut(&mut self, i: usize, j: usize) -> Result<&mut f32> {
        let idx = self.flat_index(i, j)?;
        Ok(&mut self.data[idx])
    }

    /// Element at a flat row-major index.
    pub fn get(&self, index: usize) -> Result<f32> {
        self.data
            .get(index)
            .copied()
            .ok_or_else(|| self.flat_out_of_range(index))
    }

    /// Mutable element at a flat row-major index.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut f32> {
        let len = self.data.len();
        self.data
            .get_mut(index)
            .ok_or_else(|| Error::OutOfRange(format!("index {index} in matrix of {len}")))
    }

    /// Fill from a raw stream of `rows * cols` little-endian `f32` values.
    ///
    /// The stream must hold exactly `rows * cols * 4` bytes. At most one byte past
    /// that is consumed, so an oversized or endless source is rejected without
    /// being buffered. On failure `self` is left untouched.
    pub fn fill_from_reader<R: Read>(&mut self, reader: R) -> Result<()> {
        let expected = self.data.len() * CELL_SIZE;
        let mut bytes = Vec::with_capacity(expected + 1);
        reader
            .take(expected as u64 + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| Error::InvalidData(format!("failed to read matrix values: {e}")))?;
        self.fill_from_bytes(&bytes)
    }

    /// Fill from raw little-endian `f32` bytes; see [`Matrix::fill_from_reader`].
    pub fn fill_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let expected = self.data.len() * CELL_SIZE;
        if bytes.len() != expected {
            return Err(Error::InvalidData(format!(
                "wrong byte length for the matrix: expected {expected} bytes for {}x{}, got {}",
                self.rows,
                self.cols,
                bytes.len()
            )));
        }

        let values: Vec<f32> = bytes
            .chunks_exact(CELL_SIZE)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        self.data = values;
        Ok(())
    }

    /// Row-major little-endian bytes; the inverse of [`Matrix::fill_from_bytes`].
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * CELL_SIZE);
        for v in &self.data {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out
    }

    /// Space-separated values, one row per line.
    pub fn plain(&self) -> Plain<'_> {
        Plain(self)
    }

    #[inline]
    pub(crate) fn map(&self, f: impl Fn(f32) -> f32) -> Matrix {
        self.with_data(self.data.iter().map(|&v| f(v)).collect())
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[inline]
    fn with_data(&self, data: Vec<f32>) -> Matrix {
        debug_assert_eq!(data.len(), self.data.len());
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data,
        }
    }

    fn check_same_shape(&self, other: &Matrix) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::DimensionMismatch(format!(
                "{}x{} vs {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        Ok(())
    }

    #[inline]
    fn flat_index(&self, i: usize, j: usize) -> Result<usize> {
        if i >= self.rows || j >= self.cols {
            return Err(Error::OutOfRange(format!(
                "({i}, {j}) in {}x{} matrix",
                self.rows, self.cols
            )));
        }
        Ok(i * self.cols + j)
    }

    fn flat_out_of_range(&self, index: usize) -> Error {
        Error::OutOfRange(format!("index {index} in matrix of {}", self.data.len()))
    }
}

impl Default for Matrix {
    /// A single zero (`1x1`).
    fn default() -> Self {
        Self {
            rows: 1,
            cols: 1,
            data: vec![0.0],
        }
    }
}

fn checked_len(rows: usize, cols: usize) -> Result<usize> {
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidSize(format!(
            "matrix dims must be > 0, got {rows}x{cols}"
        )));
    }
    rows.checked_mul(cols)
        .ok_or_else(|| Error::InvalidSize(format!("matrix shape {rows}x{cols} overflows")))
}

impl Mul<f32> for &Matrix {
    type Output = Matrix;

    fn mul(self, c: f32) -> Matrix {
        self.scale(c)
    }
}

impl Mul<f32> for Matrix {
    type Output = Matrix;

    fn mul(mut self, c: f32) -> Matrix {
        for v in &mut self.data {
            *v *= c;
        }
        self
    }
}

impl Mul<&Matrix> for f32 {
    type Output = Matrix;

    fn mul(self, rhs: &Matrix) -> Matrix {
        rhs * self
    }
}

/// Image preview: `**` for values above [`RENDER_THRESHOLD`], blanks otherwise.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.data.chunks(self.cols) {
            for &v in row {
                f.write_str(if v > RENDER_THRESHOLD { ON_GLYPH } else { OFF_GLYPH })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// See [`Matrix::plain`].
pub struct Plain<'a>(&'a Matrix);

impl fmt::Display for Plain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.data.chunks(self.0.cols) {
            for v in row {
                write!(f, "{v} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
