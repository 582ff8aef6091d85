//! Activation functions.
//!
//! A dense layer computes a pre-activation value `z = W x + b` and then applies an
//! activation: `y = activation(z)`. Both activations here are pure and return a new
//! matrix of the same shape as their input.

use crate::Matrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Activation applied by a [`crate::Dense`] layer.
pub enum Activation {
    /// Element-wise `max(0, x)`.
    Relu,
    /// `exp(x_i) / sum_j exp(x_j)` over every element of the matrix.
    Softmax,
}

impl Activation {
    #[inline]
    pub fn apply(self, mat: &Matrix) -> Matrix {
        match self {
            Activation::Relu => relu(mat),
            Activation::Softmax => softmax(mat),
        }
    }
}

pub fn relu(mat: &Matrix) -> Matrix {
    mat.map(|x| if x <= 0.0 { 0.0 } else { x })
}

/// Softmax over all elements, regardless of shape.
///
/// The maximum is subtracted before exponentiation, so large inputs do not
/// overflow to `inf`.
pub fn softmax(mat: &Matrix) -> Matrix {
    let max = mat
        .as_slice()
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);

    let mut out = mat.map(|x| (x - max).exp());
    let inv_sum = 1.0 / out.sum();
    for v in out.data_mut() {
        *v *= inv_sum;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: usize, cols: usize, data: &[f32]) -> Matrix {
        Matrix::from_vec(rows, cols, data.to_vec()).unwrap()
    }

    #[test]
    fn relu_clamps_negatives() {
        let a = m(2, 2, &[-2.0, 0.0, 3.0, -0.5]);
        let r = relu(&a);
        assert_eq!(r.shape(), (2, 2));
        assert_eq!(r.as_slice(), &[0.0, 0.0, 3.0, 0.0]);
    }

    #[test]
    fn softmax_basic_values() {
        let a = m(3, 1, &[0.0, 0.0, 0.0]);
        let s = softmax(&a);
        for &v in s.as_slice() {
            assert!((v - 1.0 / 3.0).abs() < 1e-6);
        }

        let b = m(2, 1, &[0.0, 1.0_f32.ln()]);
        let s = softmax(&b);
        assert!((s.sum() - 1.0).abs() < 1e-6);

        let c = m(2, 1, &[0.0, 2.0_f32.ln()]);
        let s = softmax(&c);
        assert!((s.as_slice()[1] - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn softmax_spans_all_elements_of_any_shape() {
        let a = m(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let s = softmax(&a);
        assert_eq!(s.shape(), (2, 2));
        assert!((s.sum() - 1.0).abs() < 1e-6);
        assert_eq!(s.argmax(), 3);
    }

    #[test]
    fn softmax_large_inputs_stay_finite() {
        let a = m(3, 1, &[1000.0, 1000.0, 999.0]);
        let s = softmax(&a);
        assert!(s.as_slice().iter().all(|v| v.is_finite()));
        assert!((s.sum() - 1.0).abs() < 1e-6);
        assert!((s.as_slice()[0] - s.as_slice()[1]).abs() < 1e-7);
    }

    #[test]
    fn apply_dispatches() {
        let a = m(1, 2, &[-1.0, 1.0]);
        assert_eq!(Activation::Relu.apply(&a), relu(&a));
        assert_eq!(Activation::Softmax.apply(&a), softmax(&a));
    }
}
