use crate::{Activation, Error, Matrix, Result};

/// Fully-connected layer: `output = activation(weights * input + bias)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dense {
    /// Shape `(out_dim, in_dim)`.
    weights: Matrix,
    /// Shape `(out_dim, 1)`.
    bias: Matrix,
    activation: Activation,
}

impl Dense {
    /// Build a layer, validating that `bias` is a column with one entry per weight row.
    pub fn new(weights: Matrix, bias: Matrix, activation: Activation) -> Result<Self> {
        if bias.cols() != 1 || weights.rows() != bias.rows() {
            return Err(Error::InvalidSize(format!(
                "bias {}x{} does not fit weights {}x{}",
                bias.rows(),
                bias.cols(),
                weights.rows(),
                weights.cols()
            )));
        }
        Ok(Self {
            weights,
            bias,
            activation,
        })
    }

    #[inline]
    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    #[inline]
    pub fn bias(&self) -> &Matrix {
        &self.bias
    }

    #[inline]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.weights.cols()
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.weights.rows()
    }

    /// Forward pass for a column input of shape `(in_dim, 1)`.
    ///
    /// A row-count mismatch surfaces as [`Error::MultiplicationSize`]; an input with
    /// more than one column fails the bias addition with [`Error::DimensionMismatch`].
    pub fn forward(&self, input: &Matrix) -> Result<Matrix> {
        let mut z = self.weights.matmul(input)?;
        z.add_in_place(&self.bias)?;
        Ok(self.activation.apply(&z))
    }
}
