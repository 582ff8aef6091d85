//! A small dense-matrix crate and a fixed 4-layer MLP for digit classification.
//!
//! `digit-mlp` runs inference only: weights come from elsewhere (raw float files or,
//! with the `serde` feature, a JSON model), and the network maps a 28x28 image to one
//! of ten classes together with its softmax probability.
//!
//! # Components
//!
//! - [`Matrix`]: row-major `f32` matrix with shape-checked arithmetic, bounds-checked
//!   indexing, reduced row-echelon form, raw stream fill and an image preview.
//! - [`Activation`]: `relu` and `softmax`.
//! - [`Dense`]: `activation(weights * input + bias)`.
//! - [`MlpNetwork`]: `784 -> 128 -> 64 -> 20 -> 10`, `relu, relu, relu, softmax`.
//!
//! # Errors
//!
//! Everything that can fail on caller input returns [`Result`]. Shape problems are
//! reported at the call that sees them; nothing is retried or recovered internally.
//!
//! # Quick start
//!
//! ```rust
//! use digit_mlp::{Matrix, MlpNetwork, mlp::{BIAS_DIMS, WEIGHT_DIMS}};
//!
//! # fn main() -> digit_mlp::Result<()> {
//! let weights = WEIGHT_DIMS.map(|(r, c)| Matrix::new(r, c));
//! let biases = BIAS_DIMS.map(|(r, c)| Matrix::new(r, c));
//! let [w0, w1, w2, w3] = weights;
//! let [b0, b1, b2, b3] = biases;
//! let net = MlpNetwork::new([w0?, w1?, w2?, w3?], [b0?, b1?, b2?, b3?])?;
//!
//! let mut image = Matrix::new(28, 28)?;
//! let digit = net.classify(&mut image)?;
//! assert_eq!(digit.class_index, 0);
//! assert!((digit.probability - 0.1).abs() < 1e-6);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod error;
pub mod layer;
pub(crate) mod matmul;
pub mod matrix;
pub mod mlp;
mod rref;
pub mod weights;

#[cfg(feature = "serde")]
pub mod serde_model;

pub use activation::{Activation, relu, softmax};
pub use error::{Error, Result};
pub use layer::Dense;
pub use matrix::Matrix;
pub use mlp::{Classification, MlpNetwork};
pub use weights::{read_matrix, write_matrix};
