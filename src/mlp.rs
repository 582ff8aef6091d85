//! Fixed-topology digit classifier.
//!
//! Four dense layers, `784 -> 128 -> 64 -> 20 -> 10`, with `relu, relu, relu, softmax`.
//! The input is any matrix holding 784 values (normally a 28x28 image); it is
//! flattened in place into a column before the forward pass.

use crate::{Activation, Dense, Error, Matrix, Result};

/// Number of layers.
pub const MLP_SIZE: usize = 4;

/// Expected image shape `(rows, cols)`.
pub const IMAGE_DIMS: (usize, usize) = (28, 28);

/// Weight shapes `(out_dim, in_dim)`, in layer order.
pub const WEIGHT_DIMS: [(usize, usize); MLP_SIZE] = [(128, 784), (64, 128), (20, 64), (10, 20)];

/// Bias shapes, in layer order.
pub const BIAS_DIMS: [(usize, usize); MLP_SIZE] = [(128, 1), (64, 1), (20, 1), (10, 1)];

/// Activation of each layer, in layer order.
pub const ACTIVATIONS: [Activation; MLP_SIZE] = [
    Activation::Relu,
    Activation::Relu,
    Activation::Relu,
    Activation::Softmax,
];

/// Result of one classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Index of the most probable class.
    pub class_index: u32,
    /// Softmax output at `class_index`.
    pub probability: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MlpNetwork {
    layers: Vec<Dense>,
}

impl MlpNetwork {
    /// Build the network from per-layer weights and biases.
    ///
    /// Each `(weights[i], biases[i])` pair must form a valid [`Dense`] layer, and
    /// consecutive layers must chain: `weights[i].rows() == weights[i + 1].cols()`.
    pub fn new(weights: [Matrix; MLP_SIZE], biases: [Matrix; MLP_SIZE]) -> Result<Self> {
        let mut layers = Vec::with_capacity(MLP_SIZE);
        for (i, ((w, b), act)) in weights.into_iter().zip(biases).zip(ACTIVATIONS).enumerate() {
            let layer = Dense::new(w, b, act).map_err(|e| match e {
                Error::InvalidSize(msg) => Error::InvalidSize(format!("layer {i}: {msg}")),
                other => other,
            })?;
            layers.push(layer);
        }

        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].out_dim() != pair[1].in_dim() {
                return Err(Error::InvalidConfig(format!(
                    "layer {i} out_dim {} does not match layer {} in_dim {}",
                    pair[0].out_dim(),
                    i + 1,
                    pair[1].in_dim()
                )));
            }
        }

        Ok(Self { layers })
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.layers[0].in_dim()
    }

    #[inline]
    pub fn output_dim(&self) -> usize {
        self.layers[MLP_SIZE - 1].out_dim()
    }

    #[inline]
    pub fn layers(&self) -> &[Dense] {
        &self.layers
    }

    /// Runs the four layers on a column input of shape `(input_dim, 1)`.
    ///
    /// Returns the `(output_dim, 1)` softmax output.
    pub fn forward(&self, input: &Matrix) -> Result<Matrix> {
        let mut out = self.layers[0].forward(input)?;
        for layer in &self.layers[1..] {
            out = layer.forward(&out)?;
        }
        Ok(out)
    }

    /// Classify an image.
    ///
    /// `image` is vectorized in place (it is left as an `(n, 1)` column), then fed
    /// through [`MlpNetwork::forward`]. Ties go to the lowest class index.
    pub fn classify(&self, image: &mut Matrix) -> Result<Classification> {
        image.vectorize();
        let out = self.forward(image)?;

        let idx = out.argmax();
        let probability = out.get(idx)?;
        let class_index = u32::try_from(idx)
            .map_err(|_| Error::InvalidConfig(format!("class index {idx} does not fit in u32")))?;

        Ok(Classification {
            class_index,
            probability,
        })
    }
}
