//! Network serialization/deserialization (feature: `serde`).
//!
//! This module defines a versioned JSON format for `MlpNetwork`, as an alternative
//! to the eight raw float files read by [`crate::weights`].
//!
//! Design notes:
//! - We do NOT directly serialize `MlpNetwork`/`Dense`, to keep the file format
//!   stable even if internal representation changes.
//! - Deserialization validates the version, layer count, shapes, activation order
//!   and that all parameters are finite.

use serde::{Deserialize, Serialize};

use std::path::Path;

use crate::mlp::{ACTIVATIONS, MLP_SIZE};
use crate::{Activation, Dense, Error, Matrix, MlpNetwork, Result};

pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNetwork {
    pub format_version: u32,
    pub layers: Vec<SerializedLayer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedLayer {
    /// Output dimension.
    pub rows: usize,
    /// Input dimension.
    pub cols: usize,
    pub activation: SerializedActivation,
    /// Row-major (rows, cols).
    pub weights: Vec<f32>,
    pub biases: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializedActivation {
    Relu,
    Softmax,
}

impl From<Activation> for SerializedActivation {
    fn from(value: Activation) -> Self {
        match value {
            Activation::Relu => SerializedActivation::Relu,
            Activation::Softmax => SerializedActivation::Softmax,
        }
    }
}

impl SerializedActivation {
    fn into_activation(self) -> Activation {
        match self {
            SerializedActivation::Relu => Activation::Relu,
            SerializedActivation::Softmax => Activation::Softmax,
        }
    }
}

impl SerializedNetwork {
    pub fn validate(&self) -> Result<()> {
        if self.format_version != MODEL_FORMAT_VERSION {
            return Err(Error::InvalidData(format!(
                "unsupported model format_version {}; expected {}",
                self.format_version, MODEL_FORMAT_VERSION
            )));
        }
        if self.layers.len() != MLP_SIZE {
            return Err(Error::InvalidData(format!(
                "serialized model must have {MLP_SIZE} layers, got {}",
                self.layers.len()
            )));
        }

        for (i, layer) in self.layers.iter().enumerate() {
            layer
                .validate()
                .map_err(|e| Error::InvalidData(format!("layer {i} invalid: {e}")))?;

            let expected = ACTIVATIONS[i];
            if layer.activation.into_activation() != expected {
                return Err(Error::InvalidData(format!(
                    "layer {i} activation {:?} does not match expected {expected:?}",
                    layer.activation
                )));
            }
        }

        Ok(())
    }
}

impl SerializedLayer {
    fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::InvalidData(format!(
                "layer dims must be > 0, got rows={} cols={}",
                self.rows, self.cols
            )));
        }

        let expected_w = self
            .rows
            .checked_mul(self.cols)
            .ok_or_else(|| Error::InvalidData("layer weight shape overflow".to_owned()))?;
        if self.weights.len() != expected_w {
            return Err(Error::InvalidData(format!(
                "weights length {} does not match rows * cols ({} * {})",
                self.weights.len(),
                self.rows,
                self.cols
            )));
        }
        if self.biases.len() != self.rows {
            return Err(Error::InvalidData(format!(
                "biases length {} does not match rows {}",
                self.biases.len(),
                self.rows
            )));
        }

        if self.weights.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "weights must contain only finite values".to_owned(),
            ));
        }
        if self.biases.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidData(
                "biases must contain only finite values".to_owned(),
            ));
        }

        Ok(())
    }
}

impl From<&Dense> for SerializedLayer {
    fn from(layer: &Dense) -> Self {
        Self {
            rows: layer.out_dim(),
            cols: layer.in_dim(),
            activation: SerializedActivation::from(layer.activation()),
            weights: layer.weights().as_slice().to_vec(),
            biases: layer.bias().as_slice().to_vec(),
        }
    }
}

impl From<&MlpNetwork> for SerializedNetwork {
    fn from(net: &MlpNetwork) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            layers: net.layers().iter().map(SerializedLayer::from).collect(),
        }
    }
}

impl TryFrom<SerializedNetwork> for MlpNetwork {
    type Error = Error;

    fn try_from(value: SerializedNetwork) -> std::result::Result<Self, Self::Error> {
        value.validate()?;

        let mut weights: [Matrix; MLP_SIZE] = Default::default();
        let mut biases: [Matrix; MLP_SIZE] = Default::default();
        for (i, layer) in value.layers.into_iter().enumerate() {
            weights[i] = Matrix::from_vec(layer.rows, layer.cols, layer.weights)?;
            biases[i] = Matrix::from_vec(layer.rows, 1, layer.biases)?;
        }

        // Chain validation happens here.
        MlpNetwork::new(weights, biases)
    }
}

impl MlpNetwork {
    /// Serialize the network to a pretty-printed JSON string.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        let ser = SerializedNetwork::from(self);
        serde_json::to_string_pretty(&ser)
            .map_err(|e| Error::InvalidData(format!("failed to serialize model: {e}")))
    }

    /// Serialize the network to a compact JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        let ser = SerializedNetwork::from(self);
        serde_json::to_string(&ser)
            .map_err(|e| Error::InvalidData(format!("failed to serialize model: {e}")))
    }

    /// Parse a network from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let ser: SerializedNetwork = serde_json::from_str(s)
            .map_err(|e| Error::InvalidData(format!("failed to parse model json: {e}")))?;
        ser.try_into()
    }

    /// Save the network to a JSON file (pretty-printed).
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let s = self.to_json_string_pretty()?;
        let p = path.as_ref();
        std::fs::write(p, s)
            .map_err(|e| Error::InvalidData(format!("failed to write {}: {e}", p.display())))?;
        Ok(())
    }

    /// Load a network from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let s = std::fs::read_to_string(p)
            .map_err(|e| Error::InvalidData(format!("failed to read {}: {e}", p.display())))?;
        Self::from_json_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_network() -> MlpNetwork {
        let weights = [
            Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap(),
            Matrix::identity(2).unwrap(),
            Matrix::from_vec(1, 2, vec![0.5, -0.5]).unwrap(),
            Matrix::from_vec(2, 1, vec![1.0, -1.0]).unwrap(),
        ];
        let biases = [
            Matrix::from_vec(2, 1, vec![0.1, 0.2]).unwrap(),
            Matrix::new(2, 1).unwrap(),
            Matrix::new(1, 1).unwrap(),
            Matrix::from_vec(2, 1, vec![0.0, 0.25]).unwrap(),
        ];
        MlpNetwork::new(weights, biases).unwrap()
    }

    #[test]
    fn json_roundtrips() {
        let net = tiny_network();
        let json = net.to_json_string().unwrap();
        assert!(json.contains(r#""activation":"softmax""#));

        let loaded = MlpNetwork::from_json_str(&json).unwrap();
        assert_eq!(loaded, net);
    }

    #[test]
    fn rejects_unknown_version() {
        let bad = r#"{"format_version":999,"layers":[]}"#;
        let err = MlpNetwork::from_json_str(bad).unwrap_err();
        assert!(format!("{err}").contains("format_version"));
    }

    #[test]
    fn rejects_wrong_activation_order() {
        let mut ser = SerializedNetwork::from(&tiny_network());
        ser.layers[0].activation = SerializedActivation::Softmax;
        let err = MlpNetwork::try_from(ser).unwrap_err();
        assert!(format!("{err}").contains("activation"));
    }

    #[test]
    fn rejects_broken_chain() {
        let mut ser = SerializedNetwork::from(&tiny_network());
        ser.layers[1] = SerializedLayer {
            rows: 2,
            cols: 3,
            activation: SerializedActivation::Relu,
            weights: vec![0.0; 6],
            biases: vec![0.0; 2],
        };
        let err = MlpNetwork::try_from(ser).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut ser = SerializedNetwork::from(&tiny_network());
        ser.layers[2].weights[0] = f32::NAN;
        assert!(ser.validate().is_err());
    }
}
