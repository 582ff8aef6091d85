//! Raw weight/bias files.
//!
//! Each file is a headerless run of little-endian `f32` values in row-major order,
//! exactly `rows * cols * 4` bytes long. Shapes are not stored in the file; callers
//! pass them in (for the network, see [`WEIGHT_DIMS`] and [`BIAS_DIMS`]).

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::mlp::{BIAS_DIMS, MLP_SIZE, WEIGHT_DIMS};
use crate::{Error, Matrix, MlpNetwork, Result};

/// Read a `rows x cols` matrix from a raw float file.
pub fn read_matrix<P: AsRef<Path>>(path: P, rows: usize, cols: usize) -> Result<Matrix> {
    let p = path.as_ref();
    let file = File::open(p)
        .map_err(|e| Error::InvalidData(format!("failed to open {}: {e}", p.display())))?;

    let mut mat = Matrix::new(rows, cols)?;
    mat.fill_from_reader(BufReader::new(file))
        .map_err(|e| match e {
            Error::InvalidData(msg) => Error::InvalidData(format!("{}: {msg}", p.display())),
            other => other,
        })?;
    Ok(mat)
}

/// Write a matrix as raw little-endian floats.
pub fn write_matrix<P: AsRef<Path>>(path: P, mat: &Matrix) -> Result<()> {
    let p = path.as_ref();
    std::fs::write(p, mat.to_le_bytes())
        .map_err(|e| Error::InvalidData(format!("failed to write {}: {e}", p.display())))
}

impl MlpNetwork {
    /// Load the network from four weight files and four bias files, in layer order.
    pub fn load<P: AsRef<Path>>(weight_paths: &[P], bias_paths: &[P]) -> Result<Self> {
        if weight_paths.len() != MLP_SIZE || bias_paths.len() != MLP_SIZE {
            return Err(Error::InvalidConfig(format!(
                "expected {MLP_SIZE} weight and {MLP_SIZE} bias files, got {} and {}",
                weight_paths.len(),
                bias_paths.len()
            )));
        }

        let mut weights: [Matrix; MLP_SIZE] = Default::default();
        let mut biases: [Matrix; MLP_SIZE] = Default::default();
        let files = weight_paths.iter().zip(bias_paths);
        let dims = WEIGHT_DIMS.iter().zip(BIAS_DIMS.iter());
        let slots = weights.iter_mut().zip(biases.iter_mut());
        for (((wp, bp), (&(wr, wc), &(br, bc))), (w, b)) in files.zip(dims).zip(slots) {
            *w = read_matrix(wp, wr, wc)?;
            *b = read_matrix(bp, br, bc)?;
        }

        Self::new(weights, biases)
    }

    /// Write every layer's weights and bias back out as raw float files.
    pub fn save<P: AsRef<Path>>(&self, weight_paths: &[P], bias_paths: &[P]) -> Result<()> {
        if weight_paths.len() != MLP_SIZE || bias_paths.len() != MLP_SIZE {
            return Err(Error::InvalidConfig(format!(
                "expected {MLP_SIZE} weight and {MLP_SIZE} bias files, got {} and {}",
                weight_paths.len(),
                bias_paths.len()
            )));
        }

        for (layer, (wp, bp)) in self.layers().iter().zip(weight_paths.iter().zip(bias_paths)) {
            write_matrix(wp, layer.weights())?;
            write_matrix(bp, layer.bias())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_matrix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wr.bin");
        let mat = Matrix::from_vec(2, 3, vec![0.5, -1.0, 2.0, 3.25, 0.0, 1e-3]).unwrap();
        write_matrix(&path, &mat).unwrap();

        assert_eq!(std::fs::metadata(&path).unwrap().len(), 24);
        assert_eq!(read_matrix(&path, 2, 3).unwrap(), mat);

        let err = read_matrix(&path, 2, 2).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(err.to_string().contains("wr.bin"));
    }

    #[test]
    fn missing_file_is_invalid_data() {
        let dir = tempdir().unwrap();
        let err = read_matrix(dir.path().join("does_not_exist.bin"), 1, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn load_requires_four_paths_each() {
        let paths = ["a", "b", "c"];
        let err = MlpNetwork::load(&paths, &paths).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn load_reads_each_layer_with_its_own_shape() {
        let dir = tempdir().unwrap();
        let path = |name: &str| dir.path().join(name);
        let (wp, bp): (Vec<_>, Vec<_>) = (1..=MLP_SIZE)
            .map(|i| (path(&format!("w{i}")), path(&format!("b{i}"))))
            .unzip();
        for ((w, b), (&(wr, wc), &(br, bc))) in wp
            .iter()
            .zip(&bp)
            .zip(WEIGHT_DIMS.iter().zip(BIAS_DIMS.iter()))
        {
            write_matrix(w, &Matrix::new(wr, wc).unwrap()).unwrap();
            write_matrix(b, &Matrix::new(br, bc).unwrap()).unwrap();
        }

        let net = MlpNetwork::load(&wp, &bp).unwrap();
        for (layer, (&w, &b)) in net.layers().iter().zip(WEIGHT_DIMS.iter().zip(BIAS_DIMS.iter())) {
            assert_eq!(layer.weights().shape(), w);
            assert_eq!(layer.bias().shape(), b);
        }

        let out = dir.path().join("out");
        std::fs::create_dir(&out).unwrap();
        let (swp, sbp): (Vec<_>, Vec<_>) = (1..=MLP_SIZE)
            .map(|i| (out.join(format!("w{i}")), out.join(format!("b{i}"))))
            .unzip();
        net.save(&swp, &sbp).unwrap();
        assert_eq!(std::fs::read(&swp[2]).unwrap(), std::fs::read(&wp[2]).unwrap());
        assert_eq!(std::fs::read(&sbp[3]).unwrap(), std::fs::read(&bp[3]).unwrap());
    }
}
