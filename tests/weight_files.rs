//! Loading the network from raw little-endian float files.

use std::path::PathBuf;

use digit_mlp::mlp::{BIAS_DIMS, MLP_SIZE, WEIGHT_DIMS};
use digit_mlp::{Error, Matrix, MlpNetwork, read_matrix, write_matrix};
use tempfile::{TempDir, tempdir};

fn layer_paths(dir: &TempDir, prefix: &str) -> Vec<PathBuf> {
    (1..=MLP_SIZE)
        .map(|i| dir.path().join(format!("{prefix}{i}")))
        .collect()
}

fn sample_network() -> MlpNetwork {
    let mut w = WEIGHT_DIMS.map(|(r, c)| Matrix::new(r, c).unwrap());
    let b = BIAS_DIMS.map(|(r, c)| Matrix::new(r, c).unwrap());
    for k in 0..784 {
        *w[0].at_mut(0, k).unwrap() = 0.5;
    }
    *w[1].at_mut(0, 0).unwrap() = 1.0;
    *w[2].at_mut(0, 0).unwrap() = 1.0;
    *w[3].at_mut(6, 0).unwrap() = 1.0;
    MlpNetwork::new(w, b).unwrap()
}

#[test]
fn saved_network_loads_back_identically() {
    let dir = tempdir().unwrap();
    let (wp, bp) = (layer_paths(&dir, "w"), layer_paths(&dir, "b"));

    let net = sample_network();
    net.save(&wp, &bp).unwrap();
    assert_eq!(std::fs::metadata(&wp[0]).unwrap().len(), 128 * 784 * 4);
    assert_eq!(std::fs::metadata(&bp[3]).unwrap().len(), 10 * 4);

    let loaded = MlpNetwork::load(&wp, &bp).unwrap();
    assert_eq!(loaded, net);

    let image_path = dir.path().join("image");
    write_matrix(&image_path, &Matrix::from_vec(28, 28, vec![0.01; 784]).unwrap()).unwrap();
    let mut image = read_matrix(&image_path, 28, 28).unwrap();
    assert_eq!(loaded.classify(&mut image).unwrap().class_index, 6);
}

#[test]
fn truncated_weight_file_is_rejected() {
    let dir = tempdir().unwrap();
    let (wp, bp) = (layer_paths(&dir, "w"), layer_paths(&dir, "b"));
    sample_network().save(&wp, &bp).unwrap();

    let bytes = std::fs::read(&wp[2]).unwrap();
    std::fs::write(&wp[2], &bytes[..bytes.len() - 4]).unwrap();

    let err = MlpNetwork::load(&wp, &bp).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)), "{err}");
}

#[test]
fn swapped_files_are_rejected() {
    let dir = tempdir().unwrap();
    let (mut wp, bp) = (layer_paths(&dir, "w"), layer_paths(&dir, "b"));
    sample_network().save(&wp, &bp).unwrap();

    wp.swap(1, 2);
    assert!(MlpNetwork::load(&wp, &bp).is_err());
}

#[test]
fn oversized_image_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("big_image");
    std::fs::write(&path, vec![0u8; 1 << 20]).unwrap();

    let err = read_matrix(&path, 28, 28).unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)), "{err}");
    assert!(err.to_string().contains("got 3137"), "{err}");
}
