//! Classify 28x28 digit images with a pre-trained 4-layer MLP.
//!
//! ```bash
//! digit-mlp --weights w1 w2 w3 w4 --biases b1 b2 b3 b4 image1.bin image2.bin
//! ```
//!
//! Every file is a raw run of little-endian `f32` values; images hold 784 of them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use digit_mlp::mlp::IMAGE_DIMS;
use digit_mlp::{MlpNetwork, read_matrix};

#[derive(Parser)]
#[command(name = "digit-mlp")]
#[command(about = "Classify 28x28 digit images with a fixed 4-layer MLP")]
#[command(version)]
struct Args {
    /// Weight files for layers 1-4
    #[arg(long, num_args = 4, value_name = "FILE", required = true)]
    weights: Vec<PathBuf>,

    /// Bias files for layers 1-4
    #[arg(long, num_args = 4, value_name = "FILE", required = true)]
    biases: Vec<PathBuf>,

    /// Image files to classify
    #[arg(value_name = "IMAGE", required = true)]
    images: Vec<PathBuf>,

    /// Do not print the image preview
    #[arg(short, long)]
    quiet: bool,

    /// Print raw values instead of the glyph preview
    #[arg(long, conflicts_with = "quiet")]
    plain: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let net = MlpNetwork::load(args.weights.as_slice(), args.biases.as_slice())
        .context("failed to load network parameters")?;

    let mut failures = 0usize;
    for path in &args.images {
        let (rows, cols) = IMAGE_DIMS;
        let mut image = match read_matrix(path, rows, cols) {
            Ok(image) => image,
            Err(e) => {
                eprintln!("skipping {}: {e}", path.display());
                failures += 1;
                continue;
            }
        };

        println!("Image: {}", path.display());
        if args.plain {
            print!("{}", image.plain());
        } else if !args.quiet {
            print!("{image}");
        }

        let digit = net
            .classify(&mut image)
            .with_context(|| format!("failed to classify {}", path.display()))?;
        println!(
            "Mlp result: {} at probability: {}",
            digit.class_index, digit.probability
        );
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} images could not be read", args.images.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_four_weights_and_biases() {
        let args = Args::try_parse_from([
            "digit-mlp", "--weights", "w1", "w2", "w3", "w4", "--biases", "b1", "b2", "b3",
            "b4", "img.bin",
        ])
        .unwrap();
        assert_eq!(args.weights.len(), 4);
        assert_eq!(args.biases.len(), 4);
        assert_eq!(args.images, vec![PathBuf::from("img.bin")]);
        assert!(!args.quiet);
    }

    #[test]
    fn rejects_missing_bias_file() {
        let res = Args::try_parse_from([
            "digit-mlp", "--weights", "w1", "w2", "w3", "w4", "--biases", "b1", "b2", "b3",
        ]);
        assert!(res.is_err());
    }
}
