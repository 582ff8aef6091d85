use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Non-positive matrix dimension, or a layer weight/bias shape that does not fit.
    InvalidSize(String),
    /// Element-wise operation on matrices of different shapes.
    DimensionMismatch(String),
    /// Matrix product with `lhs.cols != rhs.rows`.
    MultiplicationSize(String),
    /// Element access outside the matrix.
    OutOfRange(String),
    /// Malformed raw float stream, model file or I/O failure.
    InvalidData(String),
    /// Network layers that do not chain.
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSize(msg) => write!(f, "invalid size: {msg}"),
            Error::DimensionMismatch(msg) => write!(f, "dimension mismatch: {msg}"),
            Error::MultiplicationSize(msg) => {
                write!(f, "matrices are not in the right size to multiply: {msg}")
            }
            Error::OutOfRange(msg) => write!(f, "index out of range: {msg}"),
            Error::InvalidData(msg) => write!(f, "invalid data: {msg}"),
            Error::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
