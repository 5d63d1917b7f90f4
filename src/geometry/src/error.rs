use thiserror::Error;

/// Errors raised by the geometry kernel (coords, rotations, Kabsch fitting).
#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("numerical failure: {0}")]
    Numerical(String),
}
