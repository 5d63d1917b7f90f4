use thiserror::Error;

use graph::GraphError;

#[derive(Error, Debug)]
pub enum SuperposeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Disconnected(#[from] GraphError),

    #[error("insufficient common atoms between structures {a} and {b}: found {found}, need at least 3")]
    InsufficientCommonAtoms { a: usize, b: usize, found: usize },

    #[error(transparent)]
    Geometry(#[from] geometry::GeometryError),
}
