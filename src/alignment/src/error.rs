use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlignmentError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("numerical failure: {0}")]
    Numerical(String),
}
