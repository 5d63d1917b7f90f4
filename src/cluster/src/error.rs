use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
