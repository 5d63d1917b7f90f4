use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("clash: entry '{entry_name}' claims overlapping segments in cluster '{cluster_name}'")]
    Clash { cluster_name: String, entry_name: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
