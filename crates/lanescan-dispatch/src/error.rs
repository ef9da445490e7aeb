use lanescan_core::{DType, ScanError, Shape};

/// Errors surfaced by the dispatch layer.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Kernel(#[from] ScanError),

    #[error("no execution provider accepts {dtype} input of shape {shape}")]
    NoProvider { dtype: DType, shape: Shape },

    #[error("attribute '{name}': {reason}")]
    InvalidAttribute { name: String, reason: String },

    #[error("invalid dispatch config: {0}")]
    Config(String),

    #[error("failed to parse dispatch config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read dispatch config: {0}")]
    Io(#[from] std::io::Error),
}
