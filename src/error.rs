use thiserror::Error;

/// Failures of the addressing engine: `get`, `set` and `scan`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("{node} has no item \"{address}\"")]
    NotFound { address: String, node: String },
    #[error("scan values for \"{address}\" have length {found}, expected {expected}")]
    LengthMismatch {
        address: String,
        expected: usize,
        found: usize,
    },
}

impl GraphError {
    pub(crate) fn not_found(address: impl ToString, node: impl ToString) -> Self {
        GraphError::NotFound {
            address: address.to_string(),
            node: node.to_string(),
        }
    }
}

/// Failures while lowering or evaluating a node tree.
#[derive(Error, Debug)]
pub enum ComputeError {
    #[error("unknown function \"{0}\"")]
    UnknownFunction(String),
    #[error("{func} failed: {message}")]
    Call { func: String, message: String },
    #[error("cache I/O error: {0}")]
    Cache(#[from] std::io::Error),
    #[error("cache encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while saving or loading a node tree.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
