//! Error types for the det-eval library.

use thiserror::Error;

/// Result type for det-eval operations.
pub type Result<T> = std::result::Result<T, DetEvalError>;

/// Error types that can occur during detection evaluation.
///
/// Only structural problems are reported here. Numeric degeneracies (empty
/// boxes, zero ground truth) are absorbed by the metrics themselves.
#[derive(Error, Debug)]
pub enum DetEvalError {
    /// Error during JSON parsing of an evaluation config.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error during I/O operations.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Collections that must be parallel (per image, per box) have different lengths.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Empty dataset provided.
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    /// Invalid IoU threshold.
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Invalid evaluation parameter (e.g. an empty proposal count list).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
