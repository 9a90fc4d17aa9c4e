//! Error types for result export

use thiserror::Error;

/// Errors raised while exporting level summaries
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Export failed: {0}")]
    ExportError(String),
}
