//! Error types for per-item node execution.

use thiserror::Error;

/// Failure while processing a single input item.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("no binary data property '{property}' exists on item")]
    MissingBinaryData { property: String },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("invalid service account credentials: {0}")]
    InvalidCredentials(String),

    #[error("document content is not valid base64: {0}")]
    InvalidContent(#[from] base64::DecodeError),

    #[error("Document AI request failed: {0:#}")]
    RemoteCall(anyhow::Error),
}

impl NodeError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// A per-item failure that aborts the whole execution.
///
/// Carries the index of the input item that caused it.
#[derive(Debug, Error)]
#[error("item {item_index}: {source}")]
pub struct NodeOperationError {
    pub item_index: usize,
    #[source]
    pub source: NodeError,
}
