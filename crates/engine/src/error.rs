//! Error taxonomy for the catalog query engine.

use thiserror::Error;

use crate::filters::FilterError;

/// Fatal failures surfaced to callers of the list and detail operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Generic filter translation failed; no partial results are returned.
    #[error("filters invalid: {0}")]
    InvalidFilter(#[from] FilterError),
    /// The caller-supplied store identifier resolved to nothing.
    #[error("unknown store '{0}'")]
    UnknownStore(String),
    /// The reserved `category` control referenced a category that does not exist.
    #[error("unknown category id {0}")]
    UnknownCategory(u64),
    /// Single-product lookup found no match for the identifier.
    #[error("product not found for identifier '{0}'")]
    ProductNotFound(String),
    /// A collection listener failed; the whole list call is aborted.
    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Failure raised by a collection listener during the extension hook.
#[derive(Debug, Clone, Error)]
#[error("collection listener '{listener}' failed: {message}")]
pub struct ListenerError {
    pub listener: String,
    pub message: String,
}

impl ListenerError {
    pub fn new(listener: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            listener: listener.into(),
            message: message.into(),
        }
    }
}
