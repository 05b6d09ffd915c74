//! Service Layer Error Types
//!
//! This module defines the errors surfaced by node store operations. Every
//! variant is raised before the store mutates anything, so a failed operation
//! leaves the node collection untouched and fires no notification.

use crate::models::ValidationError;
use thiserror::Error;

/// Node store operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeStoreError {
    /// Operation referenced an id absent from the collection
    #[error("Node not found: {id}")]
    NotFound { id: String },

    /// Operation required a folder but the id resolves to another variant
    #[error("Node is not a folder: {id}")]
    NotAFolder { id: String },

    /// Move would create a cycle or targets a non-folder
    #[error("Invalid move of {node_id} under {target_id}: {reason}")]
    InvalidMove {
        node_id: String,
        target_id: String,
        reason: String,
    },

    /// Field validation failed
    #[error("Node validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Store configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl NodeStoreError {
    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a not-a-folder error
    pub fn not_a_folder(id: impl Into<String>) -> Self {
        Self::NotAFolder { id: id.into() }
    }

    /// Create an invalid move error
    pub fn invalid_move(
        node_id: impl Into<String>,
        target_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidMove {
            node_id: node_id.into(),
            target_id: target_id.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
