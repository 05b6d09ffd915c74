//! Domain Events for NodeStore
//!
//! Typed change events emitted alongside the payload-free listener callbacks.
//! Consumers that want to know *what* changed (for logging, sync bridges or
//! incremental caches) subscribe with `NodeStore::subscribe_to_events()`.
//!
//! # Event Flow
//!
//! 1. NodeStore commits a mutation and releases its lock
//! 2. Listener callbacks fire synchronously
//! 3. One `StoreEvent` is sent on a tokio broadcast channel
//! 4. Receivers pick it up asynchronously; lagging receivers drop old events

use crate::models::NodeType;
use serde::{Deserialize, Serialize};

/// Events emitted by NodeStore, one per committed mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StoreEvent {
    /// A node was created
    #[serde(rename = "node:created", rename_all = "camelCase")]
    NodeCreated {
        id: String,
        node_type: NodeType,
        parent_id: Option<String>,
    },

    /// Fields of an existing node were updated
    #[serde(rename = "node:updated")]
    NodeUpdated { id: String },

    /// A node and its whole subtree were deleted
    #[serde(rename = "node:deleted")]
    NodesDeleted { ids: Vec<String> },

    /// A node was moved under a new parent (or detached to the root level)
    #[serde(rename = "node:moved", rename_all = "camelCase")]
    NodeMoved {
        id: String,
        old_parent_id: Option<String>,
        new_parent_id: Option<String>,
    },

    /// A folder's expanded flag was flipped
    #[serde(rename = "folder:toggled")]
    FolderToggled { id: String, expanded: bool },
}

impl StoreEvent {
    /// String name of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            StoreEvent::NodeCreated { .. } => "node:created",
            StoreEvent::NodeUpdated { .. } => "node:updated",
            StoreEvent::NodesDeleted { .. } => "node:deleted",
            StoreEvent::NodeMoved { .. } => "node:moved",
            StoreEvent::FolderToggled { .. } => "folder:toggled",
        }
    }

    /// Id of the node the event is about (the subtree root for deletions)
    pub fn primary_id(&self) -> Option<&str> {
        match self {
            StoreEvent::NodeCreated { id, .. }
            | StoreEvent::NodeUpdated { id }
            | StoreEvent::NodeMoved { id, .. }
            | StoreEvent::FolderToggled { id, .. } => Some(id),
            StoreEvent::NodesDeleted { ids } => ids.first().map(String::as_str),
        }
    }
}
