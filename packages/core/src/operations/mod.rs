//! Operation Facade
//!
//! `NodeActions` translates user intents ("create a note in this folder and
//! open it") into store calls plus updates to the active selection, the id of
//! the node currently shown in the editing surface.
//!
//! The facade holds no node data. Selection rules:
//!
//! - creating a note or web note selects it; creating a folder does not
//! - deleting clears the selection when the selected node no longer exists
//!   afterwards (the node itself or anything inside a deleted folder)
//! - renaming and moving leave the selection alone

use crate::models::{Node, NodeType, NodeUpdate};
use crate::services::{NodeOperations, NodeStoreError};
use std::sync::{Arc, Mutex, PoisonError};

pub const DEFAULT_FOLDER_TITLE: &str = "New Folder";
pub const DEFAULT_NOTE_TITLE: &str = "New Note";
pub const DEFAULT_WEB_NOTE_TITLE: &str = "New Web Note";
pub const DEFAULT_WEB_NOTE_URL: &str = "https://example.com";

/// User-intent layer over a node store
pub struct NodeActions {
    store: Arc<dyn NodeOperations>,
    active_node_id: Mutex<Option<String>>,
}

impl NodeActions {
    pub fn new(store: Arc<dyn NodeOperations>) -> Self {
        Self {
            store,
            active_node_id: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Arc<dyn NodeOperations> {
        &self.store
    }

    pub fn active_node_id(&self) -> Option<String> {
        self.active().clone()
    }

    /// Fresh copy of the selected node, if it still exists
    pub fn active_node(&self) -> Option<Node> {
        let id = self.active_node_id()?;
        self.store.get_node(&id)
    }

    /// Select an existing node
    pub fn select_node(&self, id: &str) -> Result<(), NodeStoreError> {
        if self.store.get_node(id).is_none() {
            return Err(NodeStoreError::not_found(id));
        }
        *self.active() = Some(id.to_string());
        Ok(())
    }

    pub fn clear_selection(&self) {
        *self.active() = None;
    }

    pub async fn create_folder(
        &self,
        parent_id: Option<&str>,
        title: Option<&str>,
    ) -> Result<String, NodeStoreError> {
        let title = title.unwrap_or(DEFAULT_FOLDER_TITLE).to_string();
        self.store
            .create_node(NodeType::Folder, title, parent_id, None)
            .await
    }

    /// Create a note and make it the active node
    pub async fn create_note(
        &self,
        parent_id: Option<&str>,
        title: Option<&str>,
    ) -> Result<String, NodeStoreError> {
        let title = title.unwrap_or(DEFAULT_NOTE_TITLE).to_string();
        let id = self
            .store
            .create_node(NodeType::Note, title, parent_id, None)
            .await?;
        *self.active() = Some(id.clone());
        Ok(id)
    }

    /// Create a web note and make it the active node
    pub async fn create_web_note(
        &self,
        parent_id: Option<&str>,
        title: Option<&str>,
        url: Option<&str>,
    ) -> Result<String, NodeStoreError> {
        let title = title.unwrap_or(DEFAULT_WEB_NOTE_TITLE).to_string();
        let extra = NodeUpdate::url(url.unwrap_or(DEFAULT_WEB_NOTE_URL));
        let id = self
            .store
            .create_node(NodeType::WebNote, title, parent_id, Some(extra))
            .await?;
        *self.active() = Some(id.clone());
        Ok(id)
    }

    /// Rename to the trimmed title. A blank title is ignored: returns
    /// `Ok(false)` without touching the store.
    pub async fn rename_node(&self, id: &str, new_title: &str) -> Result<bool, NodeStoreError> {
        let trimmed = new_title.trim();
        if trimmed.is_empty() {
            tracing::debug!("Ignoring blank rename of {}", id);
            return Ok(false);
        }
        self.store
            .update_node(id, NodeUpdate::title(trimmed))
            .await?;
        Ok(true)
    }

    pub async fn delete_node(&self, id: &str) -> Result<(), NodeStoreError> {
        self.store.delete_node(id).await?;

        let mut active = self.active();
        let gone = active
            .as_deref()
            .is_some_and(|selected| selected == id || self.store.get_node(selected).is_none());
        if gone {
            tracing::debug!("Cleared selection after deleting {}", id);
            *active = None;
        }
        Ok(())
    }

    pub async fn move_node(
        &self,
        id: &str,
        new_parent_id: Option<&str>,
    ) -> Result<(), NodeStoreError> {
        self.store.move_node(id, new_parent_id).await
    }

    pub async fn toggle_folder(&self, id: &str) -> Result<(), NodeStoreError> {
        self.store.toggle_folder_expanded(id).await
    }

    fn active(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.active_node_id
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
