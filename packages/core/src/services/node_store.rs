//! Node Store - Core CRUD Operations
//!
//! This module provides the authoritative in-memory collection of folders,
//! notes and web notes:
//!
//! - CRUD operations (create, read, update, delete)
//! - Hierarchy management (get_children, move_node, cascading delete)
//! - Tree projection on demand
//! - Change notification (listener callbacks plus typed broadcast events)
//!
//! # Consistency
//!
//! Every mutation validates under the write lock before touching anything,
//! commits, releases the lock and only then notifies. A failed operation
//! leaves the collection untouched and notifies nobody. After every operation:
//!
//! - each non-root node's `parent_id` names an existing folder
//! - each folder's `children` lists exactly the nodes pointing at it
//! - the parent relation is acyclic
//! - ids are unique and never reused
//! - `updated_at` of every touched node strictly increases
//!
//! # Ownership
//!
//! The store is constructed explicitly and shared by reference (typically
//! `Arc<NodeStore>`). Consumers only ever receive clones or projections.

use crate::config::StoreConfig;
use crate::events::StoreEvent;
use crate::models::{
    require_title, Node, NodeKind, NodeType, NodeUpdate, TreeItem, ValidationError,
};
use crate::seed;
use crate::services::error::NodeStoreError;
use crate::services::notifier::{ChangeNotifier, Subscription};
use crate::services::tree_builder;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Store operations consumed by the UI layer and the operation facade.
///
/// Mutations are async so an I/O-backed store can stand in for the in-memory
/// one without changing callers; queries are side-effect-free lookups.
#[async_trait]
pub trait NodeOperations: Send + Sync {
    /// Create a node and return its fresh id.
    ///
    /// `extra` is overlaid on the variant's defaults; web notes require
    /// `extra.url`.
    async fn create_node(
        &self,
        node_type: NodeType,
        title: String,
        parent_id: Option<&str>,
        extra: Option<NodeUpdate>,
    ) -> Result<String, NodeStoreError>;

    /// Merge `update` into the node and refresh `updated_at`
    async fn update_node(&self, id: &str, update: NodeUpdate) -> Result<(), NodeStoreError>;

    /// Delete the node and, for folders, its whole subtree
    async fn delete_node(&self, id: &str) -> Result<(), NodeStoreError>;

    /// Reparent the node; `None` detaches it to the root level
    async fn move_node(&self, id: &str, new_parent_id: Option<&str>)
        -> Result<(), NodeStoreError>;

    /// Flip a folder's `expanded` flag
    async fn toggle_folder_expanded(&self, id: &str) -> Result<(), NodeStoreError>;

    fn get_node(&self, id: &str) -> Option<Node>;

    /// Direct children of `parent_id` (roots for `None`) in display order
    fn get_children(&self, parent_id: Option<&str>) -> Vec<Node>;

    /// Defensive copy of the whole collection
    fn get_all_nodes(&self) -> HashMap<String, Node>;

    /// Projection of the subtree below `root_parent_id` (everything for `None`)
    fn build_tree(&self, root_parent_id: Option<&str>) -> Vec<TreeItem>;
}

/// Issues strictly increasing timestamps, even when the wall clock stalls
#[derive(Debug, Default)]
struct Clock {
    last_issued: Option<DateTime<Utc>>,
}

impl Clock {
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let issued = match self.last_issued {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_issued = Some(issued);
        issued
    }
}

#[derive(Debug, Default)]
struct StoreState {
    nodes: HashMap<String, Node>,
    /// Parentless nodes in insertion order
    roots: Vec<String>,
    clock: Clock,
}

impl StoreState {
    fn get(&self, id: &str) -> Result<&Node, NodeStoreError> {
        self.nodes.get(id).ok_or_else(|| NodeStoreError::not_found(id))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Node, NodeStoreError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| NodeStoreError::not_found(id))
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    /// Whether `candidate` is `ancestor` itself or sits anywhere below it
    fn is_within(&self, candidate: &str, ancestor: &str) -> bool {
        let mut cursor = Some(candidate);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.nodes.get(id).and_then(|n| n.parent_id.as_deref());
        }
        false
    }

    /// Append `id` to `parent_id`'s children (or the root list)
    fn attach(&mut self, id: &str, parent_id: Option<&str>, now: DateTime<Utc>) {
        match parent_id {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(parent_id) {
                    if let Some(folder) = parent.as_folder_mut() {
                        folder.children.push(id.to_string());
                    }
                    parent.touch(now);
                }
            }
            None => self.roots.push(id.to_string()),
        }
    }

    /// Remove `id` from `parent_id`'s children (or the root list)
    fn detach(&mut self, id: &str, parent_id: Option<&str>, now: DateTime<Utc>) {
        match parent_id {
            Some(parent_id) => {
                if let Some(parent) = self.nodes.get_mut(parent_id) {
                    if let Some(folder) = parent.as_folder_mut() {
                        folder.children.retain(|child| child != id);
                    }
                    parent.touch(now);
                }
            }
            None => self.roots.retain(|root| root != id),
        }
    }

    /// `id` followed by all its descendants, depth-first
    fn subtree_ids(&self, id: &str) -> Vec<String> {
        let mut ids = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children().iter().rev().cloned());
            }
            ids.push(current);
        }
        ids
    }
}

/// In-memory node store
pub struct NodeStore {
    state: RwLock<StoreState>,
    notifier: ChangeNotifier,
    event_tx: broadcast::Sender<StoreEvent>,
    config: StoreConfig,
}

impl NodeStore {
    /// Store seeded with the default example tree
    pub fn new() -> Self {
        Self::build(StoreConfig::default())
    }

    /// Store with no nodes
    pub fn empty() -> Self {
        Self::build(StoreConfig::empty())
    }

    /// Store using a validated custom configuration
    pub fn with_config(config: StoreConfig) -> Result<Self, NodeStoreError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: StoreConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity);
        let mut state = StoreState::default();

        if config.seed_default_tree {
            let now = state.clock.tick();
            for node in seed::default_nodes(now) {
                if node.parent_id.is_none() {
                    state.roots.push(node.id.clone());
                }
                state.nodes.insert(node.id.clone(), node);
            }
            tracing::info!("Seeded node store with {} example nodes", state.nodes.len());
        }

        Self {
            state: RwLock::new(state),
            notifier: ChangeNotifier::new(),
            event_tx,
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Register a payload-free change listener
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notifier.subscribe(callback)
    }

    /// Receive typed events for every committed mutation
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    pub fn len(&self) -> usize {
        self.read().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read().nodes.contains_key(id)
    }

    // Mutations never panic between validation and commit, so a poisoned
    // lock still guards a consistent collection.
    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fire listeners, then broadcast the typed event
    fn publish(&self, event: StoreEvent) {
        self.notifier.notify();
        // No receivers is not an error
        let _ = self.event_tx.send(event);
    }

    fn commit_create(
        &self,
        node_type: NodeType,
        title: String,
        parent_id: Option<&str>,
        extra: Option<NodeUpdate>,
    ) -> Result<(String, StoreEvent), NodeStoreError> {
        let mut state = self.write();

        if let Some(parent_id) = parent_id {
            if !state.get(parent_id)?.is_folder() {
                return Err(NodeStoreError::not_a_folder(parent_id));
            }
        }

        // The note heading is seeded from the final title, so resolve it first
        let title = extra
            .as_ref()
            .and_then(|extra| extra.title.clone())
            .unwrap_or(title);
        require_title(&title)?;

        let mut kind = NodeKind::default_for(node_type, &title);
        let mut metadata = None;
        if let Some(extra) = extra {
            extra.check_applicable(&kind)?;
            let mut scratch = Node::new(String::new(), title.clone(), None, kind, Utc::now());
            extra.apply_to(&mut scratch);
            kind = scratch.kind;
            metadata = scratch.metadata;
        }

        if let NodeKind::WebNote(web) = &kind {
            if web.url.trim().is_empty() {
                return Err(ValidationError::MissingField("url".to_string()).into());
            }
        }

        let id = state.fresh_id();
        let now = state.clock.tick();
        let mut node = Node::new(id.clone(), title, parent_id.map(str::to_string), kind, now);
        node.metadata = metadata;
        state.nodes.insert(id.clone(), node);
        state.attach(&id, parent_id, now);

        let event = StoreEvent::NodeCreated {
            id: id.clone(),
            node_type,
            parent_id: parent_id.map(str::to_string),
        };
        Ok((id, event))
    }

    fn commit_update(&self, id: &str, update: NodeUpdate) -> Result<StoreEvent, NodeStoreError> {
        let mut state = self.write();

        let node = state.get(id)?;
        update.check_applicable(&node.kind)?;
        if let Some(title) = &update.title {
            require_title(title)?;
        }
        if let (NodeKind::WebNote(_), Some(url)) = (&node.kind, &update.url) {
            if url.trim().is_empty() {
                return Err(ValidationError::MissingField("url".to_string()).into());
            }
        }

        let now = state.clock.tick();
        let node = state.get_mut(id)?;
        update.apply_to(node);
        node.touch(now);

        Ok(StoreEvent::NodeUpdated { id: id.to_string() })
    }

    fn commit_delete(&self, id: &str) -> Result<StoreEvent, NodeStoreError> {
        let mut state = self.write();

        let parent_id = state.get(id)?.parent_id.clone();
        let doomed = state.subtree_ids(id);
        let now = state.clock.tick();

        for doomed_id in &doomed {
            state.nodes.remove(doomed_id);
        }
        state.detach(id, parent_id.as_deref(), now);

        if doomed.len() > 1 {
            tracing::info!("Deleted {} with {} descendants", id, doomed.len() - 1);
        }
        Ok(StoreEvent::NodesDeleted { ids: doomed })
    }

    fn commit_move(
        &self,
        id: &str,
        new_parent_id: Option<&str>,
    ) -> Result<StoreEvent, NodeStoreError> {
        let mut state = self.write();

        let old_parent_id = state.get(id)?.parent_id.clone();
        if let Some(target) = new_parent_id {
            if target == id {
                return Err(NodeStoreError::invalid_move(
                    id,
                    target,
                    "a node cannot contain itself",
                ));
            }
            if !state.get(target)?.is_folder() {
                return Err(NodeStoreError::invalid_move(
                    id,
                    target,
                    "target is not a folder",
                ));
            }
            if state.is_within(target, id) {
                return Err(NodeStoreError::invalid_move(
                    id,
                    target,
                    "target is a descendant of the node",
                ));
            }
        }

        let now = state.clock.tick();
        state.detach(id, old_parent_id.as_deref(), now);
        state.attach(id, new_parent_id, now);
        let node = state.get_mut(id)?;
        node.parent_id = new_parent_id.map(str::to_string);
        node.touch(now);

        Ok(StoreEvent::NodeMoved {
            id: id.to_string(),
            old_parent_id,
            new_parent_id: new_parent_id.map(str::to_string),
        })
    }

    fn commit_toggle(&self, id: &str) -> Result<StoreEvent, NodeStoreError> {
        let mut state = self.write();

        if !state.get(id)?.is_folder() {
            return Err(NodeStoreError::not_a_folder(id));
        }

        let now = state.clock.tick();
        let node = state.get_mut(id)?;
        let expanded = match node.as_folder_mut() {
            Some(folder) => {
                folder.expanded = !folder.expanded;
                folder.expanded
            }
            None => return Err(NodeStoreError::not_a_folder(id)),
        };
        node.touch(now);

        Ok(StoreEvent::FolderToggled {
            id: id.to_string(),
            expanded,
        })
    }
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NodeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeStore")
            .field("nodes", &self.len())
            .field("notifier", &self.notifier)
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl NodeOperations for NodeStore {
    async fn create_node(
        &self,
        node_type: NodeType,
        title: String,
        parent_id: Option<&str>,
        extra: Option<NodeUpdate>,
    ) -> Result<String, NodeStoreError> {
        let (id, event) = self
            .commit_create(node_type, title, parent_id, extra)
            .inspect_err(|e| tracing::warn!("Rejected create of {} node: {}", node_type, e))?;

        tracing::debug!("Created {} node {} under {:?}", node_type, id, parent_id);
        self.publish(event);
        Ok(id)
    }

    async fn update_node(&self, id: &str, update: NodeUpdate) -> Result<(), NodeStoreError> {
        let event = self
            .commit_update(id, update)
            .inspect_err(|e| tracing::warn!("Rejected update of {}: {}", id, e))?;

        tracing::debug!("Updated node {}", id);
        self.publish(event);
        Ok(())
    }

    async fn delete_node(&self, id: &str) -> Result<(), NodeStoreError> {
        let event = self
            .commit_delete(id)
            .inspect_err(|e| tracing::warn!("Rejected delete of {}: {}", id, e))?;

        tracing::debug!("Deleted node {}", id);
        self.publish(event);
        Ok(())
    }

    async fn move_node(
        &self,
        id: &str,
        new_parent_id: Option<&str>,
    ) -> Result<(), NodeStoreError> {
        let event = self
            .commit_move(id, new_parent_id)
            .inspect_err(|e| tracing::warn!("Rejected move of {}: {}", id, e))?;

        tracing::debug!("Moved node {} under {:?}", id, new_parent_id);
        self.publish(event);
        Ok(())
    }

    async fn toggle_folder_expanded(&self, id: &str) -> Result<(), NodeStoreError> {
        let event = self
            .commit_toggle(id)
            .inspect_err(|e| tracing::warn!("Rejected toggle of {}: {}", id, e))?;

        tracing::debug!("Toggled folder {}", id);
        self.publish(event);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<Node> {
        self.read().nodes.get(id).cloned()
    }

    fn get_children(&self, parent_id: Option<&str>) -> Vec<Node> {
        let state = self.read();
        let ordered: &[String] = match parent_id {
            None => &state.roots,
            Some(parent_id) => match state.nodes.get(parent_id) {
                Some(parent) if parent.is_folder() => parent.children(),
                _ => {
                    // Non-folder or unknown parent: nothing should point at it,
                    // but report whatever does in a stable order.
                    let mut strays: Vec<Node> = state
                        .nodes
                        .values()
                        .filter(|node| node.parent_id.as_deref() == Some(parent_id))
                        .cloned()
                        .collect();
                    strays.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
                    return strays;
                }
            },
        };

        ordered
            .iter()
            .filter_map(|id| state.nodes.get(id))
            .cloned()
            .collect()
    }

    fn get_all_nodes(&self) -> HashMap<String, Node> {
        self.read().nodes.clone()
    }

    fn build_tree(&self, root_parent_id: Option<&str>) -> Vec<TreeItem> {
        let state = self.read();
        match root_parent_id {
            None => tree_builder::build_items(&state.nodes, &state.roots, 0),
            Some(parent_id) => state
                .nodes
                .get(parent_id)
                .map(|parent| tree_builder::build_items(&state.nodes, parent.children(), 0))
                .unwrap_or_default(),
        }
    }
}
