//! Knowbase Core - Personal Knowledge Base Node Store
//!
//! This crate provides the in-memory hierarchical store behind the knowledge
//! base editor: folders, notes and web notes (URL + annotation pairs), their
//! CRUD and move operations, and change notification so UI panels stay in
//! sync.
//!
//! # Architecture
//!
//! - **Single source of truth**: [`NodeStore`] owns every node; callers get
//!   clones and projections, never the live collection
//! - **Recomputed projections**: the tree view is rebuilt on each query from
//!   folder `children` lists, never patched
//! - **Signal, not diff**: listeners receive a payload-free "something
//!   changed" call and re-query; typed [`StoreEvent`]s are available for
//!   consumers that need detail
//!
//! # Modules
//!
//! - [`models`] - Node records, partial updates, tree projection items
//! - [`services`] - NodeStore, change notifier, tree builder
//! - [`operations`] - user-intent facade with active selection
//! - [`events`] - typed store events
//! - [`config`] - store configuration
//! - [`seed`] - default example tree
//! - [`logging`] - tracing subscriber setup
//!
//! # Examples
//!
//! ```rust
//! use knowbase_core::{NodeOperations, NodeStore, NodeType, NodeUpdate};
//!
//! # tokio_test::block_on(async {
//! let store = NodeStore::new();
//! let id = store
//!     .create_node(NodeType::Note, "Draft".to_string(), Some("root"), None)
//!     .await
//!     .unwrap();
//! store.update_node(&id, NodeUpdate::title("Final")).await.unwrap();
//! assert_eq!(store.get_node(&id).unwrap().title, "Final");
//! # });
//! ```

pub mod config;
pub mod events;
pub mod logging;
pub mod models;
pub mod operations;
pub mod seed;
pub mod services;

// Re-export commonly used types
pub use config::StoreConfig;
pub use events::StoreEvent;
pub use models::*;
pub use operations::NodeActions;
pub use services::*;
