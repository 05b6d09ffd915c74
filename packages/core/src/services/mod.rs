//! Business Services
//!
//! This module contains the store and the components it drives:
//!
//! - `NodeStore` - authoritative node collection, CRUD and move operations
//! - `ChangeNotifier` - payload-free listener registry fired after each mutation
//! - `tree_builder` - tree projection and title filtering
//!
//! Everything mutating goes through `NodeStore`; the rest only read from it.

pub mod error;
pub mod node_store;
pub mod notifier;
pub mod tree_builder;

pub use error::NodeStoreError;
pub use node_store::{NodeOperations, NodeStore};
pub use notifier::{ChangeNotifier, Listener, Subscription};
pub use tree_builder::filter_tree;
