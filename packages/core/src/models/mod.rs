//! Data Models
//!
//! This module contains the data structures shared by the store and its
//! consumers:
//!
//! - `Node` - folder, note and web-note records
//! - `NodeUpdate` - partial updates and create-time extras
//! - `TreeItem` - derived, read-only tree projection records

mod node;
mod tree;
mod update;

pub use node::{
    require_title, validate_title, Document, FolderData, Metadata, Node, NodeKind, NodeStats,
    NodeType, NoteData, ValidationError, WebNoteData, DEFAULT_MAX_TITLE_LENGTH,
};
pub use tree::TreeItem;
pub use update::NodeUpdate;
