//! Node Data Structures
//!
//! This module defines the `Node` record stored by the knowledge base and the
//! per-variant payloads carried inside it.
//!
//! # Architecture
//!
//! - **Common envelope**: `id`, `title`, `parent_id`, timestamps and optional
//!   free-form metadata live on [`Node`] itself
//! - **Tagged variant**: folder/note/web-note specific fields live in
//!   [`NodeKind`], serialized inline with a `type` discriminator
//! - **Opaque documents**: rich-text bodies are carried as [`Document`] values
//!   the store never interprets
//!
//! # Examples
//!
//! ```rust
//! use knowbase_core::models::{Node, NodeKind, NodeType};
//! use chrono::Utc;
//!
//! let folder = Node::new(
//!     "projects".to_string(),
//!     "Projects".to_string(),
//!     None,
//!     NodeKind::default_for(NodeType::Folder, "Projects"),
//!     Utc::now(),
//! );
//! assert!(folder.is_folder());
//! ```

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Free-form metadata attached to a node
pub type Metadata = HashMap<String, serde_json::Value>;

/// Characters rejected in node titles
const INVALID_TITLE_CHARS: &str = r#"[<>:"/\\|?*]"#;

/// Validation errors for node fields
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Title cannot exceed {max} characters")]
    TitleTooLong { max: usize },

    #[error("Title contains invalid characters")]
    InvalidTitleCharacters,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field '{field}' does not apply to {node_type} nodes")]
    FieldNotApplicable { field: String, node_type: NodeType },
}

/// Node variant discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeType {
    Folder,
    Note,
    WebNote,
}

impl NodeType {
    /// Wire name of the variant (`folder`, `note`, `webNote`)
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Folder => "folder",
            NodeType::Note => "note",
            NodeType::WebNote => "webNote",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque rich-text document value.
///
/// The editor owns the shape of this value. The store only builds the small
/// default documents below and otherwise passes the value through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(pub serde_json::Value);

impl Document {
    /// Two-block document: a heading carrying `title` and an empty paragraph
    pub fn seeded(title: &str) -> Self {
        Self(json!([
            { "type": "h1", "children": [{ "text": title }] },
            { "type": "p", "children": [{ "text": "" }] },
        ]))
    }

    /// Single empty paragraph
    pub fn blank() -> Self {
        Self(json!([{ "type": "p", "children": [{ "text": "" }] }]))
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for Document {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderData {
    /// Ordered child ids; insertion order is display order
    pub children: Vec<String>,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteData {
    pub content: Document,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebNoteData {
    pub url: String,
    pub notes: Document,
    #[serde(default)]
    pub show_notes: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Variant-specific node payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    Folder(FolderData),
    Note(NoteData),
    WebNote(WebNoteData),
}

impl NodeKind {
    /// Fresh payload with create-time defaults.
    ///
    /// Folders start empty and expanded, notes get a two-block document seeded
    /// from `title`, web notes start with an empty url and hidden notes. The
    /// caller is responsible for supplying a real url for web notes.
    pub fn default_for(node_type: NodeType, title: &str) -> Self {
        match node_type {
            NodeType::Folder => NodeKind::Folder(FolderData {
                children: Vec::new(),
                expanded: true,
            }),
            NodeType::Note => NodeKind::Note(NoteData {
                content: Document::seeded(title),
                tags: Vec::new(),
                summary: None,
            }),
            NodeType::WebNote => NodeKind::WebNote(WebNoteData {
                url: String::new(),
                notes: Document::blank(),
                show_notes: false,
                tags: Vec::new(),
                summary: None,
            }),
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Folder(_) => NodeType::Folder,
            NodeKind::Note(_) => NodeType::Note,
            NodeKind::WebNote(_) => NodeType::WebNote,
        }
    }
}

/// A folder, note or web note held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier, never reused
    pub id: String,

    /// Display title
    pub title: String,

    /// Owning folder; `None` for roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    /// Create a node with `created_at == updated_at == now`
    pub fn new(
        id: String,
        title: String,
        parent_id: Option<String>,
        kind: NodeKind,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            parent_id,
            created_at: now,
            updated_at: now,
            metadata: None,
            kind,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder(_))
    }

    pub fn as_folder(&self) -> Option<&FolderData> {
        match &self.kind {
            NodeKind::Folder(folder) => Some(folder),
            _ => None,
        }
    }

    pub fn as_folder_mut(&mut self) -> Option<&mut FolderData> {
        match &mut self.kind {
            NodeKind::Folder(folder) => Some(folder),
            _ => None,
        }
    }

    /// Child ids in display order; empty for non-folders
    pub fn children(&self) -> &[String] {
        match &self.kind {
            NodeKind::Folder(folder) => &folder.children,
            _ => &[],
        }
    }

    pub fn tags(&self) -> &[String] {
        match &self.kind {
            NodeKind::Folder(_) => &[],
            NodeKind::Note(note) => &note.tags,
            NodeKind::WebNote(web) => &web.tags,
        }
    }

    pub fn summary(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Folder(_) => None,
            NodeKind::Note(note) => note.summary.as_deref(),
            NodeKind::WebNote(web) => web.summary.as_deref(),
        }
    }

    /// Display statistics for the properties panel
    pub fn stats(&self) -> NodeStats {
        match &self.kind {
            NodeKind::Folder(folder) => NodeStats {
                node_type: NodeType::Folder,
                child_count: Some(folder.children.len()),
                tag_count: None,
                has_summary: false,
            },
            NodeKind::Note(_) | NodeKind::WebNote(_) => NodeStats {
                node_type: self.node_type(),
                child_count: None,
                tag_count: Some(self.tags().len()),
                has_summary: self.summary().is_some(),
            },
        }
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

/// Per-node display statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStats {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_count: Option<usize>,
    pub has_summary: bool,
}

/// Suggested limit for [`validate_title`]
pub const DEFAULT_MAX_TITLE_LENGTH: usize = 100;

/// The only title rule the store enforces: non-empty after trimming
pub fn require_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}

/// Stricter, opt-in title check for filename-like titles (exports, forms).
///
/// On top of [`require_title`], the trimmed title must be at most `max_len`
/// characters and free of `< > : " / \ | ? *`. The store does not apply it.
pub fn validate_title(title: &str, max_len: usize) -> Result<(), ValidationError> {
    require_title(title)?;
    let trimmed = title.trim();
    if trimmed.chars().count() > max_len {
        return Err(ValidationError::TitleTooLong { max: max_len });
    }

    static INVALID_CHARS: OnceLock<Regex> = OnceLock::new();
    let invalid = INVALID_CHARS
        .get_or_init(|| Regex::new(INVALID_TITLE_CHARS).expect("title pattern compiles"));
    if invalid.is_match(trimmed) {
        return Err(ValidationError::InvalidTitleCharacters);
    }

    Ok(())
}

/// Drop duplicate tags, keeping first occurrences in order
pub(crate) fn dedupe_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}
