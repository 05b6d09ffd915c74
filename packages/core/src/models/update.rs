//! Partial node updates
//!
//! [`NodeUpdate`] carries the mutable fields a caller wants to change. The same
//! structure doubles as the `extra` payload of node creation, where it is
//! overlaid on the per-variant defaults.
//!
//! `id`, `type`, `parent_id` and a folder's `children` are not updatable here:
//! identity and variant are fixed at creation, and hierarchy changes go through
//! the store's move operation.

use crate::models::node::{dedupe_tags, Document, Metadata, Node, NodeKind, ValidationError};
use serde::{Deserialize, Deserializer, Serialize};

/// Deserializer for double-Option fields.
///
/// - Missing field → None (don't update)
/// - null → Some(None) (clear)
/// - value → Some(Some(value))
fn deserialize_optional_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}

/// Partial node update.
///
/// Only provided fields are changed. Fields that do not exist on the target
/// node's variant are rejected by [`NodeUpdate::check_applicable`].
///
/// # Examples
///
/// ```rust
/// use knowbase_core::models::NodeUpdate;
///
/// let rename = NodeUpdate {
///     title: Some("Renamed".to_string()),
///     ..Default::default()
/// };
/// assert!(!rename.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Double-Option: `Some(None)` clears the metadata map
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub metadata: Option<Option<Metadata>>,

    /// Folders only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,

    /// Notes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Document>,

    /// Notes and web notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Notes and web notes. Double-Option: `Some(None)` clears the summary
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub summary: Option<Option<String>>,

    /// Web notes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Web notes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Document>,

    /// Web notes only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_notes: Option<bool>,
}

impl NodeUpdate {
    /// Update that only renames
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Extra payload carrying a web note url
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Reject fields the node's variant does not carry
    pub fn check_applicable(&self, kind: &NodeKind) -> Result<(), ValidationError> {
        let node_type = kind.node_type();
        let not_applicable = |field: &str| ValidationError::FieldNotApplicable {
            field: field.to_string(),
            node_type,
        };

        match kind {
            NodeKind::Folder(_) => {
                if self.content.is_some() {
                    return Err(not_applicable("content"));
                }
                if self.tags.is_some() {
                    return Err(not_applicable("tags"));
                }
                if self.summary.is_some() {
                    return Err(not_applicable("summary"));
                }
                self.reject_web_fields(&not_applicable)
            }
            NodeKind::Note(_) => {
                if self.expanded.is_some() {
                    return Err(not_applicable("expanded"));
                }
                self.reject_web_fields(&not_applicable)
            }
            NodeKind::WebNote(_) => {
                if self.expanded.is_some() {
                    return Err(not_applicable("expanded"));
                }
                if self.content.is_some() {
                    return Err(not_applicable("content"));
                }
                Ok(())
            }
        }
    }

    fn reject_web_fields(
        &self,
        not_applicable: &dyn Fn(&str) -> ValidationError,
    ) -> Result<(), ValidationError> {
        if self.url.is_some() {
            return Err(not_applicable("url"));
        }
        if self.notes.is_some() {
            return Err(not_applicable("notes"));
        }
        if self.show_notes.is_some() {
            return Err(not_applicable("showNotes"));
        }
        Ok(())
    }

    /// Merge the provided fields into `node`.
    ///
    /// Callers must run [`NodeUpdate::check_applicable`] first; inapplicable
    /// fields are ignored here. Timestamps are left to the caller.
    pub fn apply_to(self, node: &mut Node) {
        if let Some(title) = self.title {
            node.title = title;
        }
        if let Some(metadata) = self.metadata {
            node.metadata = metadata;
        }

        match &mut node.kind {
            NodeKind::Folder(folder) => {
                if let Some(expanded) = self.expanded {
                    folder.expanded = expanded;
                }
            }
            NodeKind::Note(note) => {
                if let Some(content) = self.content {
                    note.content = content;
                }
                if let Some(tags) = self.tags {
                    note.tags = dedupe_tags(tags);
                }
                if let Some(summary) = self.summary {
                    note.summary = summary;
                }
            }
            NodeKind::WebNote(web) => {
                if let Some(url) = self.url {
                    web.url = url;
                }
                if let Some(notes) = self.notes {
                    web.notes = notes;
                }
                if let Some(show_notes) = self.show_notes {
                    web.show_notes = show_notes;
                }
                if let Some(tags) = self.tags {
                    web.tags = dedupe_tags(tags);
                }
                if let Some(summary) = self.summary {
                    web.summary = summary;
                }
            }
        }
    }
}
