//! Tree projection records
//!
//! A [`TreeItem`] is the read-only, leveled view of one node used for
//! rendering. Projections are rebuilt from the store on every query and are
//! never patched in place.

use crate::models::node::NodeType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Depth below the projection root, starting at 0
    pub level: usize,
    /// Folders only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    /// Folders only, in the folder's display order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeItem>>,
}

impl TreeItem {
    pub fn is_folder(&self) -> bool {
        self.node_type == NodeType::Folder
    }

    /// Number of items in this subtree, including `self`
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(TreeItem::subtree_len)
            .sum::<usize>()
    }

    /// Depth-first search for `id` within this subtree
    pub fn find(&self, id: &str) -> Option<&TreeItem> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .iter()
            .flatten()
            .find_map(|child| child.find(id))
    }
}
