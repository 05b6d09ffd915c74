//! Tree Projection Builder
//!
//! Derives the leveled [`TreeItem`] view from the flat node map. Sibling order
//! comes strictly from the owning folder's `children` list (or the store's root
//! list at the top level), never from map iteration order, so identical node
//! collections always produce identical projections.

use crate::models::{Node, NodeKind, TreeItem};
use std::collections::HashMap;

/// Build projection items for `ordered_ids`, placing them at `level`.
///
/// Ids missing from `nodes` are skipped. Folders recurse into their own
/// `children` list.
pub(crate) fn build_items(
    nodes: &HashMap<String, Node>,
    ordered_ids: &[String],
    level: usize,
) -> Vec<TreeItem> {
    ordered_ids
        .iter()
        .filter_map(|id| nodes.get(id))
        .map(|node| project(nodes, node, level))
        .collect()
}

fn project(nodes: &HashMap<String, Node>, node: &Node, level: usize) -> TreeItem {
    let (expanded, children) = match &node.kind {
        NodeKind::Folder(folder) => (
            Some(folder.expanded),
            Some(build_items(nodes, &folder.children, level + 1)),
        ),
        NodeKind::Note(_) | NodeKind::WebNote(_) => (None, None),
    };

    TreeItem {
        id: node.id.clone(),
        title: node.title.clone(),
        node_type: node.node_type(),
        parent_id: node.parent_id.clone(),
        level,
        expanded,
        children,
    }
}

/// Filter a projection by case-insensitive title substring.
///
/// - A matching item is kept, with its own children filtered the same way
/// - A non-matching folder is kept only if some descendant matches; it then
///   carries just the matching branches and is forced `expanded`
/// - A blank query returns the projection unchanged
pub fn filter_tree(items: &[TreeItem], query: &str) -> Vec<TreeItem> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    filter_items(items, &needle)
}

fn filter_items(items: &[TreeItem], needle: &str) -> Vec<TreeItem> {
    let mut kept = Vec::new();

    for item in items {
        let matches = item.title.to_lowercase().contains(needle);
        let filtered_children = item
            .children
            .as_deref()
            .map(|children| filter_items(children, needle));

        if matches {
            kept.push(TreeItem {
                children: filtered_children,
                ..item.clone()
            });
        } else if let Some(children) = filtered_children.filter(|c| !c.is_empty()) {
            kept.push(TreeItem {
                children: Some(children),
                expanded: Some(true),
                ..item.clone()
            });
        }
    }

    kept
}
