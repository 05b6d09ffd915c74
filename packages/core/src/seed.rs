//! Default example tree
//!
//! A fresh store starts with a root folder holding three example folders and
//! two notes, so the editor has something to render on first launch. This is
//! fixed example content, not configuration.

use crate::models::{Document, FolderData, Node, NodeKind, NoteData};
use chrono::{DateTime, Utc};
use serde_json::json;

pub const ROOT_FOLDER_ID: &str = "root";

fn folder(
    id: &str,
    title: &str,
    parent_id: Option<&str>,
    children: &[&str],
    expanded: bool,
    now: DateTime<Utc>,
) -> Node {
    Node::new(
        id.to_string(),
        title.to_string(),
        parent_id.map(str::to_string),
        NodeKind::Folder(FolderData {
            children: children.iter().map(|c| c.to_string()).collect(),
            expanded,
        }),
        now,
    )
}

fn note(
    id: &str,
    title: &str,
    parent_id: &str,
    content: serde_json::Value,
    tags: &[&str],
    summary: Option<&str>,
    now: DateTime<Utc>,
) -> Node {
    Node::new(
        id.to_string(),
        title.to_string(),
        Some(parent_id.to_string()),
        NodeKind::Note(NoteData {
            content: Document(content),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            summary: summary.map(str::to_string),
        }),
        now,
    )
}

/// Build the example nodes, parents before children.
///
/// The single root is [`ROOT_FOLDER_ID`].
pub fn default_nodes(now: DateTime<Utc>) -> Vec<Node> {
    let welcome = json!([
        { "type": "h1", "children": [{ "text": "Welcome to Your Knowledge Base" }] },
        {
            "type": "p",
            "children": [
                { "text": "This is your personal knowledge management system. You can create " },
                { "text": "folders", "bold": true },
                { "text": " and " },
                { "text": "notes", "bold": true },
                { "text": " to organize your thoughts and information." }
            ]
        }
    ]);
    let project = json!([
        { "type": "h1", "children": [{ "text": "Simple Knowledge Project" }] },
        {
            "type": "p",
            "children": [{ "text": "This is the main project for building a simple knowledge base application." }]
        }
    ]);

    vec![
        folder(
            ROOT_FOLDER_ID,
            "Root",
            None,
            &["quick-notes", "projects", "learning"],
            true,
            now,
        ),
        folder("quick-notes", "Quick Notes", Some(ROOT_FOLDER_ID), &["welcome-note"], true, now),
        folder(
            "projects",
            "Projects",
            Some(ROOT_FOLDER_ID),
            &["simple-knowledge-project"],
            true,
            now,
        ),
        folder("learning", "Learning", Some(ROOT_FOLDER_ID), &[], false, now),
        note(
            "welcome-note",
            "Welcome to Knowledge Base",
            "quick-notes",
            welcome,
            &["welcome", "guide"],
            Some("Welcome guide for the knowledge base"),
            now,
        ),
        note(
            "simple-knowledge-project",
            "Simple Knowledge Project",
            "projects",
            project,
            &["project", "development"],
            None,
            now,
        ),
    ]
}
