//! Operation Facade Tests
//!
//! Exercises `NodeActions` end to end against a shared store: default
//! titles, selection on create, selection clearing on delete, and that
//! rename/move leave the selection alone.

#[cfg(test)]
mod facade_tests {
    use anyhow::Result;
    use knowbase_core::operations::{DEFAULT_NOTE_TITLE, DEFAULT_WEB_NOTE_TITLE, DEFAULT_WEB_NOTE_URL};
    use knowbase_core::{NodeActions, NodeKind, NodeOperations, NodeStore};
    use std::sync::Arc;

    fn setup() -> (Arc<NodeStore>, NodeActions) {
        let store = Arc::new(NodeStore::new());
        let actions = NodeActions::new(store.clone());
        (store, actions)
    }

    #[tokio::test]
    async fn test_create_note_with_defaults() -> Result<()> {
        let (store, actions) = setup();

        let id = actions.create_note(Some("root"), None).await?;

        let node = store.get_node(&id).expect("note exists");
        assert_eq!(node.title, DEFAULT_NOTE_TITLE);
        assert_eq!(actions.active_node_id(), Some(id.clone()));
        match node.kind {
            NodeKind::Note(note) => {
                assert!(note.tags.is_empty());
                assert_eq!(note.content.as_value()[0]["type"], "h1");
            }
            other => panic!("Expected note, got {:?}", other),
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_create_web_note_with_defaults() -> Result<()> {
        let (store, actions) = setup();

        let id = actions.create_web_note(None, None, None).await?;

        let node = store.get_node(&id).expect("web note exists");
        assert_eq!(node.title, DEFAULT_WEB_NOTE_TITLE);
        assert!(node.parent_id.is_none());
        match node.kind {
            NodeKind::WebNote(web) => assert_eq!(web.url, DEFAULT_WEB_NOTE_URL),
            other => panic!("Expected web note, got {:?}", other),
        }
        assert_eq!(actions.active_node().map(|n| n.id), Some(id));
        Ok(())
    }

    #[tokio::test]
    async fn test_punctuated_titles_are_accepted() -> Result<()> {
        let (store, actions) = setup();

        let note = actions.create_note(Some("root"), Some("Rust: ownership")).await?;
        let folder = actions.create_folder(None, Some("What is Rust?")).await?;
        assert!(actions.rename_node(&note, "TCP/IP notes").await?);

        assert_eq!(store.get_node(&note).expect("note exists").title, "TCP/IP notes");
        assert_eq!(store.get_node(&folder).expect("folder exists").title, "What is Rust?");
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_selected_node_clears_selection() -> Result<()> {
        let (_store, actions) = setup();
        let id = actions.create_note(Some("learning"), Some("Scratch")).await?;

        actions.delete_node(&id).await?;

        assert_eq!(actions.active_node_id(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_ancestor_clears_selection() -> Result<()> {
        let (_store, actions) = setup();
        actions.select_node("welcome-note")?;

        actions.delete_node("quick-notes").await?;

        assert_eq!(actions.active_node_id(), None);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_other_node_keeps_selection() -> Result<()> {
        let (_store, actions) = setup();
        actions.select_node("welcome-note")?;

        actions.delete_node("projects").await?;

        assert_eq!(actions.active_node_id().as_deref(), Some("welcome-note"));
        Ok(())
    }

    #[tokio::test]
    async fn test_rename_and_move_keep_selection() -> Result<()> {
        let (store, actions) = setup();
        actions.select_node("welcome-note")?;

        assert!(actions.rename_node("welcome-note", " Start Here ").await?);
        actions.move_node("welcome-note", Some("learning")).await?;

        assert_eq!(actions.active_node_id().as_deref(), Some("welcome-note"));
        let node = store.get_node("welcome-note").expect("node exists");
        assert_eq!(node.title, "Start Here");
        assert_eq!(node.parent_id.as_deref(), Some("learning"));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_selection() -> Result<()> {
        let (_store, actions) = setup();
        actions.select_node("projects")?;

        let err = actions.delete_node("ghost").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(actions.active_node_id().as_deref(), Some("projects"));
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_folder_through_facade() -> Result<()> {
        let (store, actions) = setup();

        actions.toggle_folder("learning").await?;

        let learning = store.get_node("learning").expect("folder exists");
        assert_eq!(learning.as_folder().map(|f| f.expanded), Some(true));
        assert!(actions.toggle_folder("welcome-note").await.is_err());
        Ok(())
    }
}
