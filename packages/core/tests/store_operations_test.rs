//! Node Store Operation Tests
//!
//! End-to-end checks of the store's mutation surface: cascading deletes,
//! cycle rejection, reparenting, renames and unknown-id failures, including
//! how many change notifications each operation fires.

#[cfg(test)]
mod store_operations_tests {
    use anyhow::Result;
    use knowbase_core::{NodeOperations, NodeStore, NodeStoreError, NodeType, NodeUpdate};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Helper to count listener invocations
    fn count_notifications(store: &NodeStore) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        let _subscription = store.subscribe(move || {
            handle.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    async fn create(
        store: &NodeStore,
        node_type: NodeType,
        title: &str,
        parent_id: Option<&str>,
    ) -> Result<String> {
        Ok(store
            .create_node(node_type, title.to_string(), parent_id, None)
            .await?)
    }

    #[tokio::test]
    async fn test_cascading_delete_removes_subtree() -> Result<()> {
        let store = NodeStore::new();
        let folder = create(&store, NodeType::Folder, "F", Some("root")).await?;
        let note = create(&store, NodeType::Note, "N", Some(&folder)).await?;

        store.delete_node(&folder).await?;

        let all = store.get_all_nodes();
        assert!(!all.contains_key(&folder));
        assert!(!all.contains_key(&note));
        assert!(!store
            .get_node("root")
            .unwrap()
            .children()
            .contains(&folder));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_large_subtree_notifies_once() -> Result<()> {
        let store = NodeStore::new();
        let top = create(&store, NodeType::Folder, "Bulk", Some("root")).await?;
        let mut parent = top.clone();
        for i in 0..100 {
            // Alternate between nesting deeper and adding leaves
            if i % 10 == 0 {
                parent = create(&store, NodeType::Folder, &format!("Level {}", i), Some(&parent)).await?;
            } else {
                create(&store, NodeType::Note, &format!("Leaf {}", i), Some(&parent)).await?;
            }
        }
        let before = store.len();
        let notifications = count_notifications(&store);

        store.delete_node(&top).await?;

        assert_eq!(notifications.load(Ordering::SeqCst), 1);
        assert_eq!(store.len(), before - 101);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_refreshes_parent_timestamp() -> Result<()> {
        let store = NodeStore::new();
        let before = store.get_node("root").expect("root exists").updated_at;

        store.delete_node("learning").await?;

        let root = store.get_node("root").expect("root exists");
        assert!(root.updated_at > before);
        assert!(!root.children().contains(&"learning".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_refreshes_folder_timestamp() -> Result<()> {
        let store = NodeStore::new();
        let before = store.get_node("learning").expect("folder exists");

        store.toggle_folder_expanded("learning").await?;

        let after = store.get_node("learning").expect("folder exists");
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.created_at, before.created_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_cycle_rejected_and_tree_unchanged() -> Result<()> {
        let store = NodeStore::new();
        let a = create(&store, NodeType::Folder, "A", Some("root")).await?;
        let b = create(&store, NodeType::Folder, "B", Some(&a)).await?;
        let c = create(&store, NodeType::Folder, "C", Some(&b)).await?;
        let snapshot = store.get_all_nodes();
        let notifications = count_notifications(&store);

        for target in [&b, &c] {
            let err = store.move_node(&a, Some(target)).await.unwrap_err();
            assert!(
                matches!(err, NodeStoreError::InvalidMove { .. }),
                "expected InvalidMove, got {:?}",
                err
            );
        }

        assert_eq!(store.get_all_nodes(), snapshot);
        assert_eq!(notifications.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_round_trip_rename() -> Result<()> {
        let store = NodeStore::new();
        let id = create(&store, NodeType::Note, "X", Some("root")).await?;

        store.update_node(&id, NodeUpdate::title("Y")).await?;

        let node = store.get_node(&id).expect("renamed node exists");
        assert_eq!(node.title, "Y");
        assert!(node.updated_at > node.created_at);
        assert_eq!(node.node_type(), NodeType::Note);
        Ok(())
    }

    #[tokio::test]
    async fn test_move_reparents_in_one_notification() -> Result<()> {
        let store = NodeStore::new();
        let a = create(&store, NodeType::Folder, "A", Some("root")).await?;
        let b = create(&store, NodeType::Folder, "B", Some("root")).await?;
        let n = create(&store, NodeType::Note, "N", Some(&a)).await?;
        let before = store.get_all_nodes();
        let notifications = count_notifications(&store);

        store.move_node(&n, Some(&b)).await?;

        assert_eq!(notifications.load(Ordering::SeqCst), 1);
        let a_node = store.get_node(&a).unwrap();
        let b_node = store.get_node(&b).unwrap();
        let n_node = store.get_node(&n).unwrap();
        assert!(!a_node.children().contains(&n));
        assert_eq!(b_node.children(), &[n.clone()]);
        assert_eq!(n_node.parent_id.as_deref(), Some(b.as_str()));

        assert!(a_node.updated_at > before[&a].updated_at);
        assert!(b_node.updated_at > before[&b].updated_at);
        assert!(n_node.updated_at > before[&n].updated_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_ids_fail_without_notification() -> Result<()> {
        let store = NodeStore::new();
        let notifications = count_notifications(&store);

        let update = store
            .update_node("nonexistent", NodeUpdate::title("Z"))
            .await
            .unwrap_err();
        let delete = store.delete_node("nonexistent").await.unwrap_err();
        let mv = store.move_node("nonexistent", None).await.unwrap_err();

        for err in [update, delete, mv] {
            assert_eq!(err, NodeStoreError::not_found("nonexistent"));
        }
        assert_eq!(notifications.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_move_to_unknown_target_fails() -> Result<()> {
        let store = NodeStore::new();
        let err = store
            .move_node("welcome-note", Some("nowhere"))
            .await
            .unwrap_err();
        assert_eq!(err, NodeStoreError::not_found("nowhere"));
        assert_eq!(
            store.get_node("welcome-note").unwrap().parent_id.as_deref(),
            Some("quick-notes")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_nodes_is_a_copy() -> Result<()> {
        let store = NodeStore::new();
        let mut copy = store.get_all_nodes();
        copy.remove("root");
        if let Some(node) = copy.get_mut("projects") {
            node.title = "Tampered".to_string();
        }

        assert!(store.get_node("root").is_some());
        assert_eq!(store.get_node("projects").unwrap().title, "Projects");
        Ok(())
    }

    #[tokio::test]
    async fn test_children_follow_insertion_order() -> Result<()> {
        let store = NodeStore::new();
        let first = create(&store, NodeType::Note, "First", Some("learning")).await?;
        let second = create(&store, NodeType::Folder, "Second", Some("learning")).await?;
        let third = create(&store, NodeType::Note, "Third", Some("learning")).await?;

        let ids: Vec<String> = store
            .get_children(Some("learning"))
            .into_iter()
            .map(|node| node.id)
            .collect();
        assert_eq!(ids, vec![first, second, third]);
        Ok(())
    }

    #[tokio::test]
    async fn test_ids_are_unique_and_not_reused() -> Result<()> {
        let store = NodeStore::empty();
        let mut seen = std::collections::HashSet::new();
        for i in 0..50 {
            let id = create(&store, NodeType::Folder, &format!("F{}", i), None).await?;
            assert!(seen.insert(id.clone()));
            store.delete_node(&id).await?;
        }
        assert!(store.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_projection_determinism() -> Result<()> {
        let store = NodeStore::new();
        for i in 0..20 {
            create(&store, NodeType::Note, &format!("Note {}", i), Some("learning")).await?;
        }

        assert_eq!(store.build_tree(None), store.build_tree(None));
        let learning = store.build_tree(Some("learning"));
        let titles: Vec<String> = learning.iter().map(|item| item.title.clone()).collect();
        let expected: Vec<String> = (0..20).map(|i| format!("Note {}", i)).collect();
        assert_eq!(titles, expected);
        assert!(learning.iter().all(|item| item.level == 0));
        Ok(())
    }
}
