//! Tests for the in-memory record store.

use anidirector_core::Character;
use anidirector_storage::{Collection, InMemoryStore, RecordStore, load_all};
use serde_json::json;

#[tokio::test]
async fn test_legacy_blob_migrates_and_is_removed() {
    let store = InMemoryStore::new().with_legacy_blob(
        Collection::Characters,
        vec![
            json!({"id": "1", "name": "Tico"}),
            json!({"id": "2", "name": "Mimi"}),
            json!({"id": "3", "name": "Crow"}),
        ],
    );

    let first: Vec<Character> = load_all(&store).await.unwrap();
    assert_eq!(first.len(), 3);
    assert!(store.legacy_blob(Collection::Characters).is_none());

    let second: Vec<Character> = load_all(&store).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_legacy_blob_is_not_imported() {
    let store = InMemoryStore::new().with_legacy_blob(Collection::Projects, Vec::new());

    assert!(store.get_all(Collection::Projects).await.unwrap().is_empty());
    assert!(store.legacy_blob(Collection::Projects).is_some());
}

#[tokio::test]
async fn test_replace_all_then_upsert() {
    let store = InMemoryStore::new();
    store
        .replace_all(
            Collection::Characters,
            vec![json!({"id": "1", "name": "Tico"}), json!({"id": "2", "name": "Mimi"})],
        )
        .await
        .unwrap();
    store
        .upsert(Collection::Characters, json!({"id": "1", "name": "Tico", "description": "updated"}))
        .await
        .unwrap();

    let records = store.get_all(Collection::Characters).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["description"], "updated");
}
