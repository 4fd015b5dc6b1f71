//! Reload controller behavior against an in-memory document store.

use std::sync::Arc;
use std::time::Duration;

use docstore_config::error::{FormatError, ReloadError};
use docstore_config::flatten::{flatten, DEFAULT_DELIMITER};
use docstore_config::{
    DocumentConfigProvider, MemoryDocumentStore, PartitionKey, ProviderOptions, SubKeyPicker,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;

fn provider_for(store: &Arc<MemoryDocumentStore>, partition: Option<&str>) -> DocumentConfigProvider {
    let options = ProviderOptions::builder()
        .store(store.clone())
        .document_id("app")
        .partition_key(partition.map(str::to_string))
        .build()
        .unwrap();
    DocumentConfigProvider::new(options)
}

#[tokio::test]
async fn test_changed_document_replaces_snapshot() {
    let store = Arc::new(MemoryDocumentStore::new());
    let first = json!({"a": {"b": 1, "c": "x", "d": true, "e": null}});
    store.put_json("app", PartitionKey::from("cfg"), &first);
    let provider = provider_for(&store, Some("cfg"));
    let cancel = CancellationToken::new();

    assert!(provider.reload(&cancel).await.unwrap());
    assert_eq!(provider.snapshot().data(), &flatten(&first, DEFAULT_DELIMITER).unwrap());

    let second = json!({"a": {"b": 2}, "list": [10, 20]});
    let etag = store.put_json("app", PartitionKey::from("cfg"), &second);

    assert!(provider.reload(&cancel).await.unwrap());
    let snapshot = provider.snapshot();
    assert_eq!(snapshot.data(), &flatten(&second, DEFAULT_DELIMITER).unwrap());
    assert_eq!(snapshot.etag(), etag);
    assert_eq!(snapshot.get("list:1"), Some(Some("20")));
    assert_eq!(snapshot.get("a:c"), None);
    assert_eq!(snapshot.generation(), 2);
}

#[tokio::test]
async fn test_not_modified_leaves_state_untouched() {
    let store = Arc::new(MemoryDocumentStore::new());
    store.put_json("app", PartitionKey::None, &json!({"a": 1}));
    let provider = provider_for(&store, None);
    let cancel = CancellationToken::new();

    provider.reload(&cancel).await.unwrap();
    let before = provider.snapshot();

    for _ in 0..3 {
        assert!(!provider.reload(&cancel).await.unwrap());
    }
    let after = provider.snapshot();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after.etag(), before.etag());
}

#[tokio::test]
async fn test_removed_document_keeps_last_snapshot() {
    let store = Arc::new(MemoryDocumentStore::new());
    let etag = store.put_json("app", PartitionKey::None, &json!({"a": {"b": 1}}));
    let provider = provider_for(&store, None);
    let cancel = CancellationToken::new();

    assert!(provider.reload(&cancel).await.unwrap());
    let before = provider.snapshot();

    assert!(store.remove("app", &PartitionKey::None));
    assert!(!provider.reload(&cancel).await.unwrap());

    let after = provider.snapshot();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after.etag(), etag);
    assert_eq!(after.get("a:b"), Some(Some("1")));
    assert_eq!(store.read_count(), 2);
}

#[tokio::test]
async fn test_malformed_document_preserves_state() {
    let store = Arc::new(MemoryDocumentStore::new());
    let etag = store.put_json("app", PartitionKey::None, &json!({"a": 1}));
    let provider = provider_for(&store, None);
    let cancel = CancellationToken::new();
    provider.reload(&cancel).await.unwrap();

    store.put("app", PartitionKey::None, "{\"a\": ");
    let err = provider.reload(&cancel).await.unwrap_err();
    assert!(matches!(err, ReloadError::Format(FormatError::Malformed(_))));
    assert_eq!(provider.etag(), etag);
    assert_eq!(provider.get("a"), Some(Some("1".to_string())));

    // Fixed document is picked up on the next attempt
    store.put_json("app", PartitionKey::None, &json!({"a": 2}));
    assert!(provider.reload(&cancel).await.unwrap());
    assert_eq!(provider.get("a"), Some(Some("2".to_string())));
}

#[tokio::test]
async fn test_duplicate_keys_preserve_state() {
    let store = Arc::new(MemoryDocumentStore::new());
    store.put_json("app", PartitionKey::None, &json!({"a": 1}));
    let provider = provider_for(&store, None);
    let cancel = CancellationToken::new();
    provider.reload(&cancel).await.unwrap();
    let before = provider.snapshot();

    store.put("app", PartitionKey::None, r#"{"Key": 1, "key": 2}"#);
    let err = provider.reload(&cancel).await.unwrap_err();
    assert!(matches!(err, ReloadError::Format(FormatError::DuplicateKey(_))));
    assert!(Arc::ptr_eq(&before, &provider.snapshot()));
}

#[tokio::test]
async fn test_transport_error_surfaces() {
    let store = Arc::new(MemoryDocumentStore::new());
    store.put_json("app", PartitionKey::None, &json!({"a": 1}));
    let provider = provider_for(&store, None);
    store.set_offline(true);

    let err = provider.reload(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, ReloadError::Transport(_)));
    assert!(provider.snapshot().data().is_empty());
}

#[tokio::test]
async fn test_sub_key_keys_are_relative() {
    let store = Arc::new(MemoryDocumentStore::new());
    store.put_json(
        "app",
        PartitionKey::None,
        &json!({"id": "app", "settings": {"Logging": {"Level": "debug"}, "Hosts": ["a"]}}),
    );
    let options = ProviderOptions::builder()
        .store(store.clone())
        .document_id("app")
        .sub_key_picker(SubKeyPicker::path("settings"))
        .build()
        .unwrap();
    let provider = DocumentConfigProvider::new(options);

    provider.reload(&CancellationToken::new()).await.unwrap();
    let snapshot = provider.snapshot();
    assert_eq!(snapshot.data().len(), 2);
    assert_eq!(snapshot.get("logging:level"), Some(Some("debug")));
    assert_eq!(snapshot.get("Hosts:0"), Some(Some("a")));
    assert_eq!(snapshot.get("id"), None);
    assert_eq!(snapshot.get("settings:Logging:Level"), None);
}

#[tokio::test]
async fn test_cancel_during_fetch() {
    let store = Arc::new(MemoryDocumentStore::new());
    store.put_json("app", PartitionKey::None, &json!({"a": 1}));
    store.set_latency(Duration::from_secs(30));
    let provider = provider_for(&store, None);
    let cancel = CancellationToken::new();

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let err = provider.reload(&cancel).await.unwrap_err();
    assert!(matches!(err, ReloadError::Cancelled));
    assert!(provider.etag().is_empty());
    assert!(provider.snapshot().data().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reloads_fetch_once() {
    let store = Arc::new(MemoryDocumentStore::new());
    store.put_json("app", PartitionKey::None, &json!({"a": 1}));
    store.set_latency(Duration::from_millis(50));
    let provider = Arc::new(provider_for(&store, None));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let provider = provider.clone();
            tokio::spawn(async move { provider.reload(&CancellationToken::new()).await })
        })
        .collect();

    let mut changed = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            changed += 1;
        }
    }

    // Serialized: the first reload takes the etag, the rest see NotModified
    assert_eq!(changed, 1);
    assert_eq!(store.read_count(), 4);
    assert_eq!(provider.snapshot().generation(), 1);
}

#[tokio::test]
async fn test_readers_see_whole_snapshots() {
    let store = Arc::new(MemoryDocumentStore::new());
    let etag = store.put_json("app", PartitionKey::None, &json!({"v": "1"}));
    let provider = provider_for(&store, None);
    provider.reload(&CancellationToken::new()).await.unwrap();

    let held = provider.snapshot();
    let next_etag = store.put_json("app", PartitionKey::None, &json!({"v": "2"}));
    provider.reload(&CancellationToken::new()).await.unwrap();

    // An old reader keeps a consistent pair
    assert_eq!(held.etag(), etag);
    assert_eq!(held.get("v"), Some(Some("1")));
    let current = provider.snapshot();
    assert_eq!(current.etag(), next_etag);
    assert_eq!(current.get("v"), Some(Some("2")));
}
