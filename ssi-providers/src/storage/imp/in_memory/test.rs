use super::InMemoryStorage;
use crate::storage::{execute, Page, ServiceStorage, StorageError, WatchKey};

#[tokio::test]
async fn test_read_write_delete_roundtrip() {
    let storage = InMemoryStorage::new();

    assert_eq!(storage.read("ns", "a").await.unwrap(), None);

    storage.write("ns", "a", b"one").await.unwrap();
    assert_eq!(storage.read("ns", "a").await.unwrap(), Some(b"one".to_vec()));
    assert!(storage.exists("ns", "a").await.unwrap());

    // writes replace, not append
    storage.write("ns", "a", b"two").await.unwrap();
    assert_eq!(storage.read("ns", "a").await.unwrap(), Some(b"two".to_vec()));

    storage.delete("ns", "a").await.unwrap();
    assert_eq!(storage.read("ns", "a").await.unwrap(), None);
    assert!(!storage.exists("ns", "a").await.unwrap());
}

#[tokio::test]
async fn test_namespaces_are_isolated() {
    let storage = InMemoryStorage::new();

    storage.write("left", "a", b"1").await.unwrap();
    storage.write("right", "a", b"2").await.unwrap();

    assert_eq!(storage.read("left", "a").await.unwrap(), Some(b"1".to_vec()));
    assert_eq!(
        storage.read("right", "a").await.unwrap(),
        Some(b"2".to_vec())
    );
}

#[tokio::test]
async fn test_pagination_two_records_page_size_one() {
    let storage = InMemoryStorage::new();
    storage.write("ns", "a", b"1").await.unwrap();
    storage.write("ns", "b", b"2").await.unwrap();

    let first = storage.list("ns", &Page::with_size(1)).await.unwrap();
    assert_eq!(first.records.len(), 1);
    let token = first.next_page_token.expect("expected continuation token");

    let second = storage
        .list("ns", &Page::with_size(1).next(token))
        .await
        .unwrap();
    assert_eq!(second.records.len(), 1);
    assert!(second.next_page_token.is_none());

    assert_ne!(first.records[0].key, second.records[0].key);
}

#[tokio::test]
async fn test_pagination_completeness_across_page_sizes() {
    let storage = InMemoryStorage::new();
    let total = 7usize;
    for i in 0..total {
        storage
            .write("ns", &format!("key-{i}"), format!("value-{i}").as_bytes())
            .await
            .unwrap();
    }

    for size in 1..=total as u32 + 1 {
        let mut seen = Vec::new();
        let mut page = Page::with_size(size);
        loop {
            let result = storage.list("ns", &page).await.unwrap();
            seen.extend(result.records.iter().map(|r| r.key.clone()));
            match result.next_page_token {
                Some(token) => page = page.next(token),
                None => break,
            }
        }
        assert_eq!(seen.len(), total, "page size {size}");
        seen.dedup();
        assert_eq!(seen.len(), total, "duplicates at page size {size}");
    }
}

#[tokio::test]
async fn test_pagination_token_round_trips_across_sizes() {
    let storage = InMemoryStorage::new();
    for key in ["a", "b", "c", "d", "e"] {
        storage.write("ns", key, b"v").await.unwrap();
    }

    let first = storage.list("ns", &Page::with_size(2)).await.unwrap();
    let token = first.next_page_token.unwrap();

    // resume with a different page size
    let rest = storage
        .list(
            "ns",
            &Page {
                size: Some(3),
                token: Some(token),
            },
        )
        .await
        .unwrap();
    let keys: Vec<&str> = rest.records.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["c", "d", "e"]);
    assert!(rest.next_page_token.is_none());
}

#[tokio::test]
async fn test_list_unpaged_returns_everything() {
    let storage = InMemoryStorage::new();
    for key in ["a", "b", "c"] {
        storage.write("ns", key, b"v").await.unwrap();
    }

    let all = storage.list("ns", &Page::default()).await.unwrap();
    assert_eq!(all.records.len(), 3);
    assert!(all.next_page_token.is_none());

    let missing = storage.list("empty", &Page::default()).await.unwrap();
    assert!(missing.records.is_empty());
}

#[tokio::test]
async fn test_invalid_page_token_rejected() {
    let storage = InMemoryStorage::new();
    storage.write("ns", "a", b"v").await.unwrap();

    let result = storage
        .list(
            "ns",
            &Page {
                size: Some(1),
                token: Some("!!not-base64!!".to_string()),
            },
        )
        .await;
    assert!(matches!(result, Err(StorageError::InvalidPageToken(_))));
}

#[tokio::test]
async fn test_conflicting_transactions_commit_at_most_once() {
    let storage = InMemoryStorage::new();
    storage.write("ns", "slot", b"initial").await.unwrap();
    let watch = [WatchKey::new("ns", "slot")];

    let mut first = storage.begin(&watch).await.unwrap();
    let mut second = storage.begin(&watch).await.unwrap();

    first.write("ns", "slot", b"first");
    second.write("ns", "slot", b"second");
    second.write("ns", "other", b"second-extra");

    storage.commit(first).await.unwrap();

    let result = storage.commit(second).await;
    assert!(matches!(result, Err(StorageError::Conflict(_))));
    assert!(result.unwrap_err().is_retryable());

    // loser's writes are not visible, winner's are
    assert_eq!(
        storage.read("ns", "slot").await.unwrap(),
        Some(b"first".to_vec())
    );
    assert_eq!(storage.read("ns", "other").await.unwrap(), None);
}

#[tokio::test]
async fn test_watch_detects_creation_of_absent_key() {
    let storage = InMemoryStorage::new();
    let watch = [WatchKey::new("ns", "slot")];

    let mut first = storage.begin(&watch).await.unwrap();
    let mut second = storage.begin(&watch).await.unwrap();

    first.write("ns", "slot", b"first");
    storage.commit(first).await.unwrap();

    second.write("ns", "slot", b"second");
    assert!(matches!(
        storage.commit(second).await,
        Err(StorageError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_watch_detects_deletion() {
    let storage = InMemoryStorage::new();
    storage.write("ns", "slot", b"initial").await.unwrap();

    let mut tx = storage.begin(&[WatchKey::new("ns", "slot")]).await.unwrap();
    storage.delete("ns", "slot").await.unwrap();

    tx.write("ns", "slot", b"update");
    assert!(matches!(
        storage.commit(tx).await,
        Err(StorageError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_unrelated_writes_do_not_conflict() {
    let storage = InMemoryStorage::new();
    storage.write("ns", "slot", b"initial").await.unwrap();

    let mut tx = storage.begin(&[WatchKey::new("ns", "slot")]).await.unwrap();
    storage.write("ns", "unrelated", b"noise").await.unwrap();

    tx.write("ns", "slot", b"update");
    storage.commit(tx).await.unwrap();
    assert_eq!(
        storage.read("ns", "slot").await.unwrap(),
        Some(b"update".to_vec())
    );
}

#[tokio::test]
async fn test_execute_helper_commits_buffered_writes() {
    let storage = InMemoryStorage::new();

    let value = execute(&storage, &[WatchKey::new("ns", "slot")], |mut tx| async move {
        tx.write("ns", "slot", b"via-execute");
        Ok((tx, 42))
    })
    .await
    .unwrap();

    assert_eq!(value, 42);
    assert_eq!(
        storage.read("ns", "slot").await.unwrap(),
        Some(b"via-execute".to_vec())
    );
}
