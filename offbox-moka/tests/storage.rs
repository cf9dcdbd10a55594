//! Behaviour of the Moka named cache storage.

use chrono::Utc;
use offbox_backend::{CacheStorage, DeleteStatus};
use offbox_core::{CacheEntry, EntryKey, EntryMeta, FetchResponse, StrategyName};
use offbox_moka::{MokaStorage, MokaStorageBuilder};

fn entry(body: &'static str) -> CacheEntry {
    CacheEntry::stamped(FetchResponse::ok(body), StrategyName::CacheFirst)
}

#[tokio::test]
async fn read_only_operations_do_not_create_caches() {
    let storage = MokaStorage::builder().max_entries(100).build();
    let key = EntryKey::get("https://app.example/");

    assert_eq!(storage.lookup("missing", &key).await.unwrap(), None);
    assert!(storage.keys("missing").await.unwrap().is_empty());
    assert!(!storage.has("missing").await.unwrap());
    assert_eq!(
        storage.delete("missing", &key).await.unwrap(),
        DeleteStatus::Missing
    );
    assert!(storage.cache_names().await.unwrap().is_empty());
}

#[tokio::test]
async fn put_creates_cache_lazily_and_overwrites() {
    let storage = MokaStorageBuilder::default().max_entries(100).build();
    let key = EntryKey::get("https://app.example/app.js");

    storage.put("static", key.clone(), entry("v1")).await.unwrap();
    storage.put("static", key.clone(), entry("v2")).await.unwrap();

    assert!(storage.has("static").await.unwrap());
    let stored = storage.lookup("static", &key).await.unwrap().unwrap();
    assert_eq!(stored.response().body().as_ref(), b"v2");
    assert_eq!(storage.keys("static").await.unwrap(), vec![key]);
}

#[tokio::test]
async fn caches_are_isolated_by_name() {
    let storage = MokaStorage::builder().max_entries(100).build();
    let key = EntryKey::get("https://app.example/index.html");

    storage.put("a", key.clone(), entry("a")).await.unwrap();
    assert_eq!(storage.lookup("b", &key).await.unwrap(), None);

    storage.open("b").await.unwrap();
    assert_eq!(
        storage.cache_names().await.unwrap(),
        vec!["a".to_owned(), "b".to_owned()]
    );
}

#[tokio::test]
async fn delete_entry_and_cache() {
    let storage = MokaStorage::builder().max_entries(100).build();
    let key = EntryKey::get("https://app.example/logo.png");
    storage.put("static", key.clone(), entry("png")).await.unwrap();

    assert_eq!(
        storage.delete("static", &key).await.unwrap(),
        DeleteStatus::Deleted(1)
    );
    assert_eq!(
        storage.delete("static", &key).await.unwrap(),
        DeleteStatus::Missing
    );

    assert!(storage.delete_cache("static").await.unwrap());
    assert!(!storage.delete_cache("static").await.unwrap());
    assert!(storage.cache_names().await.unwrap().is_empty());
}

#[tokio::test]
async fn metadata_is_stored_with_the_response() {
    let storage = MokaStorage::builder().max_bytes(1024 * 1024).build();
    let key = EntryKey::get("https://app.example/data.json");
    let cached_at = Utc::now() - chrono::Duration::days(3);
    let meta = EntryMeta {
        cached_at: Some(cached_at),
        strategy: Some(StrategyName::NetworkFirst),
    };

    storage
        .put(
            "runtime",
            key.clone(),
            CacheEntry::new(FetchResponse::ok("{}"), meta.clone()),
        )
        .await
        .unwrap();

    let stored = storage.lookup("runtime", &key).await.unwrap().unwrap();
    assert_eq!(stored.meta(), &meta);
}

#[tokio::test]
async fn clones_share_caches() {
    let storage = MokaStorage::builder().max_entries(10).build();
    let clone = storage.clone();
    let key = EntryKey::get("https://app.example/");

    storage.put("dynamic", key.clone(), entry("shell")).await.unwrap();
    assert!(clone.lookup("dynamic", &key).await.unwrap().is_some());
}
