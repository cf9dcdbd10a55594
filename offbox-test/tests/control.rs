//! Control channel: SKIP_WAITING, CLEAR_CACHE, GET_CACHE_STATS.

use http::HeaderValue;
use http::header::CONTENT_LENGTH;
use offbox::ControlMessage;
use offbox_backend::CacheStorage;
use offbox_core::{CacheEntry, FetchResponse};
use offbox_test::{HostCall, TestEngine, stale_entry, url};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::sync::oneshot;

const STATIC: &str = "interbox-static-v1.3.0";
const DYNAMIC: &str = "interbox-dynamic-v1.3.0";
const RUNTIME: &str = "interbox-runtime-v1.3.0";

async fn request_stats(test: &TestEngine) -> Value {
    let (reply, receiver) = oneshot::channel();
    let handled = test
        .engine
        .handle_message(&json!({ "type": "GET_CACHE_STATS" }), Some(reply))
        .await;
    assert_eq!(handled, Some(ControlMessage::GetCacheStats));
    receiver.await.unwrap()
}

#[tokio::test]
async fn skip_waiting_asks_the_host() {
    let test = TestEngine::new();

    test.engine
        .handle_message(&json!({ "type": "SKIP_WAITING" }), None)
        .await;

    assert_eq!(test.host.calls(), vec![HostCall::SkipWaiting]);
}

#[tokio::test]
async fn clear_cache_is_idempotent() {
    let test = TestEngine::new();
    test.seed(STATIC, &url("/"), stale_entry("root", chrono::Duration::hours(1)))
        .await;
    test.seed("other-app-cache", &url("/x"), stale_entry("x", chrono::Duration::hours(1)))
        .await;

    for _ in 0..2 {
        let handled = test
            .engine
            .handle_message(&json!({ "type": "CLEAR_CACHE" }), None)
            .await;
        assert_eq!(handled, Some(ControlMessage::ClearCache));
        test.engine.settle().await;

        assert!(test.storage.inner().cache_names().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn stats_on_empty_storage_do_not_create_generations() {
    let test = TestEngine::new();

    let stats = request_stats(&test).await;

    assert_eq!(
        stats,
        json!({
            "totalEntries": 0,
            "totalSize": 0,
            "perGeneration": {
                STATIC: { "entries": 0, "size": 0, "items": [] },
                DYNAMIC: { "entries": 0, "size": 0, "items": [] },
                RUNTIME: { "entries": 0, "size": 0, "items": [] },
            }
        })
    );
    assert!(test.storage.inner().cache_names().await.unwrap().is_empty());
}

#[tokio::test]
async fn stats_count_a_new_entry() {
    let test = TestEngine::new();
    let before = request_stats(&test).await;

    let target = url("/images/bg_rounded.png");
    test.network.ok(target.clone(), "0123456789");
    test.get(&target).await;

    let after = request_stats(&test).await;
    assert_eq!(after["totalEntries"], before["totalEntries"].as_u64().unwrap() + 1);
    assert_eq!(after["totalSize"], 10);

    let items = after["perGeneration"][STATIC]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["url"], target.as_str());
    assert_eq!(items[0]["size"], 10);
    assert!(items[0]["cachedAt"].is_string());
    assert!(items[0]["age"].as_u64().unwrap() < 5_000);
}

#[tokio::test]
async fn stats_report_unknown_age_as_null() {
    let test = TestEngine::new();
    let response =
        FetchResponse::ok("abc").with_header(CONTENT_LENGTH, HeaderValue::from_static("3"));
    test.seed(DYNAMIC, &url("/legacy"), CacheEntry::unstamped(response))
        .await;
    test.seed(DYNAMIC, &url("/no-length"), CacheEntry::unstamped(FetchResponse::ok("abcdef")))
        .await;

    let stats = request_stats(&test).await;

    let dynamic = &stats["perGeneration"][DYNAMIC];
    assert_eq!(dynamic["entries"], 2);
    assert_eq!(dynamic["size"], 3);
    for item in dynamic["items"].as_array().unwrap() {
        assert_eq!(item["cachedAt"], Value::Null);
        assert_eq!(item["age"], Value::Null);
    }
}

#[tokio::test]
async fn unknown_messages_are_ignored() {
    let test = TestEngine::new();
    test.seed(STATIC, &url("/"), stale_entry("root", chrono::Duration::hours(1)))
        .await;

    for message in [
        json!({ "type": "FOO" }),
        json!({ "kind": "CLEAR_CACHE" }),
        json!(42),
        Value::Null,
    ] {
        assert_eq!(test.engine.handle_message(&message, None).await, None);
    }
    test.engine.settle().await;

    assert!(test.host.calls().is_empty());
    assert_eq!(test.storage.inner().cache_names().await.unwrap(), vec![STATIC]);
}

#[tokio::test]
async fn stats_survive_a_dropped_reply_port() {
    let test = TestEngine::new();
    let (reply, receiver) = oneshot::channel();
    drop(receiver);

    let handled = test
        .engine
        .handle_message(&json!({ "type": "GET_CACHE_STATS" }), Some(reply))
        .await;

    assert_eq!(handled, Some(ControlMessage::GetCacheStats));
}
