//! Strategy behaviour through the engine's fetch entry point.

use std::time::Duration;

use http::{Method, StatusCode};
use offbox_core::{Destination, FetchRequest};
use offbox_test::tracing::SpanCollector;
use offbox_test::{TestEngine, stale_entry, url};
use pretty_assertions::assert_eq;

const STATIC: &str = "interbox-static-v1.3.0";
const DYNAMIC: &str = "interbox-dynamic-v1.3.0";
const RUNTIME: &str = "interbox-runtime-v1.3.0";

#[tokio::test]
async fn never_cache_requests_touch_no_cache() {
    let test = TestEngine::new();
    let urls = [
        "https://identitytoolkit.googleapis.com/v1/accounts:lookup",
        "https://firestore.googleapis.com/v1/projects/x/documents/teams",
        "https://www.google-analytics.com/collect",
    ];
    for target in urls {
        test.network.ok(target, "secret");
    }

    for target in urls {
        let response = test.get(target).await;
        assert_eq!(response.body().as_ref(), b"secret");
    }
    test.network.set_offline(true);
    for target in urls {
        assert!(test.get(target).await.is_offline());
    }

    for target in urls {
        assert_eq!(test.storage.counters().touched(target), 0, "{target}");
    }
    assert_eq!(test.storage.counters().put_count(), 0);
}

#[tokio::test]
async fn cloud_function_offline_without_cache_is_503() {
    let test = TestEngine::new();
    test.network.set_offline(true);

    let response = test
        .get("https://us-central1-x.cloudfunctions.net/api")
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body().as_ref(), b"Offline");
}

#[tokio::test]
async fn network_first_caches_into_runtime_and_falls_back() {
    let test = TestEngine::new();
    let target = "https://api.example.com/teams";
    test.network.ok(target, "[1,2,3]");

    assert_eq!(test.get(target).await.body().as_ref(), b"[1,2,3]");
    let stored = test.stored(RUNTIME, target).await.expect("runtime entry");
    assert_eq!(stored.response().body().as_ref(), b"[1,2,3]");

    test.network.set_offline(true);
    assert_eq!(test.get(target).await.body().as_ref(), b"[1,2,3]");
}

#[tokio::test]
async fn network_first_non_ok_prefers_cached_copy() {
    let test = TestEngine::new();
    let cached = "https://api.example.com/cached";
    let missing = "https://api.example.com/missing";
    test.seed(RUNTIME, cached, stale_entry("old", chrono::Duration::minutes(5)))
        .await;
    test.network
        .status(cached, StatusCode::INTERNAL_SERVER_ERROR)
        .status(missing, StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(test.get(cached).await.body().as_ref(), b"old");

    let response = test.get(missing).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(test.stored(RUNTIME, missing).await, None);
}

#[tokio::test]
async fn fonts_are_served_from_cache_on_second_request() {
    let test = TestEngine::new();
    let font = "https://fonts.gstatic.com/foo.woff2";
    test.network.ok(font, "woff2");

    let first = test.get(font).await;
    let second = test.get(font).await;

    assert_eq!(test.network.calls(font), 1);
    assert_eq!(first.body(), second.body());
    assert!(test.stored(STATIC, font).await.is_some());
}

#[tokio::test]
async fn expired_static_entry_is_refetched_and_restamped() {
    let test = TestEngine::new();
    let image = url("/images/bg_main.png");
    test.seed(STATIC, &image, stale_entry("old", chrono::Duration::days(8)))
        .await;
    test.network.ok(image.clone(), "new");

    assert_eq!(test.get(&image).await.body().as_ref(), b"new");
    assert_eq!(test.network.calls(&image), 1);

    let stored = test.stored(STATIC, &image).await.unwrap();
    assert_eq!(stored.response().body().as_ref(), b"new");
    assert!(stored.age().unwrap() < Duration::from_secs(5));
}

#[tokio::test]
async fn expired_static_entry_is_served_when_refetch_fails() {
    let test = TestEngine::new();
    let script = url("/assets/app.js");
    let broken = url("/assets/broken.css");
    test.seed(STATIC, &script, stale_entry("stale js", chrono::Duration::days(9)))
        .await;
    test.seed(STATIC, &broken, stale_entry("stale css", chrono::Duration::days(9)))
        .await;
    test.network.fail(script.clone());
    test.network.status(broken.clone(), StatusCode::BAD_GATEWAY);

    assert_eq!(test.get(&script).await.body().as_ref(), b"stale js");
    assert_eq!(test.get(&broken).await.body().as_ref(), b"stale css");
}

#[tokio::test]
async fn fresh_static_entry_skips_network() {
    let test = TestEngine::new();
    let logo = url("/logos/logo_circulo.png");
    test.seed(STATIC, &logo, stale_entry("logo", chrono::Duration::days(6)))
        .await;

    assert_eq!(test.get(&logo).await.body().as_ref(), b"logo");
    assert_eq!(test.network.total_calls(), 0);
}

#[tokio::test]
async fn cache_first_writes_dynamic_and_skips_non_ok() {
    let test = TestEngine::new();
    let data = url("/data.txt");
    let gone = url("/gone.txt");
    test.network.ok(data.clone(), "data");
    test.network.status(gone.clone(), StatusCode::NOT_FOUND);

    test.get(&data).await;
    test.get(&data).await;
    assert_eq!(test.network.calls(&data), 1);
    assert!(test.stored(DYNAMIC, &data).await.is_some());

    assert_eq!(test.get(&gone).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(test.get(&gone).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(test.network.calls(&gone), 2);
    assert_eq!(test.stored(DYNAMIC, &gone).await, None);
}

#[tokio::test]
async fn offline_navigation_gets_the_shell() {
    let test = TestEngine::new();
    test.seed(
        STATIC,
        &url("/index.html"),
        stale_entry("<html>shell</html>", chrono::Duration::hours(1)),
    )
    .await;
    test.network.set_offline(true);

    let navigation = FetchRequest::navigation(url("/hub").as_str()).unwrap();
    let response = test.fetch(navigation).await.unwrap();
    assert_eq!(response.body().as_ref(), b"<html>shell</html>");

    let plain = test.get(&url("/hub")).await;
    assert!(plain.is_offline());
}

#[tokio::test]
async fn navigation_prefers_its_own_cached_copy() {
    let test = TestEngine::new();
    test.seed(
        STATIC,
        &url("/index.html"),
        stale_entry("shell", chrono::Duration::hours(1)),
    )
    .await;
    test.seed(
        DYNAMIC,
        &url("/ranking"),
        stale_entry("ranking page", chrono::Duration::hours(1)),
    )
    .await;
    test.network.set_offline(true);

    let navigation = FetchRequest::navigation(url("/ranking").as_str()).unwrap();
    let response = test.fetch(navigation).await.unwrap();
    assert_eq!(response.body().as_ref(), b"ranking page");
}

#[tokio::test]
async fn written_entries_carry_a_recent_timestamp() {
    let test = TestEngine::new();
    let targets = [
        url("/styles/main.css"),
        "https://api.example.com/users".to_owned(),
        url("/manifest.json"),
    ];
    for target in &targets {
        test.network.ok(target.clone(), "body");
        test.get(target).await;
    }

    for (cache, target) in [STATIC, RUNTIME, DYNAMIC].into_iter().zip(&targets) {
        let entry = test.stored(cache, target).await.expect(target);
        let age = entry.age().expect("entry must be stamped");
        assert!(age < Duration::from_secs(5), "{target}: {age:?}");
    }
}

#[tokio::test]
async fn failed_writes_do_not_affect_the_response() {
    let test = TestEngine::new();
    let target = url("/images/twolines.png");
    test.network.ok(target.clone(), "png");
    test.storage.set_fail_writes(true);

    let response = test.get(&target).await;

    assert!(response.is_ok());
    assert_eq!(response.body().as_ref(), b"png");
    assert_eq!(test.stored(STATIC, &target).await, None);
}

#[tokio::test]
async fn failed_reads_count_as_misses() {
    let test = TestEngine::new();
    let data = url("/data.txt");
    test.network.ok(data.clone(), "data");
    test.get(&data).await;
    assert!(test.stored(DYNAMIC, &data).await.is_some());

    test.storage.counters().reset();
    test.network.reset_calls();
    test.storage.set_fail_lookups(true);

    let response = test.get(&data).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body().as_ref(), b"data");
    assert_eq!(test.network.calls(&data), 1);
    assert_eq!(test.storage.counters().lookup_count(), 3);
}

#[tokio::test]
async fn versioned_freshness_follows_the_target_generation() {
    let test = TestEngine::new();
    let image = url("/images/podium.png");
    test.seed(DYNAMIC, &image, stale_entry("podium", chrono::Duration::days(2)))
        .await;
    test.network.ok(image.clone(), "new podium");

    let response = test.get(&image).await;

    assert_eq!(response.body().as_ref(), b"podium");
    assert_eq!(test.network.calls(&image), 0);
}

#[tokio::test]
async fn pass_through_requests_are_not_handled() {
    let test = TestEngine::new();
    let post = FetchRequest::new(Method::POST, url("/api/save").parse().unwrap());
    let workbox = FetchRequest::get(url("/workbox-4c3d.js").as_str()).unwrap();

    assert_eq!(test.fetch(post).await, None);
    assert_eq!(test.fetch(workbox).await, None);
    assert_eq!(test.network.total_calls(), 0);
}

#[tokio::test]
async fn destination_hint_routes_to_static() {
    let test = TestEngine::new();
    let avatar = "https://cdn.example/avatar/42";
    test.network.ok(avatar, "jpeg");
    let request = FetchRequest::get(avatar)
        .unwrap()
        .with_destination(Destination::Image);

    test.fetch(request).await.unwrap();

    assert!(test.stored(STATIC, avatar).await.is_some());
}

#[tokio::test]
async fn cache_writes_are_offloaded() {
    let test = TestEngine::new();
    let target = url("/assets/chunk.js");
    test.network.ok(target.clone(), "js");
    let (spans, _guard) = SpanCollector::install();

    test.get(&target).await;
    test.get(&target).await;

    assert_eq!(spans.count("offload_task", "kind", "cache-write"), 1);
}
