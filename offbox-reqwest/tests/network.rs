//! ReqwestNetwork against a local mock server.

use std::sync::Arc;

use http::{StatusCode, Uri};
use offbox::{Engine, EngineConfig, NoopHost};
use offbox_core::{FetchRequest, Network, NetworkError};
use offbox_moka::MokaStorage;
use offbox_reqwest::ReqwestNetwork;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_body_status_and_headers_are_buffered() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app.js"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("console.log(1)")
                .insert_header("X-Custom-Header", "custom-value"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let network = ReqwestNetwork::default();
    let request = FetchRequest::get(format!("{}/app.js", mock_server.uri())).unwrap();
    let response = network.fetch(&request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.body().as_ref(), b"console.log(1)");
    assert_eq!(response.headers()["x-custom-header"], "custom-value");
}

#[tokio::test]
async fn test_error_status_is_not_a_network_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let network = ReqwestNetwork::default();
    let request = FetchRequest::get(format!("{}/missing", mock_server.uri())).unwrap();
    let response = network.fetch(&request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_refused_connection_is_unreachable() {
    let network = ReqwestNetwork::default();
    let request = FetchRequest::get("http://127.0.0.1:1/").unwrap();

    let error = network.fetch(&request).await.unwrap_err();
    assert!(matches!(error, NetworkError::Unreachable(_)));
}

#[tokio::test]
async fn test_engine_serves_cached_copy_after_upstream_goes_away() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logos/brand.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<svg/>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let origin: Uri = mock_server.uri().parse().unwrap();
    let config = EngineConfig::builder(origin).build().unwrap();
    let engine = Engine::new(
        config,
        Arc::new(MokaStorage::builder().max_entries(100).build()),
        Arc::new(ReqwestNetwork::default()),
        Arc::new(NoopHost),
    );
    let request = FetchRequest::get(format!("{}/logos/brand.svg", mock_server.uri())).unwrap();

    let first = engine.handle_fetch(&request).await.unwrap();
    engine.settle().await;
    drop(mock_server);
    let second = engine.handle_fetch(&request).await.unwrap();

    assert_eq!(first.body(), second.body());
    assert_eq!(second.body().as_ref(), b"<svg/>");
}
