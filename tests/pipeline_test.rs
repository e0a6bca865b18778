//! Integration tests for the extraction pipeline against a mock HTTP upstream
//!
//! Every test starts a `wiremock` server answering both the `HEAD` probe and
//! the `GET` body request, then drives `SiteMeta::parse` end to end.

use std::time::{Duration, Instant};

use site_meta::{FetchConfig, SiteMeta, SiteMetaError};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve_html(server: &MockServer, route: &str, content_type: &str, body: &[u8]) {
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", content_type))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", content_type)
                .set_body_bytes(body.to_vec()),
        )
        .mount(server)
        .await;
}

async fn parse(server: &MockServer, route: &str) -> Result<site_meta::MetadataSet, SiteMetaError> {
    SiteMeta::default()
        .parse(&format!("{}{route}", server.uri()), &CancellationToken::new())
        .await
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_non_html_short_circuits_before_body() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/pdf"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    match parse(&server, "/doc.pdf").await {
        Err(SiteMetaError::UnsupportedContent { content_type }) => {
            assert_eq!(content_type, "application/pdf");
        }
        other => panic!("Expected UnsupportedContent, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unrecognized_meta_is_valid_empty() {
    let server = MockServer::start().await;
    serve_html(
        &server,
        "/",
        "text/html",
        br#"<html><meta name="viewport" content="width=device-width"></html>"#,
    )
    .await;

    let meta = parse(&server, "/").await.expect("empty result is not an error");
    assert!(meta.is_empty());
}

#[tokio::test]
async fn test_twitter_card() {
    let server = MockServer::start().await;
    serve_html(
        &server,
        "/card",
        "text/html",
        br#"<html><meta name="twitter:card" content="summary"></html>"#,
    )
    .await;

    let meta = parse(&server, "/card").await.unwrap();
    assert_eq!(meta.len(), 1);
    assert_eq!(meta.get("twitter:card"), Some("summary"));
}

#[tokio::test]
async fn test_open_graph_type() {
    let server = MockServer::start().await;
    serve_html(
        &server,
        "/movie",
        "text/html",
        br#"<html><meta property="og:type" content="video.movie" /></html>"#,
    )
    .await;

    let meta = parse(&server, "/movie").await.unwrap();
    assert_eq!(meta.len(), 1);
    assert_eq!(meta.get("og:type"), Some("video.movie"));
}

#[tokio::test]
async fn test_unknown_header_charset_is_encoding_error() {
    let server = MockServer::start().await;
    serve_html(
        &server,
        "/",
        "text/html; charset=InvalidEncoding",
        br#"<html><meta property="og:title" content="Title"></html>"#,
    )
    .await;

    match parse(&server, "/").await {
        Err(SiteMetaError::Encoding(message)) => assert!(message.contains("INVALIDENCODING")),
        other => panic!("Expected EncodingError, got: {other:?}"),
    }
}

// ============================================================================
// Transport Behavior
// ============================================================================

#[tokio::test]
async fn test_invalid_url_never_reaches_network() {
    let result = SiteMeta::default()
        .parse("invalid url", &CancellationToken::new())
        .await;
    assert!(matches!(result, Err(SiteMetaError::InvalidUrl { .. })));
}

#[tokio::test]
async fn test_status_code_is_not_checked() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(404).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_bytes(br#"<meta property="og:title" content="Not Found">"#.to_vec()),
        )
        .mount(&server)
        .await;

    let meta = parse(&server, "/missing").await.unwrap();
    assert_eq!(meta.get("og:title"), Some("Not Found"));
}

#[tokio::test]
async fn test_cookies_from_probe_are_sent_with_body_request() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/gated"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .insert_header("set-cookie", "session=abc123; Path=/"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gated"))
        .and(header("cookie", "session=abc123"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(br#"<meta property="og:title" content="Members">"#.to_vec()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let meta = parse(&server, "/gated").await.unwrap();
    assert_eq!(meta.get("og:title"), Some("Members"));
}

#[tokio::test]
async fn test_cookies_do_not_leak_between_calls() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .insert_header("set-cookie", "session=first; Path=/"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"<html></html>".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/other"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/other"))
        .and(header("cookie", "session=first"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(br#"<meta property="og:title" content="leaked">"#.to_vec()),
        )
        .expect(0)
        .mount(&server)
        .await;

    let site_meta = SiteMeta::default();
    let cancel = CancellationToken::new();
    site_meta
        .parse(&format!("{}/login", server.uri()), &cancel)
        .await
        .unwrap();
    let meta = site_meta
        .parse(&format!("{}/other", server.uri()), &cancel)
        .await
        .unwrap();
    assert!(meta.is_empty());
}

// ============================================================================
// Cancellation
// ============================================================================

async fn slow_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(br#"<meta property="og:title" content="late">"#.to_vec())
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_caller_cancellation_aborts_body_retrieval() {
    let server = slow_server().await;
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = SiteMeta::default().parse(&server.uri(), &cancel).await;

    assert!(matches!(result, Err(SiteMetaError::Cancelled(_))));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_deadline_is_cancellation_not_network_error() {
    let server = slow_server().await;
    let site_meta = SiteMeta::new(FetchConfig {
        deadline: Some(Duration::from_millis(200)),
        ..FetchConfig::default()
    });

    let result = site_meta.parse(&server.uri(), &CancellationToken::new()).await;
    match result {
        Err(err @ SiteMetaError::Cancelled(_)) => assert_eq!(err.kind(), "cancelled"),
        other => panic!("Expected CancellationError, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_timeout_is_network_error() {
    let server = slow_server().await;
    let site_meta = SiteMeta::new(FetchConfig {
        request_timeout: Duration::from_millis(200),
        deadline: None,
        ..FetchConfig::default()
    });

    let result = site_meta.parse(&server.uri(), &CancellationToken::new()).await;
    assert!(matches!(result, Err(SiteMetaError::Network(_))));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_invocations_are_independent() {
    let server = MockServer::start().await;
    for i in 0..8 {
        let body = format!(r#"<meta property="og:title" content="page {i}">"#);
        serve_html(&server, &format!("/p{i}"), "text/html", body.as_bytes()).await;
    }

    let site_meta = std::sync::Arc::new(SiteMeta::default());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let site_meta = site_meta.clone();
            let url = format!("{}/p{i}", server.uri());
            tokio::spawn(async move { site_meta.parse(&url, &CancellationToken::new()).await })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let meta = handle.await.unwrap().unwrap();
        assert_eq!(meta.get("og:title"), Some(format!("page {i}").as_str()));
    }
}
