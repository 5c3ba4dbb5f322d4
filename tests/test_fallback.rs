use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tick_liquidity::fetch_data::config::QUERY_PATH;
use tick_liquidity::fetch_data::source::{EndpointFetcher, LiquiditySource};
use tick_liquidity::fetch_data::{FailureKind, FetchConfig, FetchError};
use tick_liquidity::pipeline;

// ── Helpers ──────────────────────────────────────────────────────────

fn liquidity_body() -> serde_json::Value {
    json!({
        "liquidity": [
            { "liquidity_amount": "100", "lower_tick": "10", "upper_tick": "50" },
            { "liquidity_amount": "250.5", "lower_tick": "-300", "upper_tick": "300" },
            { "liquidity_amount": "7", "lower_tick": "0", "upper_tick": "1" }
        ]
    })
}

fn fetcher(servers: &[&MockServer], timeout_ms: u64) -> EndpointFetcher {
    let endpoints: Vec<String> = servers.iter().map(|s| s.uri()).collect();
    let config = FetchConfig::resolve(&endpoints, None, Some(timeout_ms)).unwrap();
    EndpointFetcher::new(config).unwrap()
}

async fn respond(server: &MockServer, template: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("pool_id", "1066"))
        .respond_with(template)
        .expect(times)
        .mount(server)
        .await;
}

// ── Tests ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_falls_through_500_and_timeout_to_third_endpoint() {
    let (a, b, c, d) = (
        MockServer::start().await,
        MockServer::start().await,
        MockServer::start().await,
        MockServer::start().await,
    );
    respond(&a, ResponseTemplate::new(500), 1).await;
    respond(
        &b,
        ResponseTemplate::new(200)
            .set_body_json(liquidity_body())
            .set_delay(Duration::from_secs(3)),
        1,
    )
    .await;
    respond(&c, ResponseTemplate::new(200).set_body_json(liquidity_body()), 1).await;
    // must never be reached
    respond(&d, ResponseTemplate::new(200).set_body_json(liquidity_body()), 0).await;

    let ok = fetcher(&[&a, &b, &c, &d], 300)
        .fetch_liquidity("1066", None)
        .await
        .unwrap();

    assert_eq!(ok.endpoint, c.uri());
    assert_eq!(ok.records.len(), 3);
    assert_eq!(ok.records[1].liquidity_amount, "250.5");
    assert_eq!(ok.failures.len(), 2);
    assert_eq!(ok.failures[0].endpoint, a.uri());
    assert_eq!(ok.failures[0].kind, FailureKind::Http { status: 500 });
    assert_eq!(ok.failures[1].endpoint, b.uri());
    assert_eq!(ok.failures[1].kind, FailureKind::Timeout);
    assert_eq!(ok.failures[1].detail, "timed out after 300 ms");
}

#[tokio::test]
async fn test_all_endpoints_fail_in_order() {
    let (a, b, c) = (
        MockServer::start().await,
        MockServer::start().await,
        MockServer::start().await,
    );
    respond(&a, ResponseTemplate::new(500), 1).await;
    respond(&b, ResponseTemplate::new(503), 1).await;
    respond(&c, ResponseTemplate::new(404), 1).await;

    let err = fetcher(&[&a, &b, &c], 2000)
        .fetch_liquidity("1066", None)
        .await
        .unwrap_err();

    let failures = err.failures();
    assert_eq!(failures.len(), 3);
    let statuses: Vec<FailureKind> = failures.iter().map(|f| f.kind.clone()).collect();
    assert_eq!(statuses, vec![
        FailureKind::Http { status: 500 },
        FailureKind::Http { status: 503 },
        FailureKind::Http { status: 404 },
    ]);

    let message = err.to_string();
    let lines: Vec<&str> = message.lines().collect();
    assert_eq!(lines[0], "All endpoints failed:");
    let expected = vec![
        format!("{}: HTTP 500", a.uri()),
        format!("{}: HTTP 503", b.uri()),
        format!("{}: HTTP 404", c.uri()),
    ];
    assert_eq!(lines[1..].to_vec(), expected);
}

#[tokio::test]
async fn test_missing_liquidity_array_tries_next() {
    let (a, b) = (MockServer::start().await, MockServer::start().await);
    respond(
        &a,
        ResponseTemplate::new(200).set_body_json(json!({ "code": 3, "message": "pool not found" })),
        1,
    )
    .await;
    respond(&b, ResponseTemplate::new(200).set_body_json(liquidity_body()), 1).await;

    let ok = fetcher(&[&a, &b], 2000)
        .fetch_liquidity("1066", None)
        .await
        .unwrap();
    assert_eq!(ok.endpoint, b.uri());
    assert_eq!(ok.failures[0].kind, FailureKind::Validation);
    assert_eq!(ok.failures[0].detail, "missing liquidity array in response");
}

#[tokio::test]
async fn test_non_json_body_is_decode_failure() {
    let a = MockServer::start().await;
    respond(&a, ResponseTemplate::new(200).set_body_string("<html>gateway</html>"), 1).await;

    let err = fetcher(&[&a], 2000)
        .fetch_liquidity("1066", None)
        .await
        .unwrap_err();
    assert_eq!(err.failures()[0].kind, FailureKind::Decode);
}

#[tokio::test]
async fn test_block_height_and_content_type_headers_sent() {
    let a = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(QUERY_PATH))
        .and(query_param("pool_id", "1066"))
        .and(header("content-type", "application/json"))
        .and(header("x-cosmos-block-height", "17000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(liquidity_body()))
        .expect(1)
        .mount(&a)
        .await;

    let ok = fetcher(&[&a], 2000)
        .fetch_liquidity("1066", Some("17000000"))
        .await
        .unwrap();
    assert_eq!(ok.records.len(), 3);
}

#[tokio::test]
async fn test_no_block_height_header_when_absent_or_empty() {
    let a = MockServer::start().await;
    respond(&a, ResponseTemplate::new(200).set_body_json(liquidity_body()), 2).await;

    let f = fetcher(&[&a], 2000);
    f.fetch_liquidity("1066", None).await.unwrap();
    f.fetch_liquidity("1066", Some("")).await.unwrap();

    let requests = a.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    for req in requests {
        assert!(req.headers.get("x-cosmos-block-height").is_none());
    }
}

#[tokio::test]
async fn test_connection_refused_is_transport_failure() {
    let b = MockServer::start().await;
    respond(&b, ResponseTemplate::new(200).set_body_json(liquidity_body()), 1).await;

    let config = FetchConfig::resolve(
        &["http://127.0.0.1:1".to_string(), b.uri()],
        None,
        Some(2000),
    )
    .unwrap();
    let ok = EndpointFetcher::new(config)
        .unwrap()
        .fetch_liquidity("1066", None)
        .await
        .unwrap();
    assert_eq!(ok.endpoint, b.uri());
    assert_eq!(ok.failures[0].kind, FailureKind::Transport);
    assert_eq!(ok.failures[0].endpoint, "http://127.0.0.1:1");
}

#[tokio::test]
async fn test_blank_pool_id_sends_nothing() {
    let a = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(liquidity_body()))
        .expect(0)
        .mount(&a)
        .await;

    let err = fetcher(&[&a], 2000).fetch_liquidity("  ", None).await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidPoolId));
}

#[tokio::test]
async fn test_empty_endpoint_list() {
    let config = FetchConfig {
        endpoints: Vec::new(),
        ..FetchConfig::default()
    };
    let err = EndpointFetcher::new(config)
        .unwrap()
        .fetch_liquidity("1066", None)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::NoEndpoints));
}

#[tokio::test]
async fn test_fetch_through_trait_then_analyze() {
    let a = MockServer::start().await;
    respond(&a, ResponseTemplate::new(200).set_body_json(liquidity_body()), 1).await;

    let source: Box<dyn LiquiditySource> = Box::new(fetcher(&[&a], 2000));
    let ok = source.fetch("1066", None).await.unwrap();
    let analysis = pipeline::analyze(&ok.records);

    assert_eq!(analysis.rows[0].tick_range, 40.0);
    assert_eq!(analysis.stats.count, 3);
    assert_eq!(analysis.stats.median, 100.0);
    assert_eq!(analysis.invalid_rows, 0);
    // the 250.5 row is both the largest and the widest
    let kept: Vec<f64> = analysis.filtered.iter().map(|r| r.liquidity_amount).collect();
    assert_eq!(kept, vec![100.0, 7.0]);
}
