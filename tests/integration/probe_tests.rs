use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use restock_watcher::models::StockStatus;
use restock_watcher::probe::StockProbe;
use restock_watcher::utils::error::AppError;

use super::{in_stock_body, out_of_stock_body, test_probe_config};

#[tokio::test]
async fn test_probe_sends_expected_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pdp_client_v1"))
        .and(query_param("key", "test-key"))
        .and(query_param("tcin", "78099811"))
        .and(query_param("is_bot", "false"))
        .and(query_param("store_id", "1407"))
        .and(query_param("pricing_store_id", "1407"))
        .and(query_param("visitor_id", "TESTVISITOR"))
        .and(query_param("channel", "WEB"))
        .and(query_param("page", "/p/A-78099811"))
        .and(header("user-agent", "RestockWatcher-Test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(in_stock_body()))
        .expect(1)
        .mount(&server)
        .await;

    let probe = StockProbe::new(test_probe_config(format!("{}/pdp_client_v1", server.uri())))
        .expect("probe");

    let status = probe.probe("78099811").await.unwrap();
    assert_eq!(status, StockStatus::InStock);
}

#[tokio::test]
async fn test_probe_out_of_stock() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(out_of_stock_body()))
        .mount(&server)
        .await;

    let probe = StockProbe::new(test_probe_config(server.uri())).expect("probe");
    assert_eq!(probe.probe("78099811").await.unwrap(), StockStatus::OutOfStock);
}

#[tokio::test]
async fn test_probe_indeterminate_on_missing_product() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {}})))
        .mount(&server)
        .await;

    let probe = StockProbe::new(test_probe_config(server.uri())).expect("probe");
    assert_eq!(
        probe.probe("78099811").await.unwrap(),
        StockStatus::Indeterminate
    );
}

#[tokio::test]
async fn test_probe_http_failure_is_not_out_of_stock() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let probe = StockProbe::new(test_probe_config(server.uri())).expect("probe");
    let result = probe.probe("78099811").await;

    match result {
        Err(AppError::ProbeFailed { status }) => assert_eq!(status, 404),
        other => panic!("expected ProbeFailed, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_probe_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let probe = StockProbe::new(test_probe_config(server.uri())).expect("probe");
    assert!(matches!(
        probe.probe("78099811").await,
        Err(AppError::ProbeFailed { status: 500 })
    ));
}

#[tokio::test]
async fn test_probe_invalid_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let probe = StockProbe::new(test_probe_config(server.uri())).expect("probe");
    // Decode failure surfaces as an error, never as a stock answer
    assert!(probe.probe("78099811").await.is_err());
}
