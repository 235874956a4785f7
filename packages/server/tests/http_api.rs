//! HTTP API integration tests.
//!
//! Tests for REST API endpoints (health check, hub stats).

mod fixtures;
use fixtures::TestServer;

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_stats_endpoint_reports_connected_clients() {
    // テスト項目: /api/stats エンドポイントが接続中のクライアント数を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let url = format!("{}/api/stats", server.base_url());

    let body: serde_json::Value = client.get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["connected_clients"], 0);

    // when (操作): 2 クライアントが接続
    let _alice = server.connect().await;
    let _bob = server.connect().await;

    // then (期待する結果):
    let response = client.get(&url).send().await.expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["connected_clients"], 2);
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    let server = TestServer::start().await;

    let response = reqwest::get(format!("{}/api/rooms", server.base_url()))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}
