mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use link_gateway::routes::api_router;
use serde_json::json;

const CLIENT_IP: &str = "203.0.113.7";

#[tokio::test]
async fn test_webhook_burst_is_not_throttled() {
    let (state, provider) = common::create_test_state();
    let server = TestServer::new(api_router(state, true)).unwrap();

    for i in 0..15 {
        let response = server
            .post("/webhook")
            .authorization_bearer(common::WEBHOOK_SECRET)
            .add_header("x-forwarded-for", CLIENT_IP)
            .json(&json!({
                "event": "publish",
                "document": {
                    "_id": format!("doc-{}", i),
                    "_type": "post",
                    "slug": format!("burst-post-{}", i),
                    "title": "Burst",
                    "publishedAt": "2025-10-03T08:00:00Z"
                }
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<serde_json::Value>()["success"], true);
    }

    // The client's own quota still caps upstream calls.
    assert_eq!(provider.calls(), 10);
}

#[tokio::test]
async fn test_admin_routes_are_throttled_per_ip() {
    let (state, _provider) = common::create_test_state();
    let server = TestServer::new(api_router(state, true)).unwrap();

    let mut statuses = Vec::new();
    for _ in 0..12 {
        let response = server
            .delete("/admin/cache")
            .authorization_bearer(common::ADMIN_TOKEN)
            .add_header("x-forwarded-for", CLIENT_IP)
            .await;
        statuses.push(response.status_code());
    }

    assert_eq!(statuses[0], StatusCode::OK);
    assert_eq!(statuses[11], StatusCode::TOO_MANY_REQUESTS);
}
