mod common;

use common::spawn_app;
use serde_json::Value;

#[tokio::test]
async fn router_health_works() {
    let app = spawn_app();

    let response = app
        .client
        .get(app.url("/health/router"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "Router is healthy");
}

#[tokio::test]
async fn database_health_works() {
    let app = spawn_app();

    let response = app
        .client
        .get(app.url("/health/database"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "Database is healthy");
}

#[tokio::test]
async fn health_checks_need_no_token() {
    let app = spawn_app();

    for path in ["/health/router", "/health/database"] {
        let response = app.client.get(app.url(path)).send().await.unwrap();
        assert_ne!(401, response.status().as_u16(), "{} asked for a token", path);
    }
}
