//! HTTP-level tests for generation, parsing and export.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, post_json, put_json};
use serde_json::json;

#[tokio::test]
async fn generate_in_test_mode_returns_rendered_conversation() {
    let app = common::build_test_app().await;
    let a = body_json(post_json(&app, "/api/v1/characters", json!({"name": "Al"})).await).await;
    let b = body_json(post_json(&app, "/api/v1/characters", json!({"name": "Bo"})).await).await;

    let response = post_json(
        &app,
        "/api/v1/conversations/generate",
        json!({
            "firstCharacterId": a["data"]["id"],
            "secondCharacterId": b["data"]["id"],
            "topic": "job interview",
            "messageCount": 4
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = &body_json(response).await["data"];
    assert_eq!(data["messages"].as_array().unwrap().len(), 4);
    assert_eq!(data["messages"][0]["character"], "Al");
    assert_eq!(data["messages"][0]["timestamp"], "9:15 AM");
    assert_eq!(data["view"]["title"], "Al & Bo");
    assert_eq!(data["view"]["messages"][1]["speaker"], "second");
    assert_eq!(data["view"]["messages"][0]["timestampLabel"], "Today at 9:15 AM");
    assert!(data["transcript"].as_str().unwrap().starts_with("Al | 9:15 AM | "));
}

#[tokio::test]
async fn generate_without_topic_is_validation_error() {
    let app = common::build_test_app().await;
    let response = post_json(&app, "/api/v1/conversations/generate", json!({"topic": " "})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn generate_with_empty_custom_endpoint_is_configuration_error() {
    let app = common::build_test_app().await;
    put_json(
        &app,
        "/api/v1/settings",
        json!({"apiKey": "sk", "endpoint": "custom", "customEndpoint": "", "model": "m"}),
    )
    .await;

    let response = post_json(&app, "/api/v1/conversations/generate", json!({"topic": "lunch"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "CONFIGURATION_ERROR");
}

#[tokio::test]
async fn generate_against_unreachable_endpoint_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = common::build_test_app().await;
    let response = post_json(
        &app,
        "/api/v1/conversations/generate",
        json!({
            "topic": "lunch",
            "settings": {
                "apiKey": "sk",
                "endpoint": "custom",
                "customEndpoint": format!("http://{addr}/v1/chat/completions"),
                "model": "m"
            }
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "NETWORK_ERROR");
}

#[tokio::test]
async fn parse_attributes_lines_to_participants() {
    let app = common::build_test_app().await;
    let response = post_json(
        &app,
        "/api/v1/conversations/parse",
        json!({
            "transcript": "Sam | 9:15 AM | hello there\nKim: hey",
            "first": {"name": "Sam"},
            "second": {"name": "Kim", "avatar": "javascript:alert(1)"},
            "topic": "greetings"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = &body_json(response).await["data"];
    assert_eq!(
        data["messages"][0],
        json!({"character": "Sam", "timestamp": "9:15 AM", "content": "hello there"})
    );
    assert_eq!(data["view"]["messages"][1]["speaker"], "second");
    assert_eq!(data["view"]["messages"][1]["avatarUrl"], "/api/placeholder/40/40");
}

#[tokio::test]
async fn export_returns_escaped_html_attachment() {
    let app = common::build_test_app().await;
    let parsed = body_json(
        post_json(
            &app,
            "/api/v1/conversations/parse",
            json!({
                "transcript": "Sam | 9:15 AM | <b>hi</b>",
                "first": {"name": "Sam"},
                "second": {"name": "Kim"},
                "topic": "greetings"
            }),
        )
        .await,
    )
    .await;

    let response = post_json(&app, "/api/v1/conversations/export", parsed["data"]["view"].clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"Sam_Kim_greetings_chat.html\""
    );

    let html = body_text(response).await;
    assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
    assert!(html.contains("Sam &amp; Kim"));
}
