// HTTP surface tests
// Author: kelexine (https://github.com/kelexine)

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use gemrelay::config::{GeminiConfig, ServerConfig};
use gemrelay::credentials::StaticCredentials;
use gemrelay::gemini::GeminiClient;
use gemrelay::handler::AnalysisHandler;
use gemrelay::server::{create_router, NETLIFY_FUNCTION_PATH};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn router(base_url: &str, credentials: StaticCredentials) -> axum::Router {
    router_with(base_url, credentials, ServerConfig::default())
}

fn router_with(base_url: &str, credentials: StaticCredentials, server: ServerConfig) -> axum::Router {
    let gemini = GeminiConfig {
        api_base_url: base_url.to_string(),
        model: "gemini-test".to_string(),
        ..GeminiConfig::default()
    };
    let handler = AnalysisHandler::new(GeminiClient::new(&gemini).unwrap(), Arc::new(credentials));
    create_router(&server, handler)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_analysis_route_relays_text() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1beta/models/gemini-test:generateContent")
        .match_query(mockito::Matcher::UrlEncoded("key".into(), "k".into()))
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"4"}]}}]}"#)
        .create_async()
        .await;
    let app = router(&format!("{}/v1beta", server.url()), StaticCredentials::new("k"));

    let response = app
        .oneshot(post(
            "/api/analysis",
            r#"{"systemPrompt":"Be terse","userPrompt":"2+2?"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_json(response).await, serde_json::json!({ "text": "4" }));
}

#[tokio::test]
async fn test_netlify_path_validates_input() {
    let app = router("http://127.0.0.1:9/v1beta", StaticCredentials::new("k"));

    let response = app
        .oneshot(post(NETLIFY_FUNCTION_PATH, r#"{"systemPrompt":"only one"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request data"));
}

#[tokio::test]
async fn test_missing_key_is_server_error() {
    let app = router("http://127.0.0.1:9/v1beta", StaticCredentials::absent());

    let response = app
        .oneshot(post("/api/analysis", r#"{"systemPrompt":"s","userPrompt":"u"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health_reports_degraded_without_key() {
    let app = router("http://127.0.0.1:9/v1beta", StaticCredentials::absent());

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["credential_configured"], false);
    assert_eq!(body["model"], "gemini-test");
}

#[tokio::test]
async fn test_health_never_reveals_key() {
    let app = router("http://127.0.0.1:9/v1beta", StaticCredentials::new("VERY-SECRET"));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("healthy"));
    assert!(!text.contains("VERY-SECRET"));
}

#[tokio::test]
async fn test_get_on_analysis_route_is_rejected() {
    let app = router("http://127.0.0.1:9/v1beta", StaticCredentials::new("k"));

    let response = app
        .oneshot(Request::get("/api/analysis").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_invocations() {
    let app = router("http://127.0.0.1:9/v1beta", StaticCredentials::absent());

    let _ = app
        .clone()
        .oneshot(post("/api/analysis", "{}"))
        .await
        .unwrap();
    let response = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("invocations_total"));
}

#[tokio::test]
async fn test_oversized_body_gets_json_error() {
    let app = router_with(
        "http://127.0.0.1:9/v1beta",
        StaticCredentials::new("k"),
        ServerConfig {
            body_limit_bytes: 16,
            ..ServerConfig::default()
        },
    );

    let response = app
        .oneshot(post(
            "/api/analysis",
            r#"{"systemPrompt":"a long system prompt","userPrompt":"and a user prompt"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid request data: body exceeds 16 bytes");
}

#[tokio::test]
async fn test_non_utf8_body_gets_json_error() {
    let app = router("http://127.0.0.1:9/v1beta", StaticCredentials::new("k"));

    let response = app
        .oneshot(
            Request::post("/api/analysis")
                .body(Body::from(vec![0xff, 0xfe, b'{']))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request data: body is not valid UTF-8"));
}
