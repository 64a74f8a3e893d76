//! Router-level tests for `POST /embed` and `GET /health`.

mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use helpers::{
    app_with, body_json, embed_request, json_post, FailingEmbeddingClient, FakeEmbeddingClient,
    FAKE_DIMENSION,
};

async fn embedding_for(text: &str) -> Vec<f64> {
    let app = app_with(Arc::new(FakeEmbeddingClient::default()));
    let response = app.oneshot(embed_request(text)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "text {:?}", text);

    let body = body_json(response).await;
    body["embedding"]
        .as_array()
        .expect("embedding should be an array")
        .iter()
        .map(|v| v.as_f64().expect("embedding values should be numbers"))
        .collect()
}

#[tokio::test]
async fn test_embed_returns_vector() {
    let embedding = embedding_for("Bonjour le monde").await;
    assert_eq!(embedding.len(), FAKE_DIMENSION);
    assert!(embedding.iter().any(|v| *v != 0.0));
}

#[tokio::test]
async fn test_embedding_length_is_constant() {
    for text in ["hello", "A much longer sentence about the weather", "  padded text  "] {
        assert_eq!(embedding_for(text).await.len(), FAKE_DIMENSION);
    }
}

#[tokio::test]
async fn test_identical_text_yields_identical_embedding() {
    let first = embedding_for("Guten Morgen zusammen").await;
    let second = embedding_for("Guten Morgen zusammen").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_short_texts_rejected_with_fixed_detail() {
    for text in ["", "hi", "   ab ", "ciao", "    ", "\u{1c}\u{1d}abcd"] {
        let client = Arc::new(FakeEmbeddingClient::default());
        let app = app_with(client.clone());

        let response = app.oneshot(embed_request(text)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "text {:?}", text);

        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({"detail": "Text too short to embed"}));
        assert!(client.seen().is_empty(), "model must not run for {:?}", text);
    }
}

#[tokio::test]
async fn test_five_character_boundary() {
    let app = app_with(Arc::new(FakeEmbeddingClient::default()));
    let response = app.clone().oneshot(embed_request("hello")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(embed_request("ciao")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_model_receives_untrimmed_text() {
    let client = Arc::new(FakeEmbeddingClient::default());
    let app = app_with(client.clone());

    let response = app.oneshot(embed_request("  hello world \n")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(client.seen(), vec!["  hello world \n".to_string()]);
}

#[tokio::test]
async fn test_missing_text_field_is_schema_error() {
    let app = app_with(Arc::new(FakeEmbeddingClient::default()));
    let response = app.oneshot(json_post("/embed", "{}")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("text"), "detail: {}", detail);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app_with(Arc::new(FakeEmbeddingClient::default()));
    let response = app.oneshot(json_post("/embed", "{\"text\": ")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert!(body["detail"].is_string());
    assert_ne!(body["detail"], "Text too short to embed");
}

#[tokio::test]
async fn test_missing_content_type_is_rejected() {
    let app = app_with(Arc::new(FakeEmbeddingClient::default()));
    let request = Request::builder()
        .method("POST")
        .uri("/embed")
        .body(Body::from(r#"{"text": "hello world"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(body_json(response).await["detail"].is_string());
}

#[tokio::test]
async fn test_encoding_failure_is_generic_server_error() {
    let app = app_with(Arc::new(FailingEmbeddingClient));
    let response = app.oneshot(embed_request("hello world")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({"detail": "Internal Server Error"}));
}

#[tokio::test]
async fn test_health_reports_model() {
    let app = app_with(Arc::new(FakeEmbeddingClient::default()));
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"], "fake-minilm");
    assert_eq!(body["provider"], "fake");
    assert_eq!(body["dimension"], FAKE_DIMENSION);
}

#[tokio::test]
async fn test_embed_rejects_get() {
    let app = app_with(Arc::new(FakeEmbeddingClient::default()));
    let request = Request::builder()
        .uri("/embed")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
