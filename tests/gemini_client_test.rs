use serde_json::json;

use nile_itinerary::{
    CompletionSchema, GeminiClient, GenerationBackend, GenerationRequest, ItineraryDocument,
    PlannerError,
};

fn request() -> GenerationRequest {
    GenerationRequest {
        instruction: "plan a trip".to_string(),
        schema: ItineraryDocument::schema(),
        expected_days: 3,
    }
}

fn client_for(server: &mockito::ServerGuard) -> GeminiClient {
    let mut client = GeminiClient::new("test-key".to_string());
    client.set_base_url(server.url());
    client
}

const MODEL_PATH: &str = "/v1beta/models/test-model:generateContent";

fn backend(server: &mockito::ServerGuard) -> std::sync::Arc<dyn GenerationBackend> {
    let registry = client_for(server).registry(&["test-model"]);
    let backend = registry.iter().next().unwrap().clone();
    backend
}

#[tokio::test]
async fn success_extracts_candidate_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", MODEL_PATH)
        .match_header("x-goog-api-key", "test-key")
        .with_status(200)
        .with_body(
            json!({
                "candidates": [
                    {"content": {"parts": [{"text": "{\"ok\": true}"}]}}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let text = backend(&server).generate(&request()).await.unwrap();
    assert_eq!(text, "{\"ok\": true}");
    mock.assert_async().await;
}

#[tokio::test]
async fn http_429_classifies_as_rate_limited_with_retry_after() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", MODEL_PATH)
        .with_status(429)
        .with_header("retry-after", "7")
        .with_body("slow down")
        .create_async()
        .await;

    let err = backend(&server).generate(&request()).await.unwrap_err();
    assert!(matches!(err, PlannerError::RateLimited { retry_after: 7 }));
}

#[tokio::test]
async fn http_404_classifies_as_unavailable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", MODEL_PATH)
        .with_status(404)
        .with_body("no such model")
        .create_async()
        .await;

    let err = backend(&server).generate(&request()).await.unwrap_err();
    assert!(matches!(err, PlannerError::Unavailable(_)));
    assert!(err.to_string().contains("test-model"));
}

#[tokio::test]
async fn api_error_body_classifies_as_backend_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", MODEL_PATH)
        .with_status(400)
        .with_body(json!({"error": {"message": "API key not valid"}}).to_string())
        .create_async()
        .await;

    let err = backend(&server).generate(&request()).await.unwrap_err();
    match err {
        PlannerError::Backend(message) => assert!(message.contains("API key not valid")),
        other => panic!("expected Backend, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_candidates_is_a_backend_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", MODEL_PATH)
        .with_status(200)
        .with_body(json!({"candidates": []}).to_string())
        .create_async()
        .await;

    let err = backend(&server).generate(&request()).await.unwrap_err();
    assert!(matches!(err, PlannerError::Backend(_)));
}
