mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use ragline::application::ports::ConversationRepository;
use ragline::application::services::{
    ChatService, EmbeddingClient, GenerationClient, RagOrchestrator, RetrievalClient,
};
use ragline::domain::FallbackReason;
use ragline::infrastructure::observability::REQUEST_ID_HEADER;
use ragline::infrastructure::persistence::{
    InMemoryConversationRepository, JsonFileConversationRepository,
};
use ragline::presentation::{AppState, create_router};

use common::{CALL_TIMEOUT, FakeEmbedder, FakeLlm, FakeVectorStore, orchestrator};

fn app_with(rag: RagOrchestrator, repository: Arc<dyn ConversationRepository>) -> axum::Router {
    let state = AppState {
        chat_service: Arc::new(ChatService::new(Arc::new(rag), Arc::clone(&repository))),
        conversation_repository: repository,
    };
    create_router(state, &[])
}

fn create_test_app() -> axum::Router {
    app_with(
        orchestrator(
            FakeEmbedder::working(),
            FakeVectorStore::with_passages(&["Ragline answers from its knowledge base."]),
            FakeLlm::replying("It answers from documents."),
        ),
        Arc::new(InMemoryConversationRepository::new()),
    )
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_conversation(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(post_json("/conversations/new", ""))
        .await
        .unwrap();
    json_body(response).await["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn given_running_server_when_health_check_then_reports_readiness() {
    let app = app_with(
        RagOrchestrator::new(
            EmbeddingClient::new(FakeEmbedder::working(), CALL_TIMEOUT),
            RetrievalClient::unavailable(),
            GenerationClient::unavailable(),
        ),
        Arc::new(InMemoryConversationRepository::new()),
    );

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["embedding_ready"], true);
    assert_eq!(body["retrieval_ready"], false);
    assert_eq!(body["generation_ready"], false);
}

#[tokio::test]
async fn given_question_when_posting_to_chatbot_then_returns_reply() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json("/chatbot", r#"{"message": "How does it answer?"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["reply"], "It answers from documents.");
}

#[tokio::test]
async fn given_blank_message_when_posting_to_chatbot_then_bad_request() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json("/chatbot", r#"{"message": "   "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn given_unavailable_index_when_posting_to_chatbot_then_reply_is_fallback_text() {
    let app = app_with(
        RagOrchestrator::new(
            EmbeddingClient::new(FakeEmbedder::working(), CALL_TIMEOUT),
            RetrievalClient::unavailable(),
            GenerationClient::new(FakeLlm::replying("unused"), CALL_TIMEOUT),
        ),
        Arc::new(InMemoryConversationRepository::new()),
    );

    let response = app
        .oneshot(post_json("/chatbot", r#"{"message": "Hello?"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["reply"],
        FallbackReason::ServiceUnavailable.user_message()
    );
}

#[tokio::test]
async fn given_new_conversation_when_created_then_it_is_empty_and_listed() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(post_json("/conversations/new", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let created = json_body(response).await;
    assert_eq!(created["title"], "New Chat");
    assert_eq!(created["messages"], serde_json::json!([]));

    let listed = json_body(app.oneshot(get("/conversations")).await.unwrap()).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
    assert_eq!(listed[0]["first_message"], "New Chat");
}

#[tokio::test]
async fn given_conversation_when_sending_message_then_reply_and_history_are_returned() {
    let app = create_test_app();
    let id = create_conversation(&app).await;

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/conversations/{}/messages", id),
            r#"{"message": "What does Ragline do?"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let reply = json_body(response).await;
    assert_eq!(reply["sender"], "bot");
    assert_eq!(reply["text"], "It answers from documents.");

    let conversation = json_body(
        app.oneshot(get(&format!("/conversations/{}", id)))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(conversation["title"], "What does Ragline do?");
    assert_eq!(conversation["messages"][0]["sender"], "user");
    assert_eq!(conversation["messages"][1]["sender"], "bot");
}

#[tokio::test]
async fn given_unknown_conversation_when_sending_message_then_not_found() {
    let app = create_test_app();

    let response = app
        .oneshot(post_json(
            "/conversations/6f1d1b2e-8c9a-4f3e-9a57-0c3b2a1d4e5f/messages",
            r#"{"message": "Hello"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_malformed_id_when_getting_conversation_then_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get("/conversations/not-a-uuid")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn given_conversation_when_deleting_then_confirms_and_it_is_gone() {
    let app = create_test_app();
    let id = create_conversation(&app).await;

    let response = app
        .clone()
        .oneshot(delete(&format!("/conversations/{}", id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await["message"],
        format!("Conversation {} deleted successfully.", id)
    );

    let again = app
        .oneshot(delete(&format!("/conversations/{}", id)))
        .await
        .unwrap();
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn given_broken_history_file_when_sending_message_then_internal_error_hides_details() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chat_history.json");
    let repository = Arc::new(JsonFileConversationRepository::open(&path).await.unwrap());
    let app = app_with(
        orchestrator(
            FakeEmbedder::working(),
            FakeVectorStore::with_passages(&["context"]),
            FakeLlm::replying("answer"),
        ),
        repository,
    );
    let id = create_conversation(&app).await;

    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("blocker"), "x").unwrap();

    let response = app
        .oneshot(post_json(
            &format!("/conversations/{}/messages", id),
            r#"{"message": "Hello"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Failed to save chat history");
}

#[tokio::test]
async fn given_request_id_header_when_calling_then_it_is_echoed() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(REQUEST_ID_HEADER, "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");
}

#[tokio::test]
async fn given_no_request_id_when_calling_then_one_is_generated() {
    let app = create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();

    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}
