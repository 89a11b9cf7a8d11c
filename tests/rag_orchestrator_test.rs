mod common;

use ragline::application::services::{
    EmbeddingClient, GenerationClient, RagOrchestrator, RetrievalClient, TOP_K,
};
use ragline::domain::{AnswerResult, FallbackReason};

use common::{
    CALL_TIMEOUT, FakeEmbedder, FakeLlm, FakeVectorStore, SHORT_TIMEOUT, SLOW_CALL, orchestrator,
};

#[tokio::test]
async fn given_relevant_passages_when_answering_then_returns_trimmed_generation() {
    let llm = FakeLlm::replying("  Rust is a systems language.\n");
    let rag = orchestrator(
        FakeEmbedder::working(),
        FakeVectorStore::with_passages(&["Rust is a systems programming language."]),
        llm.clone(),
    );

    let result = rag.answer("What is Rust?").await;

    assert_eq!(
        result,
        AnswerResult::Answered("Rust is a systems language.".to_string())
    );
    let prompt = llm.last_prompt().unwrap();
    assert!(prompt.contains("- Rust is a systems programming language.\n"));
    assert!(prompt.contains("Question: What is Rust?"));
}

#[tokio::test]
async fn given_no_passages_when_answering_then_falls_back_without_calling_llm() {
    let llm = FakeLlm::replying("unused");
    let rag = orchestrator(FakeEmbedder::working(), FakeVectorStore::empty(), llm.clone());

    let result = rag.answer("Unknown topic?").await;

    assert_eq!(result, AnswerResult::Fallback(FallbackReason::NoRelevantContext));
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn given_generation_unavailable_when_answering_then_returns_generation_unavailable() {
    let rag = RagOrchestrator::new(
        EmbeddingClient::new(FakeEmbedder::working(), CALL_TIMEOUT),
        RetrievalClient::new(FakeVectorStore::with_passages(&["context"]), CALL_TIMEOUT),
        GenerationClient::unavailable(),
    );

    let result = rag.answer("Anything?").await;

    assert_eq!(
        result,
        AnswerResult::Fallback(FallbackReason::GenerationUnavailable)
    );
    assert_eq!(
        result.text(),
        "Sorry, the AI model is currently unavailable. Please try again later."
    );
}

#[tokio::test]
async fn given_index_unavailable_when_answering_then_no_provider_is_called() {
    let embedder = FakeEmbedder::working();
    let llm = FakeLlm::replying("unused");
    let rag = RagOrchestrator::new(
        EmbeddingClient::new(embedder.clone(), CALL_TIMEOUT),
        RetrievalClient::unavailable(),
        GenerationClient::new(llm.clone(), CALL_TIMEOUT),
    );

    let result = rag.answer("Anything?").await;

    assert_eq!(result, AnswerResult::Fallback(FallbackReason::ServiceUnavailable));
    assert_eq!(embedder.calls(), 0);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn given_embedding_unavailable_when_answering_then_skips_search_and_generation() {
    let store = FakeVectorStore::with_passages(&["context"]);
    let llm = FakeLlm::replying("unused");
    let rag = RagOrchestrator::new(
        EmbeddingClient::unavailable(),
        RetrievalClient::new(store.clone(), CALL_TIMEOUT),
        GenerationClient::new(llm.clone(), CALL_TIMEOUT),
    );

    let result = rag.answer("Anything?").await;

    assert_eq!(
        result,
        AnswerResult::Fallback(FallbackReason::EmbeddingUnavailable)
    );
    assert_eq!(store.searches(), 0);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn given_embedding_error_when_answering_then_returns_embedding_failed() {
    let rag = orchestrator(
        FakeEmbedder::failing(),
        FakeVectorStore::with_passages(&["context"]),
        FakeLlm::replying("unused"),
    );

    let result = rag.answer("Anything?").await;

    assert_eq!(result, AnswerResult::Fallback(FallbackReason::EmbeddingFailed));
}

#[tokio::test]
async fn given_search_error_when_answering_then_treated_as_no_context() {
    let llm = FakeLlm::replying("unused");
    let rag = orchestrator(FakeEmbedder::working(), FakeVectorStore::failing(), llm.clone());

    let result = rag.answer("Anything?").await;

    assert_eq!(result, AnswerResult::Fallback(FallbackReason::NoRelevantContext));
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn given_llm_error_when_answering_then_returns_generation_failed() {
    let rag = orchestrator(
        FakeEmbedder::working(),
        FakeVectorStore::with_passages(&["context"]),
        FakeLlm::failing(),
    );

    let result = rag.answer("Anything?").await;

    assert_eq!(result, AnswerResult::Fallback(FallbackReason::GenerationFailed));
}

#[tokio::test]
async fn given_blank_llm_output_when_answering_then_returns_generation_failed() {
    let rag = orchestrator(
        FakeEmbedder::working(),
        FakeVectorStore::with_passages(&["context"]),
        FakeLlm::replying("   \n"),
    );

    let result = rag.answer("Anything?").await;

    assert_eq!(result, AnswerResult::Fallback(FallbackReason::GenerationFailed));
}

#[tokio::test]
async fn given_slow_embedder_when_answering_then_times_out_as_embedding_failed() {
    let rag = RagOrchestrator::new(
        EmbeddingClient::new(FakeEmbedder::slow(SLOW_CALL), SHORT_TIMEOUT),
        RetrievalClient::new(FakeVectorStore::with_passages(&["context"]), CALL_TIMEOUT),
        GenerationClient::new(FakeLlm::replying("unused"), CALL_TIMEOUT),
    );

    let result = rag.answer("Anything?").await;

    assert_eq!(result, AnswerResult::Fallback(FallbackReason::EmbeddingFailed));
}

#[tokio::test]
async fn given_slow_search_when_answering_then_times_out_as_no_context() {
    let llm = FakeLlm::replying("unused");
    let rag = RagOrchestrator::new(
        EmbeddingClient::new(FakeEmbedder::working(), CALL_TIMEOUT),
        RetrievalClient::new(FakeVectorStore::slow(&["context"], SLOW_CALL), SHORT_TIMEOUT),
        GenerationClient::new(llm.clone(), CALL_TIMEOUT),
    );

    let result = rag.answer("Anything?").await;

    assert_eq!(result, AnswerResult::Fallback(FallbackReason::NoRelevantContext));
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn given_slow_llm_when_answering_then_times_out_as_generation_failed() {
    let rag = RagOrchestrator::new(
        EmbeddingClient::new(FakeEmbedder::working(), CALL_TIMEOUT),
        RetrievalClient::new(FakeVectorStore::with_passages(&["context"]), CALL_TIMEOUT),
        GenerationClient::new(FakeLlm::slow(SLOW_CALL), SHORT_TIMEOUT),
    );

    let result = rag.answer("Anything?").await;

    assert_eq!(result, AnswerResult::Fallback(FallbackReason::GenerationFailed));
}

#[tokio::test]
async fn given_many_passages_when_answering_then_prompt_holds_at_most_top_k() {
    let texts: Vec<String> = (0..TOP_K + 3).map(|i| format!("passage number {}", i)).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let llm = FakeLlm::replying("ok");
    let rag = orchestrator(
        FakeEmbedder::working(),
        FakeVectorStore::with_passages(&refs),
        llm.clone(),
    );

    rag.answer("Count them").await;

    let prompt = llm.last_prompt().unwrap();
    assert_eq!(prompt.matches("- passage number").count(), TOP_K);
}

#[tokio::test]
async fn given_missing_collection_when_probing_then_retrieval_is_not_ready() {
    let client = RetrievalClient::probe(FakeVectorStore::missing_collection(), CALL_TIMEOUT).await;

    assert!(!client.is_ready());
}

#[tokio::test]
async fn given_unreachable_index_when_probing_then_retrieval_is_not_ready() {
    let client = RetrievalClient::probe(FakeVectorStore::failing(), CALL_TIMEOUT).await;

    assert!(!client.is_ready());
}

#[tokio::test]
async fn given_existing_collection_when_probing_then_retrieval_is_ready() {
    let client = RetrievalClient::probe(FakeVectorStore::empty(), CALL_TIMEOUT).await;

    assert!(client.is_ready());
}

#[tokio::test]
async fn given_mixed_clients_when_reading_readiness_then_reports_each_flag() {
    let rag = RagOrchestrator::new(
        EmbeddingClient::new(FakeEmbedder::working(), CALL_TIMEOUT),
        RetrievalClient::unavailable(),
        GenerationClient::new(FakeLlm::replying("ok"), CALL_TIMEOUT),
    );

    let readiness = rag.readiness();

    assert!(readiness.embedding);
    assert!(!readiness.retrieval);
    assert!(readiness.generation);
}
