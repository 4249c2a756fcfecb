// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// End-to-end chat turns over mocked services

use super::mocks::*;
use listing_rag_chat::config::{ATLAS_INDEX_NAME, NUM_CANDIDATES, VECTOR_FIELD_NAME};
use listing_rag_chat::rag::Role;
use listing_rag_chat::{
    ChatModel, ConversationHistory, ListingRecord, RagChat, RagError, Responder, Retriever,
    SearchTarget, TextEmbedder, VectorSearchBackend,
};
use std::sync::Arc;

fn chat_with(
    embedder: Arc<dyn TextEmbedder>,
    backend: Arc<dyn VectorSearchBackend>,
    model: Arc<dyn ChatModel>,
) -> RagChat {
    let target = SearchTarget {
        index_name: ATLAS_INDEX_NAME.to_string(),
        vector_field: VECTOR_FIELD_NAME.to_string(),
        num_candidates: NUM_CANDIDATES,
    };
    RagChat::new(
        Retriever::new(embedder, backend, target),
        Responder::new(model),
    )
}

fn central_listings() -> Vec<ListingRecord> {
    vec![
        listing("Budget Room Wedding", "Wedding", "$32.00", 0.88),
        listing("Cozy Loft Mitte", "Mitte", "$85.00", 0.91),
        listing("Studio by Alexanderplatz", "Mitte", "$60.00", 0.86),
        listing("Quiet Flat Pankow", "Pankow", "$55.00", 0.79),
        listing("Kreuzberg Shared Room", "Kreuzberg", "$25.00", 0.77),
        listing("Villa Grunewald", "Grunewald", "$420.00", 0.41),
    ]
}

#[tokio::test]
async fn test_cheap_apartment_turn_uses_five_listings() {
    let backend = Arc::new(StaticBackend::ignoring_limit(central_listings()));
    let model = Arc::new(ContextEchoModel::new());
    let chat = chat_with(Arc::new(FixedEmbedder::new(384)), backend.clone(), model.clone());
    let mut history = ConversationHistory::new();

    assert_eq!(chat.limit(), 5);
    let outcome = chat
        .respond(&mut history, "cheap apartment near center")
        .await
        .unwrap();

    assert_eq!(outcome.retrieval.records.len(), 5);
    assert_eq!(
        outcome.retrieval.records[0].name.as_deref(),
        Some("Cozy Loft Mitte")
    );
    // The answer mentions only listings that were in the context
    assert!(outcome.answer.contains("Cozy Loft Mitte"));
    assert!(!outcome.answer.contains("Villa Grunewald"));

    assert_eq!(backend.requests.lock().unwrap()[0].limit, 5);
    assert!(model.last_prompt().contains(&outcome.retrieval.context));
}

#[tokio::test]
async fn test_no_match_turn_answers_not_found() {
    let chat = chat_with(
        Arc::new(FixedEmbedder::new(384)),
        Arc::new(StaticBackend::new(Vec::new())),
        Arc::new(ContextEchoModel::new()),
    );
    let mut history = ConversationHistory::new();

    let outcome = chat
        .respond(&mut history, "a treehouse in Antarctica")
        .await
        .unwrap();

    assert!(outcome.retrieval.is_empty());
    assert_eq!(outcome.answer, NOT_FOUND_REPLY);
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn test_history_grows_by_two_per_successful_turn() {
    let chat = chat_with(
        Arc::new(FixedEmbedder::new(384)),
        Arc::new(StaticBackend::new(central_listings())),
        Arc::new(ContextEchoModel::new()),
    );
    let mut history = ConversationHistory::new();

    chat.respond(&mut history, "first question").await.unwrap();
    chat.respond(&mut history, "second question").await.unwrap();

    let roles: Vec<Role> = history.messages().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
    assert_eq!(history.messages()[0].content, "first question");
    assert_eq!(history.messages()[2].content, "second question");
}

#[tokio::test]
async fn test_failed_generation_keeps_only_user_message() {
    let chat = chat_with(
        Arc::new(FixedEmbedder::new(384)),
        Arc::new(StaticBackend::new(central_listings())),
        Arc::new(FailingChatModel),
    );
    let mut history = ConversationHistory::new();

    let err = chat
        .respond(&mut history, "cheap apartment near center")
        .await
        .unwrap_err();

    assert!(matches!(err, RagError::Generation(_)));
    assert_eq!(history.len(), 1);
    assert_eq!(history.last().unwrap().role, Role::User);
}

#[tokio::test]
async fn test_search_outage_skips_generation() {
    let model = Arc::new(ContextEchoModel::new());
    let chat = chat_with(
        Arc::new(FixedEmbedder::new(384)),
        Arc::new(FailingBackend {
            make_error: || RagError::unavailable("MongoDB Atlas", "timed out"),
        }),
        model.clone(),
    );
    let mut history = ConversationHistory::new();

    let err = chat.respond(&mut history, "loft").await.unwrap_err();

    assert!(matches!(err, RagError::ServiceUnavailable { .. }));
    assert!(model.prompts.lock().unwrap().is_empty());
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_blank_question_leaves_history_untouched() {
    let chat = chat_with(
        Arc::new(FixedEmbedder::new(384)),
        Arc::new(StaticBackend::new(central_listings())),
        Arc::new(ContextEchoModel::new()),
    );
    let mut history = ConversationHistory::new();

    let err = chat.respond(&mut history, "  ").await.unwrap_err();
    assert!(matches!(err, RagError::InvalidQuery(_)));
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_with_limit_overrides_chat_limit() {
    let backend = Arc::new(StaticBackend::new(central_listings()));
    let chat = chat_with(
        Arc::new(FixedEmbedder::new(384)),
        backend.clone(),
        Arc::new(ContextEchoModel::new()),
    )
    .with_limit(2);
    let mut history = ConversationHistory::new();

    let outcome = chat.respond(&mut history, "loft").await.unwrap();
    assert_eq!(outcome.retrieval.records.len(), 2);
    assert_eq!(backend.requests.lock().unwrap()[0].limit, 2);
}

#[tokio::test]
async fn test_zero_limit_rejected_before_history_changes() {
    let backend = Arc::new(StaticBackend::new(central_listings()));
    let chat = chat_with(
        Arc::new(FixedEmbedder::new(384)),
        backend.clone(),
        Arc::new(ContextEchoModel::new()),
    )
    .with_limit(0);
    let mut history = ConversationHistory::new();

    let err = chat.respond(&mut history, "loft").await.unwrap_err();
    assert!(matches!(err, RagError::InvalidQuery(_)));
    assert!(history.is_empty());
    assert_eq!(backend.request_count(), 0);
}
