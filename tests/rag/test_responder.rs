// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Responder tests: prompt assembly and model failures

use super::mocks::*;
use listing_rag_chat::rag::{format_context, Role};
use listing_rag_chat::{RagError, Responder};
use std::sync::Arc;

#[tokio::test]
async fn test_answer_sends_single_user_prompt_with_context_and_question() {
    let model = Arc::new(ContextEchoModel::new());
    let responder = Responder::new(model.clone());
    let context = format_context(&[listing("Cozy Loft Mitte", "Mitte", "$85.00", 0.91)]);

    let answer = responder
        .answer(&context, "Where can I stay in Mitte?")
        .await
        .unwrap();
    assert_eq!(answer, "Matching listings: Cozy Loft Mitte");

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].len(), 1);
    assert_eq!(prompts[0][0].role, Role::User);

    let prompt = &prompts[0][0].content;
    assert!(prompt.contains("Airbnb expert in Berlin"));
    assert!(prompt.contains("CONTEXT:\nListing Name: Cozy Loft Mitte"));
    assert!(prompt.contains("QUESTION: Where can I stay in Mitte?"));
}

#[tokio::test]
async fn test_empty_context_still_calls_model() {
    let model = Arc::new(ContextEchoModel::new());
    let responder = Responder::new(model.clone());

    let answer = responder
        .answer("", "Is there a castle for rent?")
        .await
        .unwrap();

    assert_eq!(answer, NOT_FOUND_REPLY);
    assert!(model.last_prompt().contains("CONTEXT:\n\n\nQUESTION:"));
}

#[tokio::test]
async fn test_model_failure_is_generation_error() {
    let responder = Responder::new(Arc::new(FailingChatModel));

    let err = responder.answer("", "hello").await.unwrap_err();
    assert!(matches!(err, RagError::Generation(_)));
    assert_eq!(err.error_code(), "GENERATION_FAILURE");
}

#[test]
fn test_responder_reports_model_name() {
    let responder = Responder::new(Arc::new(FailingChatModel));
    assert_eq!(responder.model_name(), "failing-model");
}
