// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hosted language model access

pub mod chat_client;

use async_trait::async_trait;

use crate::rag::{ChatMessage, RagError};

pub use chat_client::OpenAiChatClient;

/// Single-turn chat completion
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the model's reply to `messages`
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, RagError>;

    fn model_name(&self) -> &str;
}
