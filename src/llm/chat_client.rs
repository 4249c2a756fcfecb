// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Chat completion client for OpenAI-compatible APIs

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::ChatModel;
use crate::config::LlmSettings;
use crate::rag::{ChatMessage, RagError};

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
}

#[derive(serde::Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for `/v1/chat/completions`
pub struct OpenAiChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model_name: String,
    temperature: f32,
}

impl OpenAiChatClient {
    pub fn new(settings: &LlmSettings, timeout: Duration) -> Result<Self, RagError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RagError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = settings.base_url.trim_end_matches('/').to_string();
        info!(
            "Chat client configured: endpoint={}, model={}",
            endpoint, settings.model_name
        );

        Ok(Self {
            client,
            endpoint,
            api_key: settings.api_key.clone(),
            model_name: settings.model_name.clone(),
            temperature: settings.temperature,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.endpoint)
    }
}

#[async_trait]
impl ChatModel for OpenAiChatClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, RagError> {
        let start = Instant::now();
        let request = ChatRequest {
            model: &self.model_name,
            messages,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Chat request failed: {}", e);
                RagError::Generation(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RagError::Generation(format!(
                "{} returned HTTP {}: {}",
                self.model_name, status, message
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| RagError::Generation(format!("JSON parse error: {}", e)))?;

        let tokens_used = chat_response.usage.map(|u| u.total_tokens).unwrap_or(0);
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RagError::Generation("Response contained no message".to_string()))?;

        debug!(
            "Chat completion: {} tokens in {}ms",
            tokens_used,
            start.elapsed().as_millis()
        );

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
