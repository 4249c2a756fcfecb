// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Responder: retrieved context plus question to a grounded answer

use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::errors::RagError;
use super::history::ChatMessage;
use crate::llm::ChatModel;

/// Instruction block placed before the context
pub const RAG_INSTRUCTIONS: &str = "You are a helpful Airbnb expert in Berlin.\n\
Answer the user's question based on the following context.\n\
If the context does not contain the answer, politely say that you could not find the requested information in the listings.";

/// Renders the prompt sent to the language model
///
/// `context` and `question` are inserted verbatim.
pub fn render_prompt(context: &str, question: &str) -> String {
    format!(
        "\n{}\n\nCONTEXT:\n{}\n\nQUESTION: {}\n",
        RAG_INSTRUCTIONS, context, question
    )
}

pub struct Responder {
    model: Arc<dyn ChatModel>,
}

impl Responder {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Asks the model to answer `question` from `context`
    ///
    /// An empty context is sent as-is; the prompt tells the model to say the
    /// listings did not contain the answer. Failures are not retried.
    pub async fn answer(&self, context: &str, question: &str) -> Result<String, RagError> {
        let start = Instant::now();
        let messages = [ChatMessage::user(render_prompt(context, question))];

        let answer = self.model.complete(&messages).await?;

        info!(
            "{} answered in {}ms",
            self.model.model_name(),
            start.elapsed().as_millis()
        );
        Ok(answer)
    }
}
