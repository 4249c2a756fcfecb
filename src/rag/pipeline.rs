// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! One chat turn: retrieve, then answer

use tracing::{info, info_span, warn, Instrument};

use super::errors::RagError;
use super::history::ConversationHistory;
use super::retriever::{Retrieval, Retriever};
use super::responder::Responder;
use crate::config::CHAT_RESULT_LIMIT;

/// What a completed turn produced
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub answer: String,
    pub retrieval: Retrieval,
}

/// Retriever and responder composed for interactive use
pub struct RagChat {
    retriever: Retriever,
    responder: Responder,
    limit: usize,
}

impl RagChat {
    pub fn new(retriever: Retriever, responder: Responder) -> Self {
        Self {
            retriever,
            responder,
            limit: CHAT_RESULT_LIMIT,
        }
    }

    /// Overrides the per-turn result limit
    ///
    /// A limit of 0 is kept as given and every turn fails with `InvalidQuery`.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Answers `question` and records the exchange in `history`
    ///
    /// The user message is appended before any remote call. The assistant
    /// message is appended only when an answer was produced, so a failed
    /// turn leaves a trailing user entry.
    pub async fn respond(
        &self,
        history: &mut ConversationHistory,
        question: &str,
    ) -> Result<TurnOutcome, RagError> {
        if question.trim().is_empty() {
            return Err(RagError::InvalidQuery("question is empty".to_string()));
        }
        if self.limit == 0 {
            return Err(RagError::InvalidQuery(
                "result limit must be greater than 0".to_string(),
            ));
        }

        let span = info_span!("turn", session = %history.session_id(), turn = history.len() / 2 + 1);
        history.push_user(question);

        let result = async {
            let retrieval = self.retriever.retrieve(question, self.limit).await?;
            let answer = self.responder.answer(&retrieval.context, question).await?;
            Ok::<_, RagError>(TurnOutcome { answer, retrieval })
        }
        .instrument(span)
        .await;

        match result {
            Ok(outcome) => {
                history.push_assistant(outcome.answer.clone());
                info!(
                    "Turn complete: {} listings in context, history length {}",
                    outcome.retrieval.records.len(),
                    history.len()
                );
                Ok(outcome)
            }
            Err(e) => {
                warn!("Turn failed [{}]: {}", e.error_code(), e);
                Err(e)
            }
        }
    }
}
