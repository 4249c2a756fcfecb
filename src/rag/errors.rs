// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error types for the retrieval-augmented chat pipeline
//!
//! One enum covers every failure a chat turn can hit:
//! - Query validation (empty query, zero limit)
//! - Configuration (missing settings, rejected credentials, unknown index)
//! - Vector store availability (transport, server errors, bad responses)
//! - Embedding model loading and inference
//! - Language model generation

use thiserror::Error;

/// Errors that can occur while answering a chat turn
#[derive(Error, Debug)]
pub enum RagError {
    /// Query or request parameters rejected before any remote call
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Settings missing or rejected by a remote service
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Vector store could not be reached or returned an unusable answer
    #[error("{service} unavailable: {reason}")]
    ServiceUnavailable { service: String, reason: String },

    /// Embedding model failed to load or encode the query
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// Language model call failed
    #[error("Generation failed: {0}")]
    Generation(String),
}

impl RagError {
    /// Shorthand for a vector store outage
    pub fn unavailable(service: impl Into<String>, reason: impl Into<String>) -> Self {
        RagError::ServiceUnavailable {
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// Get user-friendly error message for the chat shell
    pub fn user_message(&self) -> String {
        match self {
            RagError::InvalidQuery(reason) => {
                format!("Please enter a question ({})", reason)
            }
            RagError::Configuration(reason) => {
                format!("The chat is not configured correctly: {}", reason)
            }
            RagError::ServiceUnavailable { service, .. } => {
                format!(
                    "Could not search the listings right now ({} is unavailable). Please try again later.",
                    service
                )
            }
            RagError::Embedding(_) => {
                "Could not process your question with the embedding model.".to_string()
            }
            RagError::Generation(_) => {
                "The language model did not answer. Please try again later.".to_string()
            }
        }
    }

    /// Get error code for logging
    pub fn error_code(&self) -> &'static str {
        match self {
            RagError::InvalidQuery(_) => "INVALID_QUERY",
            RagError::Configuration(_) => "CONFIGURATION_ERROR",
            RagError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
            RagError::Embedding(_) => "EMBEDDING_FAILURE",
            RagError::Generation(_) => "GENERATION_FAILURE",
        }
    }

    /// Check if repeating the same turn later could succeed
    ///
    /// Nothing in the pipeline retries on its own; the chat shell shows
    /// retryable failures as warnings and the rest as errors.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RagError::ServiceUnavailable { .. } | RagError::Generation(_)
        )
    }
}
