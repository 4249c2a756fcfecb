// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod llm;
pub mod rag;
pub mod vector;

pub use config::RagConfig;
pub use embeddings::{OnnxEmbeddingModel, TextEmbedder};
pub use llm::{ChatModel, OpenAiChatClient};
pub use rag::{
    ConversationHistory, RagChat, RagError, Responder, Retrieval, Retriever, SearchTarget,
    TurnOutcome,
};
pub use vector::{AtlasVectorSearch, ListingRecord, VectorSearchBackend, VectorSearchRequest};
