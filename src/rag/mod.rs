// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// RAG (Retrieval-Augmented Generation) module
// Retriever and responder over the hosted listings index

pub mod errors;
pub mod history;
pub mod pipeline;
pub mod responder;
pub mod retriever;

pub use errors::RagError;
pub use history::{ChatMessage, ConversationHistory, Role};
pub use pipeline::{RagChat, TurnOutcome};
pub use responder::{render_prompt, Responder, RAG_INSTRUCTIONS};
pub use retriever::{format_context, Retrieval, Retriever, SearchTarget};
