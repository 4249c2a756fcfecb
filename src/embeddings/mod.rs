// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Query embedding
//!
//! The retriever depends on [`TextEmbedder`]; the ONNX sentence transformer
//! is the production implementation.

pub mod model_files;
pub mod onnx_model;

use async_trait::async_trait;

use crate::rag::RagError;

pub use model_files::{load_embedder, EmbeddingModelFiles};
pub use onnx_model::OnnxEmbeddingModel;

/// Text to fixed-length vector, deterministic for a fixed model
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;

    /// Length of every vector this embedder returns
    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}
