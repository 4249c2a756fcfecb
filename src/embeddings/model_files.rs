// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding model file resolution and one-time loading
//!
//! The model is either read from a local directory holding `model.onnx` and
//! `tokenizer.json`, or fetched once from the Hugging Face hub into the
//! standard hub cache. The composition root calls [`load_embedder`] a single
//! time and shares the result.

use hf_hub::api::tokio::ApiBuilder;
use std::path::{Path, PathBuf};
use tracing::info;

use super::OnnxEmbeddingModel;
use crate::config::EmbeddingSettings;
use crate::rag::RagError;

/// ONNX export path inside the sentence-transformers repository
pub const HUB_MODEL_FILE: &str = "onnx/model.onnx";

/// Tokenizer path inside the repository
pub const HUB_TOKENIZER_FILE: &str = "tokenizer.json";

const LOCAL_MODEL_FILE: &str = "model.onnx";
const LOCAL_TOKENIZER_FILE: &str = "tokenizer.json";

/// Location of the model and tokenizer on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingModelFiles {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

impl EmbeddingModelFiles {
    /// Uses files from a local directory
    ///
    /// # Errors
    /// `Configuration` if either file is missing.
    pub fn in_dir(dir: &Path) -> Result<Self, RagError> {
        let files = Self {
            model_path: dir.join(LOCAL_MODEL_FILE),
            tokenizer_path: dir.join(LOCAL_TOKENIZER_FILE),
        };

        for path in [&files.model_path, &files.tokenizer_path] {
            if !path.is_file() {
                return Err(RagError::Configuration(format!(
                    "Embedding model file not found: {}",
                    path.display()
                )));
            }
        }

        Ok(files)
    }

    /// Fetches the files from the Hugging Face hub (cached after first use)
    pub async fn download(repo_id: &str) -> Result<Self, RagError> {
        info!("Fetching embedding model files from {}", repo_id);

        let api = ApiBuilder::new()
            .with_progress(true)
            .build()
            .map_err(|e| RagError::Embedding(format!("Failed to initialise hub client: {}", e)))?;
        let repo = api.model(repo_id.to_string());

        let model_path = repo.get(HUB_MODEL_FILE).await.map_err(|e| {
            RagError::Embedding(format!("Failed to fetch {}/{}: {}", repo_id, HUB_MODEL_FILE, e))
        })?;
        let tokenizer_path = repo.get(HUB_TOKENIZER_FILE).await.map_err(|e| {
            RagError::Embedding(format!(
                "Failed to fetch {}/{}: {}",
                repo_id, HUB_TOKENIZER_FILE, e
            ))
        })?;

        Ok(Self {
            model_path,
            tokenizer_path,
        })
    }

    /// Local directory when configured, hub download otherwise
    pub async fn resolve(settings: &EmbeddingSettings) -> Result<Self, RagError> {
        match &settings.model_dir {
            Some(dir) => Self::in_dir(dir),
            None => Self::download(&settings.repo_id).await,
        }
    }
}

/// Resolves the model files and loads the embedder
pub async fn load_embedder(settings: &EmbeddingSettings) -> Result<OnnxEmbeddingModel, RagError> {
    let files = EmbeddingModelFiles::resolve(settings).await?;

    OnnxEmbeddingModel::new(
        settings.model_name.clone(),
        &files.model_path,
        &files.tokenizer_path,
        settings.dimension,
    )
    .await
    .map_err(|e| RagError::Embedding(format!("{:#}", e)))
}
