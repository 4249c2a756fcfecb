// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Retriever: query text to ranked listings plus a textual context block

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use super::errors::RagError;
use crate::config::{AtlasSettings, DEFAULT_RESULT_LIMIT};
use crate::embeddings::TextEmbedder;
use crate::vector::{ListingRecord, VectorSearchBackend, VectorSearchRequest};

/// Output of one retrieval
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieval {
    /// One line per record, in record order; empty when nothing matched
    pub context: String,
    /// At most `limit` records, highest score first
    pub records: Vec<ListingRecord>,
}

impl Retrieval {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Index addressed by the retriever
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTarget {
    pub index_name: String,
    pub vector_field: String,
    pub num_candidates: usize,
}

impl From<&AtlasSettings> for SearchTarget {
    fn from(settings: &AtlasSettings) -> Self {
        Self {
            index_name: settings.index_name.clone(),
            vector_field: settings.vector_field.clone(),
            num_candidates: settings.num_candidates,
        }
    }
}

pub struct Retriever {
    embedder: Arc<dyn TextEmbedder>,
    backend: Arc<dyn VectorSearchBackend>,
    target: SearchTarget,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        backend: Arc<dyn VectorSearchBackend>,
        target: SearchTarget,
    ) -> Self {
        Self {
            embedder,
            backend,
            target,
        }
    }

    /// Retrieves with the default limit
    pub async fn retrieve_default(&self, query: &str) -> Result<Retrieval, RagError> {
        self.retrieve(query, DEFAULT_RESULT_LIMIT).await
    }

    /// Embeds `query`, searches the index and formats the hits
    ///
    /// # Errors
    /// - `InvalidQuery` for a blank query or `limit == 0`
    /// - `Embedding` when the embedder fails or returns the wrong width
    /// - `ServiceUnavailable` / `Configuration` from the search backend
    ///
    /// Zero hits is an empty `Retrieval`, not an error.
    pub async fn retrieve(&self, query: &str, limit: usize) -> Result<Retrieval, RagError> {
        if query.trim().is_empty() {
            return Err(RagError::InvalidQuery("query is empty".to_string()));
        }
        if limit == 0 {
            return Err(RagError::InvalidQuery(
                "result limit must be greater than 0".to_string(),
            ));
        }

        let start = Instant::now();
        let query_vector = self.embedder.embed(query).await?;
        if query_vector.len() != self.embedder.dimension() {
            return Err(RagError::Embedding(format!(
                "{} returned {} dimensions (expected {})",
                self.embedder.model_name(),
                query_vector.len(),
                self.embedder.dimension()
            )));
        }

        let request = VectorSearchRequest::new(
            self.target.index_name.as_str(),
            self.target.vector_field.as_str(),
            query_vector,
            self.target.num_candidates,
            limit,
        );
        let mut records = self.backend.vector_search(&request).await?;

        // Stable, so engine order survives among equal scores
        records.sort_by(|a, b| b.score.total_cmp(&a.score));
        if records.len() > limit {
            debug!(
                "{} returned {} records for limit {}, truncating",
                self.backend.name(),
                records.len(),
                limit
            );
            records.truncate(limit);
        }

        info!(
            "Retrieved {} listings (limit {}) in {}ms",
            records.len(),
            limit,
            start.elapsed().as_millis()
        );

        Ok(Retrieval {
            context: format_context(&records),
            records,
        })
    }
}

/// Serializes records into the context block handed to the responder
///
/// Each record becomes one `\n`-terminated line; no records gives `""`.
pub fn format_context(records: &[ListingRecord]) -> String {
    let mut context = String::new();
    for record in records {
        context.push_str(&record.context_line());
        context.push('\n');
    }
    context
}
