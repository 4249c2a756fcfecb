// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vector search backend trait definition

use async_trait::async_trait;

use super::types::{ListingRecord, VectorSearchRequest};
use crate::rag::RagError;

/// Approximate-nearest-neighbour search over the listings store
///
/// Implementations return at most `request.limit` records in the engine's
/// relevance order. No hits is `Ok(vec![])`, never an error.
#[async_trait]
pub trait VectorSearchBackend: Send + Sync {
    /// Run one search
    async fn vector_search(
        &self,
        request: &VectorSearchRequest,
    ) -> Result<Vec<ListingRecord>, RagError>;

    /// Backend name for logging and error messages
    fn name(&self) -> &'static str;
}
