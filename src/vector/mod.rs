// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod atlas_client;
pub mod backend;
pub mod types;

pub use atlas_client::{build_pipeline, AtlasVectorSearch};
pub use backend::VectorSearchBackend;
pub use types::{ListingRecord, VectorSearchRequest};
