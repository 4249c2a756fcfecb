// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! MongoDB Atlas `$vectorSearch` client
//!
//! Runs the search as an aggregation through the MongoDB driver. The pipeline
//! is a `$vectorSearch` stage followed by a `$project` that keeps the listing
//! fields and the `vectorSearchScore` metadata.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{Error as DriverError, ErrorKind};
use mongodb::options::{AggregateOptions, ClientOptions};
use mongodb::{Client, Collection};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::backend::VectorSearchBackend;
use super::types::{ListingRecord, VectorSearchRequest};
use crate::config::AtlasSettings;
use crate::rag::RagError;

const SERVICE: &str = "atlas";

/// Single driver handle for the listings collection
pub struct AtlasVectorSearch {
    collection: Collection<Document>,
    settings: AtlasSettings,
    timeout: Duration,
}

impl AtlasVectorSearch {
    /// Parses the connection string and builds the shared driver client
    ///
    /// The driver connects lazily, so an unreachable cluster is reported by
    /// the first search. `timeout` applies to server selection, connection
    /// setup and the aggregation itself unless the URI sets its own.
    ///
    /// # Errors
    /// `Configuration` for a malformed connection string,
    /// `ServiceUnavailable` when an SRV record cannot be resolved.
    pub async fn connect(settings: AtlasSettings, timeout: Duration) -> Result<Self, RagError> {
        let mut options = ClientOptions::parse(&settings.uri)
            .await
            .map_err(|e| map_driver_error(e, &settings))?;

        if options.app_name.is_none() {
            options.app_name = Some(settings.app_name.clone());
        }
        if options.server_selection_timeout.is_none() {
            options.server_selection_timeout = Some(timeout);
        }
        if options.connect_timeout.is_none() {
            options.connect_timeout = Some(timeout);
        }

        let client = Client::with_options(options).map_err(|e| map_driver_error(e, &settings))?;
        let collection = client
            .database(&settings.database)
            .collection::<Document>(&settings.collection);

        info!(
            "Atlas client ready: {} {}.{}",
            settings.redacted_uri(),
            settings.database,
            settings.collection
        );

        Ok(Self {
            collection,
            settings,
            timeout,
        })
    }
}

/// Aggregation pipeline for one search
pub fn build_pipeline(request: &VectorSearchRequest) -> Vec<Document> {
    vec![
        doc! {
            "$vectorSearch": {
                "index": request.index_name.as_str(),
                "path": request.vector_field.as_str(),
                "queryVector": request.query_vector.clone(),
                "numCandidates": request.num_candidates as i64,
                "limit": request.limit as i64,
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "name": 1,
                "neighbourhood": 1,
                "room_type": 1,
                "price": 1,
                "score": { "$meta": "vectorSearchScore" },
            }
        },
    ]
}

/// Converts one projected document into a record
///
/// The document goes through relaxed extended JSON, so doubles and integers
/// become plain numbers and `Decimal128` prices keep their
/// `{"$numberDecimal": ...}` wrapper.
pub(crate) fn decode_listing(document: Document) -> Result<ListingRecord, RagError> {
    let value = Bson::Document(document).into_relaxed_extjson();
    serde_json::from_value(value).map_err(|e| {
        RagError::unavailable(SERVICE, format!("Malformed listing document: {}", e))
    })
}

/// Sorts driver failures into configuration problems and outages
pub(crate) fn map_driver_error(error: DriverError, settings: &AtlasSettings) -> RagError {
    match error.kind.as_ref() {
        ErrorKind::Authentication { message, .. } => {
            RagError::Configuration(format!("Atlas rejected the credentials: {}", message))
        }
        ErrorKind::InvalidArgument { message, .. } => {
            RagError::Configuration(format!("Invalid MongoDB connection settings: {}", message))
        }
        ErrorKind::Command(command) => RagError::Configuration(format!(
            "Atlas rejected the search on {}.{} with index '{}': {} ({})",
            settings.database,
            settings.collection,
            settings.index_name,
            command.message,
            command.code_name
        )),
        _ => RagError::unavailable(SERVICE, error.to_string()),
    }
}

#[async_trait]
impl VectorSearchBackend for AtlasVectorSearch {
    async fn vector_search(
        &self,
        request: &VectorSearchRequest,
    ) -> Result<Vec<ListingRecord>, RagError> {
        let start = Instant::now();
        debug!(
            "Atlas $vectorSearch: index={} limit={} candidates={}",
            request.index_name, request.limit, request.num_candidates
        );

        let options = AggregateOptions::builder().max_time(self.timeout).build();
        let mut cursor = self
            .collection
            .aggregate(build_pipeline(request), options)
            .await
            .map_err(|e| {
                warn!("Atlas aggregate failed: {}", e);
                map_driver_error(e, &self.settings)
            })?;

        let mut records = Vec::with_capacity(request.limit);
        while let Some(document) = cursor
            .try_next()
            .await
            .map_err(|e| map_driver_error(e, &self.settings))?
        {
            records.push(decode_listing(document)?);
        }

        debug!(
            "Atlas returned {} documents in {}ms",
            records.len(),
            start.elapsed().as_millis()
        );

        Ok(records)
    }

    fn name(&self) -> &'static str {
        SERVICE
    }
}
