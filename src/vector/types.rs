// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request and result types shared by vector search backends

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameters of one approximate-nearest-neighbour search
#[derive(Debug, Clone, PartialEq)]
pub struct VectorSearchRequest {
    /// Vector index to query
    pub index_name: String,
    /// Document field the index covers
    pub vector_field: String,
    /// Embedded query
    pub query_vector: Vec<f32>,
    /// Candidate pool considered before the final cut (never below `limit`)
    pub num_candidates: usize,
    /// Maximum number of documents returned
    pub limit: usize,
}

impl VectorSearchRequest {
    pub fn new(
        index_name: impl Into<String>,
        vector_field: impl Into<String>,
        query_vector: Vec<f32>,
        num_candidates: usize,
        limit: usize,
    ) -> Self {
        Self {
            index_name: index_name.into(),
            vector_field: vector_field.into(),
            query_vector,
            num_candidates: num_candidates.max(limit),
            limit,
        }
    }
}

/// One retrieved listing
///
/// Read-only projection of the stored document. `score` is the engine's
/// relevance (higher is closer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub neighbourhood: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
    /// Stored as text (`"$85.00"`), number or extended-JSON number
    #[serde(default)]
    pub price: Option<Value>,
    pub score: f64,
}

impl ListingRecord {
    /// Context line for this record
    ///
    /// `Listing Name: <name>, Neighbourhood: <loc>, Price: <price>, Score: <score>`
    /// with the score rounded to four decimals and missing fields shown as `None`.
    pub fn context_line(&self) -> String {
        format!(
            "Listing Name: {}, Neighbourhood: {}, Price: {}, Score: {:.4}",
            self.name.as_deref().unwrap_or(MISSING),
            self.neighbourhood.as_deref().unwrap_or(MISSING),
            self.price
                .as_ref()
                .map(display_value)
                .unwrap_or_else(|| MISSING.to_string()),
            self.score
        )
    }
}

const MISSING: &str = "None";

/// Render a document value the way it reads in the listing data
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => MISSING.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => {
            // Canonical extended JSON wraps numbers: {"$numberDecimal": "85.00"}
            for key in ["$numberDecimal", "$numberDouble", "$numberInt", "$numberLong"] {
                if let Some(Value::String(inner)) = map.get(key) {
                    return inner.clone();
                }
            }
            value.to_string()
        }
        Value::Array(_) => value.to_string(),
    }
}
