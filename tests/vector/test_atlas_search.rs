// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Atlas `$vectorSearch` against a live cluster
//!
//! Ignored by default. Set `MONGODB_URI` to a cluster holding the
//! `airbnb_data.listings` collection with its `vector_index`, then run with
//! `--ignored`.

use listing_rag_chat::config::EMBEDDING_DIMENSION;
use listing_rag_chat::{
    AtlasVectorSearch, RagConfig, RagError, VectorSearchBackend, VectorSearchRequest,
};

async fn connect(config: &RagConfig) -> AtlasVectorSearch {
    config.validate_search().expect("MONGODB_URI must be set");
    AtlasVectorSearch::connect(config.atlas.clone(), config.request_timeout())
        .await
        .expect("Failed to build Atlas client")
}

fn unit_vector() -> Vec<f32> {
    let value = 1.0 / (EMBEDDING_DIMENSION as f32).sqrt();
    vec![value; EMBEDDING_DIMENSION]
}

#[tokio::test]
#[ignore]
async fn test_search_returns_ranked_projection() {
    let config = RagConfig::from_env().unwrap();
    let client = connect(&config).await;
    let request = VectorSearchRequest::new(
        config.atlas.index_name.as_str(),
        config.atlas.vector_field.as_str(),
        unit_vector(),
        config.atlas.num_candidates,
        5,
    );

    let records = client.vector_search(&request).await.unwrap();

    assert!(records.len() <= 5);
    assert!(records.windows(2).all(|pair| pair[0].score >= pair[1].score));
    for record in &records {
        assert!(record.name.is_some());
        assert!(record.context_line().starts_with("Listing Name: "));
    }
}

#[tokio::test]
#[ignore]
async fn test_wrong_credentials_are_configuration_error() {
    let mut config = RagConfig::from_env().unwrap();
    let uri = config.atlas.uri.clone();
    let (Some(scheme_end), Some(at)) = (uri.find("://"), uri.rfind('@')) else {
        return;
    };
    config.atlas.uri = format!("{}nobody:wrong{}", &uri[..scheme_end + 3], &uri[at..]);

    let client = connect(&config).await;
    let request = VectorSearchRequest::new(
        config.atlas.index_name.as_str(),
        config.atlas.vector_field.as_str(),
        unit_vector(),
        config.atlas.num_candidates,
        3,
    );

    let err = client.vector_search(&request).await.unwrap_err();
    assert!(matches!(err, RagError::Configuration(_)), "got {:?}", err);
}
