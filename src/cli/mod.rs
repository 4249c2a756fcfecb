// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod chat;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use crate::config::{RagConfig, DEFAULT_RESULT_LIMIT};
use crate::embeddings::{load_embedder, EmbeddingModelFiles};
use crate::llm::OpenAiChatClient;
use crate::rag::{RagChat, Responder, Retriever, SearchTarget};
use crate::vector::AtlasVectorSearch;

/// Airbnb Berlin listing chat
#[derive(Parser, Debug)]
#[command(name = "listing-rag-chat")]
#[command(version)]
#[command(about = "Ask questions about Berlin Airbnb listings stored in MongoDB Atlas", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat session
    Chat(chat::ChatArgs),

    /// Answer a single question and exit
    Ask(chat::AskArgs),

    /// Show the listings retrieved for a query (no language model call)
    Retrieve(RetrieveArgs),

    /// Download or locate the embedding model files
    FetchModel,
}

/// Arguments for the retrieve command
#[derive(Args, Debug)]
pub struct RetrieveArgs {
    /// Query text
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Maximum number of listings
    #[arg(long, default_value_t = DEFAULT_RESULT_LIMIT, value_parser = parse_limit)]
    pub limit: usize,
}

/// Result limits must be positive integers
pub(crate) fn parse_limit(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("limit must be at least 1".to_string()),
        Ok(limit) => Ok(limit),
        Err(e) => Err(format!("'{}' is not a valid limit: {}", value, e)),
    }
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();
    let config = RagConfig::from_env()?;

    match cli.command {
        Commands::Chat(args) => {
            let chat = build_chat(&config).await?.with_limit(args.limit);
            chat::run_chat(&chat, &args).await
        }
        Commands::Ask(args) => {
            let chat = build_chat(&config).await?.with_limit(args.limit);
            chat::run_ask(&chat, &args).await
        }
        Commands::Retrieve(args) => run_retrieve(&config, args).await,
        Commands::FetchModel => {
            let files = EmbeddingModelFiles::resolve(&config.embedding).await?;
            println!("Model:     {}", files.model_path.display());
            println!("Tokenizer: {}", files.tokenizer_path.display());
            Ok(())
        }
    }
}

/// Builds the retriever: search client and embedding model, each created once
pub async fn build_retriever(config: &RagConfig) -> Result<Retriever> {
    config.validate_search()?;

    let backend = AtlasVectorSearch::connect(config.atlas.clone(), config.request_timeout()).await?;
    let embedder = load_embedder(&config.embedding).await?;
    info!(
        "Retriever ready: {}.{} index={}",
        config.atlas.database, config.atlas.collection, config.atlas.index_name
    );

    Ok(Retriever::new(
        Arc::new(embedder),
        Arc::new(backend),
        SearchTarget::from(&config.atlas),
    ))
}

/// Composition root for chat commands
pub async fn build_chat(config: &RagConfig) -> Result<RagChat> {
    config.validate()?;

    let retriever = build_retriever(config).await?;
    let model = OpenAiChatClient::new(&config.llm, config.request_timeout())?;

    Ok(RagChat::new(retriever, Responder::new(Arc::new(model))))
}

async fn run_retrieve(config: &RagConfig, args: RetrieveArgs) -> Result<()> {
    let retriever = build_retriever(config).await?;
    let query = args.query.join(" ");

    let retrieval = retriever.retrieve(&query, args.limit).await?;

    println!("{}", serde_json::to_string_pretty(&retrieval.records)?);
    println!();
    chat::print_context(&retrieval.context);
    Ok(())
}
