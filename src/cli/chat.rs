// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Interactive chat shell

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::parse_limit;
use crate::config::CHAT_RESULT_LIMIT;
use crate::rag::{ConversationHistory, RagChat, RagError, Role, TurnOutcome};

const INPUT_HINT: &str = "Find the best apartment in Berlin...";
const SPINNER_MESSAGE: &str = "Searching listings in Atlas...";

/// Arguments for the chat command
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Listings retrieved per turn
    #[arg(long, default_value_t = CHAT_RESULT_LIMIT, value_parser = parse_limit)]
    pub limit: usize,

    /// Print the retrieved context after each answer
    #[arg(long)]
    pub show_context: bool,
}

/// Arguments for the ask command
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Question text
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    /// Listings retrieved for the answer
    #[arg(long, default_value_t = CHAT_RESULT_LIMIT, value_parser = parse_limit)]
    pub limit: usize,

    /// Print the retrieved context after the answer
    #[arg(long)]
    pub show_context: bool,
}

/// Reads questions from stdin until `exit`, `quit` or end of input
pub async fn run_chat(chat: &RagChat, args: &ChatArgs) -> Result<()> {
    let mut history = ConversationHistory::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("🏠 Airbnb Berlin RAG Chatbot");
    println!("   {} (type 'exit' to leave, '/history' to review)\n", INPUT_HINT);

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            "exit" | "quit" => break,
            "/history" => {
                print_history(&history);
                continue;
            }
            _ => {}
        }

        let spinner = spinner();
        let result = chat.respond(&mut history, input).await;
        spinner.finish_and_clear();

        match result {
            Ok(outcome) => print_outcome(&outcome, args.show_context),
            Err(e) => eprintln!("{}\n", error_line(&e)),
        }
    }

    Ok(())
}

/// Answers one question
pub async fn run_ask(chat: &RagChat, args: &AskArgs) -> Result<()> {
    let mut history = ConversationHistory::new();
    let question = args.question.join(" ");

    let spinner = spinner();
    let result = chat.respond(&mut history, &question).await;
    spinner.finish_and_clear();

    let outcome = result.map_err(|e| anyhow::anyhow!(e.user_message()))?;
    print_outcome(&outcome, args.show_context);
    Ok(())
}

/// Shell line for a failed turn; transient failures are shown as warnings
fn error_line(error: &RagError) -> String {
    if error.is_retryable() {
        format!("⚠️  {}", error.user_message())
    } else {
        format!("❌ {}", error.user_message())
    }
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(SPINNER_MESSAGE);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_outcome(outcome: &TurnOutcome, show_context: bool) {
    println!("\n{}\n", outcome.answer);
    if show_context {
        print_context(&outcome.retrieval.context);
    }
}

/// Debug panel with the raw retrieved context
pub fn print_context(context: &str) {
    println!("--- Retrieved context (debug) ---");
    if context.is_empty() {
        println!("(no listings retrieved)");
    } else {
        print!("{}", context);
    }
    println!("---------------------------------\n");
}

fn print_history(history: &ConversationHistory) {
    if history.is_empty() {
        println!("(no messages yet)\n");
        return;
    }
    for message in history.messages() {
        let speaker = match message.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        println!("[{}] {}", speaker, message.content);
    }
    println!();
}
