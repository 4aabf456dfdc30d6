use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;

use crate::corpus::Corpus;
use crate::models::{ConversationPage, ConversationView, Role, SearchPage};
use crate::search::{GetConversationParams, ListParams, SearchParams};
use crate::stats::UNKNOWN_MONTH;
use crate::tools;
use crate::utils::{format_path_with_tilde, resolve_export_path};

const MONTHS_SHOWN: usize = 12;
const MODELS_SHOWN: usize = 10;
const BAR_WIDTH: usize = 50;

#[derive(Parser)]
#[command(name = "chatgpt-history-search")]
#[command(version = "0.1.0")]
#[command(about = "Search an exported ChatGPT conversation archive", long_about = None)]
pub struct Cli {
    /// ChatGPT export ZIP or conversations.json (defaults to $CHATGPT_EXPORT_PATH)
    #[arg(long, global = true, value_name = "PATH")]
    pub export_path: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search conversations by keyword
    Search {
        query: String,
        /// Only conversations active on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// Only conversations active on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<i64>,
    },
    /// Show every message of one conversation
    Get {
        id: String,
        #[arg(long, allow_negative_numbers = true)]
        max_messages: Option<i64>,
    },
    /// List conversations, most recent first
    List {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        limit: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<i64>,
    },
    /// Show statistics about the export
    Stats,
    /// List the available tools
    Tools,
    /// Invoke a tool with JSON arguments and print its JSON response
    Call {
        tool: String,
        /// JSON object of arguments
        arguments: Option<String>,
    },
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    let Some(command) = cli.command else {
        println!("Use --help for usage information");
        return Ok(ExitCode::SUCCESS);
    };

    if let Commands::Tools = command {
        print_json(&tools::definitions())?;
        return Ok(ExitCode::SUCCESS);
    }

    let export_path = resolve_export_path(cli.export_path.as_deref())?;
    let corpus = Corpus::initialize(&export_path)
        .with_context(|| format!("Failed to load {}", format_path_with_tilde(&export_path)))?;

    match command {
        Commands::Search { query, from, to, limit, offset } => {
            let params = SearchParams { query, date_from: from, date_to: to, limit, offset };
            let page = corpus.search(&params)?;
            if cli.json { print_json(&page)? } else { print_search(&page) }
        }
        Commands::Get { id, max_messages } => {
            let params = GetConversationParams { conversation_id: id, max_messages };
            let view = corpus.get_conversation(&params)?;
            if cli.json { print_json(&view)? } else { print_conversation(&view) }
        }
        Commands::List { from, to, limit, offset } => {
            let params = ListParams { date_from: from, date_to: to, limit, offset };
            let page = corpus.list_conversations(&params)?;
            if cli.json { print_json(&page)? } else { print_list(&page) }
        }
        Commands::Stats => {
            if cli.json { print_json(corpus.stats())? } else { print_stats(&corpus) }
        }
        Commands::Call { tool, arguments } => {
            let arguments: Value = match arguments {
                Some(raw) => serde_json::from_str(&raw).context("Tool arguments must be JSON")?,
                None => Value::Null,
            };
            return match tools::dispatch(&corpus, &tool, arguments) {
                Ok(response) => {
                    print_json(&response)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    print_json(&tools::error_body(&err))?;
                    Ok(ExitCode::FAILURE)
                }
            };
        }
        Commands::Tools => {}
    }

    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to encode JSON")?);
    Ok(())
}

fn format_date(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map(|t| t.format("%Y-%m-%d").to_string()).unwrap_or_else(|| "unknown date".to_string())
}

fn print_search(page: &SearchPage) {
    if page.total == 0 {
        println!("No conversations found matching '{}'.", page.query);
        return;
    }
    if page.results.is_empty() {
        println!(
            "No results at offset {}: '{}' matched {} conversation(s).",
            page.offset, page.query, page.total
        );
        return;
    }

    println!("Found {} conversation(s) matching '{}'", page.total, page.query);
    println!();
    for (rank, result) in page.results.iter().enumerate() {
        println!("{}. {}", page.offset + rank + 1, result.title);
        println!("   ID: {}", result.conversation_id);
        println!("   Date: {}", format_date(result.update_time.or(result.create_time)));
        println!("   Messages: {}", result.message_count);
        println!("   Score: {:.3}", result.score);
        println!("   {}", result.snippet);
        println!();
    }

    let shown_to = page.offset + page.results.len();
    if shown_to < page.total {
        println!("Showing {} of {}. Use --offset {} to see more.", page.results.len(), page.total, shown_to);
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "ChatGPT",
        Role::System => "System",
        Role::Tool => "Tool",
    }
}

fn print_conversation(view: &ConversationView) {
    println!("{}", view.title);
    println!("Date: {} | Messages: {}", format_date(view.create_time.or(view.update_time)), view.message_count);
    if let Some(model) = &view.model {
        println!("Model: {}", model);
    }
    println!("---");

    for message in &view.messages {
        match message.create_time {
            Some(time) => {
                println!("[{}] ({})", role_label(message.role), time.format("%Y-%m-%d %H:%M UTC"))
            }
            None => println!("[{}]", role_label(message.role)),
        }
        println!("{}", message.text);
        println!();
    }

    if view.omitted > 0 {
        println!("... {} more messages not shown. Increase --max-messages to see more.", view.omitted);
    }
}

fn print_list(page: &ConversationPage) {
    if page.conversations.is_empty() {
        println!("No conversations in range ({} total).", page.total);
        return;
    }

    let first = page.offset + 1;
    let last = page.offset + page.conversations.len();
    println!("Conversations {}-{} of {}", first, last, page.total);
    println!();
    for conversation in &page.conversations {
        println!(
            "- {} ({}) - {} messages - ID: {}",
            conversation.title,
            format_date(conversation.update_time.or(conversation.create_time)),
            conversation.message_count,
            conversation.id
        );
    }

    if last < page.total {
        println!();
        println!("Use --offset {} to see more.", last);
    }
}

fn print_stats(corpus: &Corpus) {
    let stats = corpus.stats();
    println!("ChatGPT History Statistics");
    println!("==========================");
    println!("Total conversations: {}", stats.conversation_count);
    println!("Total messages: {}", stats.message_count);
    for (role, count) in &stats.role_counts {
        println!("  {}: {}", role, count);
    }
    if stats.corrupt_count > 0 {
        println!("Skipped (corrupt): {}", stats.corrupt_count);
    }
    println!("Date range: {} -> {}", format_date(stats.earliest), format_date(stats.latest));
    println!("Indexed terms: {}", corpus.index().term_count());
    if let Some(source) = corpus.source() {
        println!();
        println!("Export: {}", format_path_with_tilde(source));
    }

    if !stats.model_usage.is_empty() {
        println!();
        println!("Model Usage");
        let mut models: Vec<(&String, &usize)> = stats.model_usage.iter().collect();
        models.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (model, count) in models.into_iter().take(MODELS_SHOWN) {
            println!("- {}: {} messages", model, count);
        }
    }

    let months: Vec<(&String, &usize)> =
        stats.monthly_activity.iter().filter(|(month, _)| month.as_str() != UNKNOWN_MONTH).collect();
    if !months.is_empty() {
        println!();
        println!("Monthly Activity (last {} months)", MONTHS_SHOWN);
        for (month, count) in months.into_iter().rev().take(MONTHS_SHOWN) {
            println!("- {}: {} ({})", month, "#".repeat((*count).min(BAR_WIDTH)), count);
        }
    }
    if let Some(undated) = stats.monthly_activity.get(UNKNOWN_MONTH) {
        println!("Messages without a date: {}", undated);
    }
}
