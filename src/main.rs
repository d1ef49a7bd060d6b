mod catalog;
mod chat;
mod cli;
mod commands;
mod config;
mod llm;
mod memory;
mod research;
mod server;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arcadia", version, about = "Local chatbot front-end for a local LLM runtime")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Chat interactively on the terminal
    Chat,
    /// Serve the HTTP API for web front-ends
    Serve,
    /// Inspect or edit persisted user memory
    Memory {
        /// User identity (defaults to storage.default_user)
        #[arg(long, global = true)]
        user: Option<String>,
        #[command(subcommand)]
        action: MemoryAction,
    },
    /// Manage GGUF models
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
}

#[derive(Subcommand)]
enum MemoryAction {
    /// Print the whole memory document
    Show,
    /// Read a dot-separated path (e.g. user.preferences.food)
    Get { path: String },
    /// Write a value (JSON, or plain text) at a dot-separated path
    Set { path: String, value: String },
    /// Remove a key from the user or conversations section
    Delete { key: String },
    /// Delete the memory file and start fresh
    Clear,
    /// Turn memory on
    Enable,
    /// Turn memory off (reads return defaults, writes are refused)
    Disable,
    /// Show the recent change log
    Log,
}

#[derive(Subcommand)]
enum ModelAction {
    /// Download the GGUF model to ~/.arcadia/models/
    Download {
        /// Download from this URL instead of the configured one
        #[arg(long)]
        url: Option<String>,
        /// Save under this file name instead of llm.model_file
        #[arg(long)]
        file: Option<String>,
    },
    /// Show whether the model file is present
    Status,
    /// List GGUF repositories on Hugging Face
    List {
        #[arg(long, default_value = catalog::DEFAULT_AUTHOR)]
        author: String,
        #[arg(long, default_value = "gguf")]
        search: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// List the .gguf files of a Hugging Face repository
    Files { model_id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let mut config = config::ArcadiaConfig::load()?;

    // Log to stderr so stdout stays clean for the chat REPL.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Chat => {
            let engine = build_engine(&config)?;
            cli::chat::chat(engine).await?;
        }
        Command::Serve => {
            let engine = build_engine(&config)?;
            server::serve(config, engine).await?;
        }
        Command::Memory { user, action } => {
            let user = user.as_deref();
            match action {
                MemoryAction::Show => cli::memory::show(&config, user)?,
                MemoryAction::Get { path } => cli::memory::get(&config, user, &path)?,
                MemoryAction::Set { path, value } => {
                    cli::memory::set(&config, user, &path, &value)?
                }
                MemoryAction::Delete { key } => cli::memory::delete(&config, user, &key)?,
                MemoryAction::Clear => cli::memory::clear(&config, user)?,
                MemoryAction::Enable => cli::memory::set_enabled(&config, user, true)?,
                MemoryAction::Disable => cli::memory::set_enabled(&config, user, false)?,
                MemoryAction::Log => cli::memory::log(&config, user)?,
            }
        }
        Command::Model { action } => match action {
            ModelAction::Download { url, file } => {
                if let Some(file) = file {
                    config.llm.model_file = file;
                }
                cli::model_download(&config, url.as_deref()).await?;
            }
            ModelAction::Status => cli::model_status(&config)?,
            ModelAction::List {
                author,
                search,
                limit,
            } => cli::catalog::list(&author, &search, limit).await?,
            ModelAction::Files { model_id } => cli::catalog::files(&model_id).await?,
        },
    }

    Ok(())
}

fn build_engine(config: &config::ArcadiaConfig) -> Result<chat::ConversationEngine> {
    let generator: Arc<dyn llm::TextGenerator> = Arc::from(llm::create_generator(&config.llm));
    tracing::info!(runtime = %config.llm.base_url, model = %config.llm.model, "generator ready");
    chat::ConversationEngine::from_config(config, generator)
}
