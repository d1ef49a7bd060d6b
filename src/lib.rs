//! ArcadiaAI Local: a chatbot front-end for a locally hosted language model.
//!
//! Arcadia turns each user message into one of three things: a canned answer, an `@`
//! command, or a prompt for the local model. Around that dispatch core sit a per-user
//! memory document and a small web research pipeline used by `@deepsearch`.
//!
//! | Command | Effect |
//! |---------|--------|
//! | `@aiuto` | Lists the commands |
//! | `@deepsearch <query>` | Scrapes DuckDuckGo + Brave, reads the top pages, asks the model for a summary |
//! | `@immagine <description>` | Image request placeholder |
//! | `@crea zip` | Writes `archivio.zip` into the temp directory |
//! | `@app` | Lists software repositories |
//! | `@cerca <query>` | Local search placeholder |
//! | `@codice_sorgente` | Link to the source code |
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`chat`]: Conversation engine with rolling history, prompt assembly, attachments
//! - [`commands`]: `@` command parsing and handlers
//! - [`memory`]: Per-user nested memory document with a bounded change log
//! - [`research`]: Search scraping, host dedup, relevance scoring
//! - [`llm`]: The text-generation capability and the local runtime client
//! - [`catalog`]: Hugging Face GGUF model listing
//! - [`server`]: HTTP API over a shared engine

pub mod catalog;
pub mod chat;
pub mod commands;
pub mod config;
pub mod llm;
pub mod memory;
pub mod research;
pub mod server;
