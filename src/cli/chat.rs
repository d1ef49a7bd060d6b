//! CLI `chat` command: interactive conversation on stdin/stdout.

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::chat::ConversationEngine;

const EXIT_WORDS: [&str; 3] = ["esci", "quit", "exit"];

/// Read messages line by line until EOF or an exit word.
pub async fn chat(mut engine: ConversationEngine) -> Result<()> {
    println!("💬 Benvenuto in ArcadiaAI Local! Scrivi un messaggio o '@aiuto'");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nTu: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if is_exit(&line) {
            break;
        }

        let reply = engine.respond(&line, &[]).await;
        println!("🤖 ArcadiaAI: {reply}");
    }

    println!("\nA presto!");
    Ok(())
}

fn is_exit(line: &str) -> bool {
    let line = line.trim().to_lowercase();
    EXIT_WORDS.contains(&line.as_str())
}
