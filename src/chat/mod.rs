//! Conversation engine.
//!
//! [`ConversationEngine::respond`] resolves one incoming message, trying in order:
//! empty input, `@` commands, the predefined-answer table, and finally the generation
//! capability. It never returns an error: every failure becomes reply text.

pub mod answers;
pub mod attachments;
pub mod history;
pub mod prompt;

use std::sync::Arc;

use anyhow::Result;

use crate::commands::{CommandInterpreter, SIGIL};
use crate::config::ArcadiaConfig;
use crate::llm::{GenerationParams, TextGenerator};
use crate::research::Researcher;
use attachments::Attachment;
use history::{ConversationTurn, History, Role};

pub const EMPTY_MESSAGE_REPLY: &str = "Non hai scritto nulla.";

pub struct ConversationEngine {
    generator: Arc<dyn TextGenerator>,
    commands: CommandInterpreter,
    history: History,
    params: GenerationParams,
}

impl ConversationEngine {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        commands: CommandInterpreter,
        max_context: usize,
        params: GenerationParams,
    ) -> Self {
        Self {
            generator,
            commands,
            history: History::new(max_context),
            params,
        }
    }

    /// Wire an engine from configuration around `generator`.
    pub fn from_config(config: &ArcadiaConfig, generator: Arc<dyn TextGenerator>) -> Result<Self> {
        let params = GenerationParams::from(&config.llm);
        let researcher = Arc::new(Researcher::from_config(&config.research)?);
        let commands = CommandInterpreter::new(
            Arc::clone(&generator),
            researcher,
            params,
            config.resolved_temp_dir(),
        );
        Ok(Self::new(generator, commands, config.chat.max_context, params))
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.history.to_vec()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Answer `message`, with optional attachments.
    ///
    /// Predefined answers append only the assistant turn; the generation path appends
    /// the user turn before calling the model and the reply (or error text) after it.
    pub async fn respond(&mut self, message: &str, attachments: &[Attachment]) -> String {
        let message = message.trim();
        if message.is_empty() {
            return EMPTY_MESSAGE_REPLY.to_string();
        }

        if message.starts_with(SIGIL) {
            return self.commands.handle(message).await;
        }

        if let Some(reply) = answers::lookup(message) {
            self.history.push(Role::Assistant, reply);
            return reply.to_string();
        }

        let context = attachments::context_text(attachments);
        let full_message = if context.is_empty() {
            message.to_string()
        } else {
            format!("{message}\n\nContesto aggiuntivo:\n{context}")
        };

        let prompt = prompt::build_prompt(&self.history, &full_message);
        self.history.push(Role::User, message);

        tracing::debug!(
            prompt_len = prompt.len(),
            attachments = attachments.len(),
            generator = %self.generator.name(),
            "generating reply"
        );

        let reply = match self.generator.generate(&prompt, &self.params).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "generation failed");
                format!("❌ Errore modello locale: {e}")
            }
        };
        self.history.push(Role::Assistant, reply.clone());
        reply
    }
}
