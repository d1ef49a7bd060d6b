//! `@` commands.
//!
//! [`Command::parse`] maps a trimmed, sigil-prefixed message onto the fixed vocabulary;
//! [`CommandInterpreter`] runs it. Matching is ASCII case-insensitive. `@aiuto`,
//! `@crea zip`, `@app` and `@codice_sorgente` must match the whole message, the others
//! match as prefixes and take the remainder as their argument.

pub mod archive;

use std::path::PathBuf;
use std::sync::Arc;

use crate::llm::{GenerationParams, TextGenerator};
use crate::research::{ResearchOutcome, Researcher, SearchResult};

pub const SIGIL: char = '@';

pub const SOURCE_LINK_REPLY: &str = "Il codice sorgente di ArcadiaAI è disponibile su GitHub: \
                                     https://github.com/mirko-yuri-donato/ArcadiaAI";

const HELP_TEXT: &str = "
🔧 **Comandi Disponibili:**
- `@deepsearch [domanda]` → ricerca approfondita sul web con riassunto
- `@immagine [descrizione]` → genera un'immagine concettuale
- `@crea zip` → crea un file ZIP (SAC: ZIP Service)
- `@app` → mostra repository software disponibili
- `@cerca [termine]` → cerca informazioni nel contesto
- `@codice_sorgente` → link al codice open source
- `@aiuto` → mostra questo messaggio
";

const APP_REPOSITORIES: &[&str] = &[
    "F-Droid (Android Open Source)",
    "Snap Store (Linux)",
    "Flathub (Linux universale)",
    "Winget (Windows)",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    DeepSearch(String),
    Image(String),
    CreateArchive,
    ListApps,
    LocalSearch(String),
    SourceLink,
    Unknown(String),
}

impl Command {
    /// Parse a trimmed message starting with [`SIGIL`].
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("@aiuto") {
            Self::Help
        } else if let Some(query) = strip_prefix_ci(raw, "@deepsearch") {
            Self::DeepSearch(query.trim().to_string())
        } else if let Some(desc) = strip_prefix_ci(raw, "@immagine") {
            Self::Image(desc.trim().to_string())
        } else if raw.eq_ignore_ascii_case("@crea zip") {
            Self::CreateArchive
        } else if raw.eq_ignore_ascii_case("@app") {
            Self::ListApps
        } else if let Some(query) = strip_prefix_ci(raw, "@cerca") {
            Self::LocalSearch(query.trim().to_string())
        } else if raw.eq_ignore_ascii_case("@codice_sorgente") {
            Self::SourceLink
        } else {
            Self::Unknown(raw.to_string())
        }
    }
}

fn strip_prefix_ci<'a>(raw: &'a str, prefix: &str) -> Option<&'a str> {
    let head = raw.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &raw[prefix.len()..])
}

pub fn help_text() -> &'static str {
    HELP_TEXT
}

pub fn image_reply(description: &str) -> String {
    if description.is_empty() {
        return "Devi descrivere cosa vuoi generare. Es: @immagine un castello su una collina"
            .to_string();
    }
    format!(
        "🎨 Immagine richiesta: '{description}'. In versione locale, puoi collegare Stable Diffusion in futuro."
    )
}

pub fn apps_reply() -> String {
    let links: Vec<String> = APP_REPOSITORIES.iter().map(|r| format!("- {r}")).collect();
    format!(
        "📦 Repository disponibili:\n{}\nUsa il gestore del tuo sistema operativo per installare app.",
        links.join("\n")
    )
}

pub fn local_search_reply(query: &str) -> String {
    format!("🔍 Ricerca locale: '{query}'. In futuro, integrerò un motore di ricerca offline.")
}

pub fn unknown_reply(raw: &str) -> String {
    format!("Comando '{raw}' non riconosciuto. Usa @aiuto per vedere i comandi disponibili.")
}

/// Prompt asking the model to summarise research hits.
pub fn summary_prompt(query: &str, results: &[SearchResult]) -> String {
    let sources: Vec<String> = results
        .iter()
        .map(|r| format!("- {} ({})", r.title, r.url))
        .collect();
    format!(
        "Analizza questi risultati su '{query}':\n{}\nFai un riassunto in 3 frasi, in italiano.",
        sources.join("\n")
    )
}

/// Runs parsed commands. Deep search needs the researcher and the generator; archive
/// creation writes into `temp_dir`; everything else is static text.
pub struct CommandInterpreter {
    generator: Arc<dyn TextGenerator>,
    researcher: Arc<Researcher>,
    params: GenerationParams,
    temp_dir: PathBuf,
}

impl CommandInterpreter {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        researcher: Arc<Researcher>,
        params: GenerationParams,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            generator,
            researcher,
            params,
            temp_dir,
        }
    }

    pub async fn handle(&self, raw: &str) -> String {
        let command = Command::parse(raw);
        tracing::debug!(?command, "dispatching command");
        self.execute(command).await
    }

    pub async fn execute(&self, command: Command) -> String {
        match command {
            Command::Help => help_text().to_string(),
            Command::DeepSearch(query) => self.deep_search(&query).await,
            Command::Image(description) => image_reply(&description),
            Command::CreateArchive => match archive::create_archive(&self.temp_dir) {
                Ok(path) => format!("✅ File ZIP creato in: `{}`", path.display()),
                Err(e) => {
                    tracing::warn!(error = %e, "archive creation failed");
                    format!("❌ Errore creazione ZIP: {e:#}")
                }
            },
            Command::ListApps => apps_reply(),
            Command::LocalSearch(query) => local_search_reply(&query),
            Command::SourceLink => SOURCE_LINK_REPLY.to_string(),
            Command::Unknown(raw) => unknown_reply(&raw),
        }
    }

    async fn deep_search(&self, query: &str) -> String {
        if query.is_empty() {
            return "❌ Specifica una query. Esempio: @deepsearch impatto climatico dell'IA"
                .to_string();
        }

        let (results, count) = match self.researcher.research(query).await {
            ResearchOutcome::Failed { error, .. } => {
                return format!("❌ Errore ricerca: {error}");
            }
            ResearchOutcome::Completed { results, count, .. } => (results, count),
        };
        if results.is_empty() {
            return "❌ Nessun risultato trovato.".to_string();
        }

        let prompt = summary_prompt(query, &results);
        match self.generator.generate(&prompt, &self.params).await {
            Ok(summary) => format!(
                "🔍 **Deep Search Completo**: _{query}_\n📊 **Fonti analizzate**: {count}\n\n{summary}"
            ),
            Err(e) => {
                tracing::warn!(error = %e, "summary generation failed");
                format!("❌ Errore modello locale durante il riassunto: {e}")
            }
        }
    }
}
