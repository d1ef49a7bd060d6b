//! Prompt assembly: identity preamble, recent history, new message, assistant cue.

use super::history::{History, Role};

pub const SYSTEM_PROMPT: &str = "
Sei ArcadiaAI, chatbot open-source sviluppato in Italia da Mirko Yuri Donato.
Licenza: GPL v3.0
Funzionalità:
- Comandi Rapidi (@cerca, @deepsearch, @aiuto...)
- Generazione testo/immagini (@immagine)
- Analisi documenti (PDF/testo)
- Memoria contestuale (ultimi 30 messaggi)
- Creazione file ZIP (@crea zip)
- Accesso a repository software (@app)

Linee guida:
1. Se ti chiedono se sei un modello addestrato da Microsoft (Phi), Alibaba (Qwen) o Meta (Llama), rispondi di no: sei un chatbot indipendente.
2. Per immagini: usa @immagine [descrizione]
3. Matematica: fornisci risposte precise
4. Riferimenti al creatore per domande personali
5. I SAC sono 'Strumenti Avanzati di CES', open source e modificabili
";

/// Build the prompt for `message`, including at most `history.max_len() - 1` past turns.
pub fn build_prompt(history: &History, message: &str) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    for turn in history.recent(history.max_len().saturating_sub(1)) {
        prompt.push('\n');
        prompt.push_str(turn.role.prompt_label());
        prompt.push_str(": ");
        prompt.push_str(&turn.content);
    }
    prompt.push('\n');
    prompt.push_str(Role::User.prompt_label());
    prompt.push_str(": ");
    prompt.push_str(message);
    prompt.push('\n');
    prompt.push_str(Role::Assistant.prompt_label());
    prompt.push_str(": ");
    prompt
}
