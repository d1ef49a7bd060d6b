//! Attachment decoding and text extraction.
//!
//! Attachments arrive base64-encoded, usually as data URLs. Every failure degrades to
//! an inline marker in the context text; nothing here aborts a turn.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Characters of extracted text kept per attachment.
pub const MAX_ATTACHMENT_CHARS: usize = 1000;
const TRUNCATION_MARKER: &str = " [...troncato]";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(rename = "type", default)]
    pub mime: String,
    /// `data:<mime>;base64,<payload>` or bare base64.
    pub data: String,
}

fn default_name() -> String {
    "file".to_string()
}

impl Attachment {
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let payload = match self.data.split_once(',') {
            Some((_, payload)) => payload,
            None => self.data.as_str(),
        };
        STANDARD.decode(payload.trim())
    }
}

/// Build the labelled context block for all attachments, one line per attachment.
/// Returns an empty string when nothing was extracted.
pub fn context_text(attachments: &[Attachment]) -> String {
    let mut context = String::new();
    for attachment in attachments {
        match attachment.decode() {
            Ok(data) => {
                let text = extract_text(&data, &attachment.mime);
                if !text.is_empty() {
                    context.push_str(&format!(
                        "\n[Testo da {}]: {}",
                        attachment.name,
                        truncate(&text, MAX_ATTACHMENT_CHARS)
                    ));
                }
            }
            Err(e) => {
                tracing::warn!(name = %attachment.name, error = %e, "attachment decode failed");
                context.push_str(&format!("\n[Errore lettura {}]", attachment.name));
            }
        }
    }
    context
}

/// Text for `data` according to its MIME type. Unsupported types and extraction errors
/// produce a short explanatory string instead.
pub fn extract_text(data: &[u8], mime: &str) -> String {
    if mime == "application/pdf" {
        extract_pdf(data)
    } else if mime.starts_with("text/") {
        String::from_utf8_lossy(data).into_owned()
    } else {
        format!("Tipo non supportato: {mime}")
    }
}

fn extract_pdf(data: &[u8]) -> String {
    // pdf-extract panics on some malformed documents
    let extracted = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(data)
    }));
    match extracted {
        Ok(Ok(text)) if text.trim().is_empty() => "Nessun testo estratto dal PDF.".to_string(),
        Ok(Ok(text)) => text,
        Ok(Err(e)) => format!("Errore lettura file: {e}"),
        Err(_) => "Errore lettura file: PDF non valido".to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_string(),
    }
}
