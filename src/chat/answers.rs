//! Canned answers for frequently asked questions.

const PREDEFINED_ANSWERS: &[(&str, &str)] = &[
    (
        "chi sei",
        "Sono ArcadiaAI, un chatbot libero e open source, creato da Mirko Yuri Donato.",
    ),
    (
        "cosa sai fare",
        "Posso aiutarti a scrivere testi, riassumere documenti, creare file ZIP, \
         cercare software e molto altro. Usa @aiuto per vedere i comandi disponibili.",
    ),
    (
        "chi è tobia testa",
        "Tobia Testa (noto anche come Tobia Teseo) è un micronazionalista leonense attivo \
         nella Repubblica di Arcadia e a Lumenaria.",
    ),
    (
        "cos'è arcadiaai",
        "ArcadiaAI è un chatbot open source creato da Mirko Yuri Donato, progettato per \
         privacy, libertà e funzionalità avanzate.",
    ),
    (
        "sotto che licenza è distribuito arcadiaai",
        "ArcadiaAI è distribuito sotto licenza GNU GPL v3.0, garantendo libertà di uso, \
         modifica e condivisione.",
    ),
    (
        "come vengono salvate le conversazioni",
        "Le conversazioni sono gestite in memoria locale. Nulla viene inviato su server esterni.",
    ),
    (
        "cos'è un chatbot",
        "Un chatbot è un programma che simula una conversazione umana usando l'intelligenza \
         artificiale.",
    ),
    (
        "arcadiaai è un software libero",
        "Sì, ArcadiaAI è software libero e open source, rilasciato sotto licenza GNU GPL v3.0.",
    ),
];

/// Whole-message, case-insensitive lookup. `message` is expected to be trimmed.
pub fn lookup(message: &str) -> Option<&'static str> {
    let normalized = message.to_lowercase();
    PREDEFINED_ANSWERS
        .iter()
        .find(|(question, _)| *question == normalized)
        .map(|(_, answer)| *answer)
}

/// All questions in the table, in declaration order.
pub fn questions() -> impl Iterator<Item = &'static str> {
    PREDEFINED_ANSWERS.iter().map(|(question, _)| *question)
}
