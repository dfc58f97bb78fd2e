// prompt.rs — The one prompt template.
//
// Named slots instead of per-feature prompt variants: persona, recent
// history, field conditions (location/weather), retrieved context, and an
// answer-language directive. A slot left empty disappears from the rendered
// prompt entirely; there are no empty headings.

use crate::config;

pub struct PromptTemplate {
    persona: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            persona: "You are a friendly and knowledgeable agricultural assistant. \
                      Respond in a natural, engaging, and conversational tone."
                .to_string(),
        }
    }
}

/// Everything a single turn feeds into the template. Empty strings mean
/// "slot absent".
pub struct PromptSlots<'a> {
    pub question: &'a str,
    pub context: &'a str,
    pub conditions: &'a str,
    pub history: &'a str,
    /// ISO language code for the answer; the default language adds no
    /// directive.
    pub language: &'a str,
}

impl PromptTemplate {
    pub fn with_persona(persona: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
        }
    }

    pub fn render(&self, slots: &PromptSlots) -> String {
        let mut prompt = String::new();
        prompt.push_str(&self.persona);
        prompt.push_str("\n\n");

        if !slots.history.is_empty() {
            prompt.push_str("Recent conversation:\n");
            prompt.push_str(slots.history);
            prompt.push_str("\n\n");
        }

        if !slots.conditions.is_empty() {
            prompt.push_str("Current field conditions:\n");
            prompt.push_str(slots.conditions);
            prompt.push_str("\n\n");
        }

        if !slots.context.is_empty() {
            prompt.push_str("Relevant context:\n");
            prompt.push_str(slots.context);
            prompt.push_str("\n\n");
        }

        prompt.push_str("Farmer's question:\n");
        prompt.push_str(slots.question);
        prompt.push_str("\n\n");

        prompt.push_str(
            "Guidelines:\n\
             - Keep it conversational and engaging.\n\
             - Answer naturally without over-explaining unless asked.\n\
             - Be concise but helpful, avoiding robotic or overly formal tones.\n",
        );

        if !slots.language.is_empty() && slots.language != config::chat::DEFAULT_LANGUAGE {
            prompt.push_str(&format!(
                "- Answer in the language with ISO code \"{}\".\n",
                slots.language
            ));
        }

        prompt
    }
}
