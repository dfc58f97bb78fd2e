// pipeline.rs — Chat orchestration: retrieve, assemble, generate, translate.
//
// The pipeline is the caller of the retrieval core. Empty retrieved context
// is a normal outcome (the prompt simply has no context block); a generation
// failure is a hard error for the turn. Failed turns are not recorded.

use anyhow::Context;

use crate::chat::prompt::{PromptSlots, PromptTemplate};
use crate::chat::session::ChatSession;
use crate::config;
use crate::providers::{Availability, TextGenerator, Translator};
use crate::retrieval::Retriever;

/// Which language answers come back in.
pub enum AnswerLanguage {
    /// Detect per question and answer in kind.
    Detect,
    /// Always answer in this ISO code.
    Fixed(String),
}

pub struct Assistant {
    retriever: Retriever,
    generator: Box<dyn TextGenerator>,
    translator: Box<dyn Translator>,
    template: PromptTemplate,
    session: ChatSession,
    // Rendered location/weather block, fetched once at startup; may be empty.
    conditions: String,
    language: AnswerLanguage,
}

impl Assistant {
    pub fn new(
        retriever: Retriever,
        generator: Box<dyn TextGenerator>,
        translator: Box<dyn Translator>,
        language: AnswerLanguage,
    ) -> Self {
        Self {
            retriever,
            generator,
            translator,
            template: PromptTemplate::default(),
            session: ChatSession::new(config::chat::HISTORY_MAX_TURNS),
            conditions: String::new(),
            language,
        }
    }

    /// Install the startup field-conditions block (empty when enrichment was
    /// unavailable).
    pub fn set_conditions(&mut self, conditions: String) {
        self.conditions = conditions;
    }

    /// Swap the default persona for a caller-supplied one.
    pub fn set_persona(&mut self, persona: impl Into<String>) {
        self.template = PromptTemplate::with_persona(persona);
    }

    /// Answer one question: retrieve context, build the prompt, call the
    /// model, translate when needed, and record the turn.
    pub fn answer(&mut self, question: &str) -> anyhow::Result<String> {
        let question = question.trim();

        let context = self
            .retriever
            .retrieve(question, config::retrieval::DEFAULT_TOP_K)?;
        if context.is_empty() {
            log::debug!("no usable retrieved context for this question");
        }

        let target_lang = match &self.language {
            AnswerLanguage::Fixed(code) => code.clone(),
            AnswerLanguage::Detect => self.translator.detect(question),
        };

        let history = if self.session.is_empty() {
            String::new()
        } else {
            self.session.transcript()
        };
        let prompt = self.template.render(&PromptSlots {
            question,
            context: &context,
            conditions: &self.conditions,
            history: &history,
            language: &target_lang,
        });

        let raw = self.generator.generate(&prompt).context("generate answer")?;

        // The prompt already asks for the target language; the translation
        // pass catches models that answer in English anyway.
        let answer = if target_lang == config::chat::DEFAULT_LANGUAGE {
            raw
        } else {
            match self.translator.translate(&raw, &target_lang) {
                Availability::Available(translated) => translated,
                Availability::Unavailable => {
                    log::warn!("translation to {target_lang} unavailable, keeping the untranslated answer");
                    raw
                }
            }
        };

        self.session.record(question, answer.clone());
        Ok(answer)
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }
}
