// gemini.rs — Hosted LLM backend (Gemini generateContent).
//
// Narrow interface: one prompt string in, one completion out. The model
// backend is required, so failures propagate as errors instead of degrading.

use std::time::Duration;

use anyhow::{bail, Context};
use serde::Serialize;

use crate::config;

/// Text-completion backend consumed by the chat pipeline.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

pub struct GeminiClient {
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: config::llm::GEMINI_MODEL.to_string(),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        // The key travels in the query string; never log the URL.
        let url = format!(
            "{}/{}:generateContent?key={}",
            config::llm::GEMINI_ENDPOINT_BASE,
            self.model,
            self.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        log::debug!("LLM request: {} prompt chars", prompt.len());
        let resp = ureq::post(&url)
            .timeout(Duration::from_secs(config::llm::REQUEST_TIMEOUT_SECS))
            .send_json(&request)
            .context("LLM request failed")?;

        let status = resp.status();
        if status != 200 {
            bail!("LLM returned HTTP {status}");
        }

        let body: serde_json::Value = resp.into_json().context("LLM response was not JSON")?;
        extract_completion(&body)
    }
}

/// Pull the first candidate's text out of a generateContent response.
fn extract_completion(body: &serde_json::Value) -> anyhow::Result<String> {
    let text = body
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(|t| t.as_str());

    match text {
        Some(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
        _ => bail!("LLM response carried no completion text"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_completion() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "  Rotate your crops yearly.  " }],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        });
        assert_eq!(extract_completion(&body).unwrap(), "Rotate your crops yearly.");
    }

    #[test]
    fn test_extract_completion_missing_candidates() {
        let body = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(extract_completion(&body).is_err());
    }

    #[test]
    fn test_extract_completion_empty_text() {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "   " }] } }]
        });
        assert!(extract_completion(&body).is_err());
    }
}
