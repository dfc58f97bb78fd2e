// translate.rs — Translation and language detection.
//
// Both operations ride the same public translate endpoint. The response is a
// nested array: element 0 holds translated segments, element 2 the detected
// source language. Parsing is split from transport so it can be tested with
// canned payloads.

use std::time::Duration;

use anyhow::Context;

use crate::config;
use crate::providers::Availability;

pub trait Translator {
    /// Translate into the target ISO language code. Unavailable on any
    /// transport or decode failure; the caller picks the fallback.
    fn translate(&self, text: &str, target_lang: &str) -> Availability<String>;

    /// Best-guess ISO code for the text's language; DEFAULT_LANGUAGE when
    /// detection is unavailable or inconclusive.
    fn detect(&self, text: &str) -> String;
}

pub struct GoogleTranslator;

impl GoogleTranslator {
    fn call(&self, text: &str, target_lang: &str) -> anyhow::Result<serde_json::Value> {
        let resp = ureq::get(config::translate::TRANSLATE_URL)
            .timeout(Duration::from_secs(config::translate::REQUEST_TIMEOUT_SECS))
            .query("client", "gtx")
            .query("sl", "auto")
            .query("tl", target_lang)
            .query("dt", "t")
            .query("q", text)
            .call()
            .context("translate request failed")?;
        resp.into_json().context("translate response was not JSON")
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str, target_lang: &str) -> Availability<String> {
        if text.trim().is_empty() {
            return Availability::Available(String::new());
        }

        match self.call(text, target_lang) {
            Ok(body) => match parse_translation(&body) {
                Some(translated) => Availability::Available(translated),
                None => {
                    log::warn!("translate response carried no segments");
                    Availability::Unavailable
                }
            },
            Err(e) => {
                log::warn!("translate to {target_lang} failed: {e}");
                Availability::Unavailable
            }
        }
    }

    fn detect(&self, text: &str) -> String {
        // Any target works for detection; the source code rides along.
        match self.call(text, config::chat::DEFAULT_LANGUAGE) {
            Ok(body) => parse_detected_language(&body)
                .unwrap_or_else(|| config::chat::DEFAULT_LANGUAGE.to_string()),
            Err(e) => {
                log::warn!("language detection failed: {e}");
                config::chat::DEFAULT_LANGUAGE.to_string()
            }
        }
    }
}

/// Concatenate the translated segments (long inputs come back in pieces).
fn parse_translation(body: &serde_json::Value) -> Option<String> {
    let segments = body.get(0)?.as_array()?;
    let mut out = String::new();
    for seg in segments {
        if let Some(piece) = seg.get(0).and_then(|p| p.as_str()) {
            out.push_str(piece);
        }
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn parse_detected_language(body: &serde_json::Value) -> Option<String> {
    body.get(2)?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_translation_joins_segments() {
        let body = serde_json::json!([
            [
                ["La rotation des cultures ", "Crop rotation ", null, null],
                ["améliore le sol.", "improves the soil.", null, null]
            ],
            null,
            "en"
        ]);
        assert_eq!(
            parse_translation(&body).unwrap(),
            "La rotation des cultures améliore le sol."
        );
    }

    #[test]
    fn test_parse_translation_empty_body() {
        let body = serde_json::json!([[], null, "en"]);
        assert!(parse_translation(&body).is_none());
        assert!(parse_translation(&serde_json::json!({})).is_none());
    }

    #[test]
    fn test_parse_detected_language() {
        let body = serde_json::json!([[["hello", "hola", null]], null, "es"]);
        assert_eq!(parse_detected_language(&body).unwrap(), "es");
        assert!(parse_detected_language(&serde_json::json!([[], null, ""])).is_none());
    }
}
