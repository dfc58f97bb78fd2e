// retriever.rs — Query-to-context retrieval over the embedded corpus.
//
// Owns the encoder and the similarity index; the chat pipeline only ever
// talks to this type. `initialize` embeds the corpus once at startup,
// `retrieve` turns a question into a context string (or nothing).

use anyhow::Context;

use crate::config;
use crate::embeddings::Embedder;
use crate::retrieval::index::{Hit, SimilarityIndex};

/// A ranked corpus match carrying its text.
#[derive(Debug, Clone)]
pub struct ScoredEntry {
    pub index: usize,
    pub distance: f32,
    pub text: String,
}

pub struct Retriever {
    embedder: Box<dyn Embedder>,
    index: SimilarityIndex,
}

impl Retriever {
    /// A retriever with no corpus yet; `retrieve` returns empty context
    /// until `initialize` runs.
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self {
            embedder,
            index: SimilarityIndex::new(),
        }
    }

    /// Embed the whole corpus and (re)build the index. Calling this again
    /// replaces the previous corpus outright.
    pub fn initialize(&mut self, corpus: &[String]) -> anyhow::Result<()> {
        let vectors = self.embedder.embed_batch(corpus).context("embed corpus")?;
        self.index.build(vectors, corpus.to_vec())?;
        log::info!("Retriever initialized with {} corpus entries", corpus.len());
        Ok(())
    }

    /// Ranked nearest corpus entries for `query`, nearest first.
    pub fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<ScoredEntry>> {
        let vector = self.embedder.embed(query).context("embed query")?;
        let hits = self.index.query(&vector, k);
        Ok(hits
            .into_iter()
            .map(|Hit { index, distance }| ScoredEntry {
                index,
                distance,
                text: self.index.text(index).to_string(),
            })
            .collect())
    }

    /// Context for a question: the top-`k` entry texts space-joined in rank
    /// order, or the empty string when the result is too thin to help.
    ///
    /// A joined text of MIN_CONTEXT_WORDS or fewer words is dropped
    /// outright; a near-empty fragment in the prompt reads worse than no
    /// context at all.
    pub fn retrieve(&self, query: &str, k: usize) -> anyhow::Result<String> {
        let matches = self.search(query, k)?;
        let joined = matches
            .iter()
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let words = joined.split_whitespace().count();
        if words <= config::retrieval::MIN_CONTEXT_WORDS {
            log::debug!("retrieved context too short ({words} words), dropping");
            return Ok(String::new());
        }

        log::debug!(
            "retrieved {} entries, {} words of context",
            matches.len(),
            words
        );
        Ok(joined)
    }

    pub fn corpus_len(&self) -> usize {
        self.index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Deterministic stand-in for the candle encoder: maps known texts to
    /// fixed vectors, everything else to the zero vector.
    struct FixedEmbedder {
        dims: usize,
        table: HashMap<String, Vec<f32>>,
    }

    impl FixedEmbedder {
        fn new(dims: usize, entries: &[(&str, &[f32])]) -> Self {
            let table = entries
                .iter()
                .map(|(t, v)| ((*t).to_string(), v.to_vec()))
                .collect();
            Self { dims, table }
        }
    }

    impl Embedder for FixedEmbedder {
        fn dimensions(&self) -> usize {
            self.dims
        }

        fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(self
                .table
                .get(text)
                .cloned()
                .unwrap_or_else(|| vec![0.0; self.dims]))
        }
    }

    const ROTATION: &str = "Crop rotation improves soil fertility.";
    const IRRIGATION: &str = "Drip irrigation helps farmers conserve water.";
    const WHEAT: &str = "Wheat grows best in temperate climates.";
    const QUESTION: &str = "How can I save water while farming?";

    fn farm_retriever() -> Retriever {
        let embedder = FixedEmbedder::new(
            3,
            &[
                (ROTATION, &[1.0, 0.0, 0.0]),
                (IRRIGATION, &[0.0, 1.0, 0.0]),
                (WHEAT, &[0.0, 0.0, 1.0]),
                // The question lands nearest the irrigation entry.
                (QUESTION, &[0.1, 0.9, 0.0]),
            ],
        );
        let mut r = Retriever::new(Box::new(embedder));
        r.initialize(&[ROTATION.into(), IRRIGATION.into(), WHEAT.into()])
            .unwrap();
        r
    }

    #[test]
    fn test_water_question_finds_irrigation_entry() {
        let r = farm_retriever();
        let top = r.search(QUESTION, 1).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].text, IRRIGATION);

        // Six words of context clears the gate and comes back verbatim.
        assert_eq!(r.retrieve(QUESTION, 1).unwrap(), IRRIGATION);
    }

    #[test]
    fn test_retrieve_is_deterministic() {
        let r = farm_retriever();
        let a = r.search(QUESTION, 3).unwrap();
        let b = r.search(QUESTION, 3).unwrap();
        let ranks = |v: &[ScoredEntry]| v.iter().map(|e| e.index).collect::<Vec<_>>();
        assert_eq!(ranks(&a), ranks(&b));
        assert_eq!(r.retrieve(QUESTION, 3).unwrap(), r.retrieve(QUESTION, 3).unwrap());
    }

    #[test]
    fn test_verbatim_corpus_entry_is_its_own_nearest_match() {
        let r = farm_retriever();
        let top = r.search(WHEAT, 1).unwrap();
        assert_eq!(top[0].text, WHEAT);
        assert!(top[0].distance.abs() < 1e-12);
    }

    #[test]
    fn test_gate_drops_five_words_keeps_six() {
        let five = "one two three four five";
        let six = "one two three four five six";
        let embedder = FixedEmbedder::new(2, &[(five, &[1.0, 0.0]), (six, &[0.0, 1.0])]);
        let mut r = Retriever::new(Box::new(embedder));
        r.initialize(&[five.to_string(), six.to_string()]).unwrap();

        // Nearest neighbor of each entry is itself.
        assert_eq!(r.retrieve(five, 1).unwrap(), "");
        assert_eq!(r.retrieve(six, 1).unwrap(), six);
    }

    #[test]
    fn test_retrieve_before_initialize_is_empty() {
        let embedder = FixedEmbedder::new(2, &[]);
        let r = Retriever::new(Box::new(embedder));
        assert_eq!(r.retrieve("anything", 3).unwrap(), "");
        assert!(r.search("anything", 3).unwrap().is_empty());
    }

    #[test]
    fn test_empty_corpus_yields_no_context() {
        let embedder = FixedEmbedder::new(2, &[]);
        let mut r = Retriever::new(Box::new(embedder));
        r.initialize(&[]).unwrap();
        assert_eq!(r.corpus_len(), 0);
        assert_eq!(r.retrieve("anything", 3).unwrap(), "");
    }

    #[test]
    fn test_reinitialize_replaces_corpus() {
        let embedder = FixedEmbedder::new(
            2,
            &[
                ("old fact about barley yields here", &[1.0, 0.0]),
                ("new fact about millet drought tolerance", &[1.0, 0.0]),
            ],
        );
        let mut r = Retriever::new(Box::new(embedder));
        r.initialize(&["old fact about barley yields here".to_string()])
            .unwrap();
        r.initialize(&["new fact about millet drought tolerance".to_string()])
            .unwrap();

        let results = r.search("old fact about barley yields here", 5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "new fact about millet drought tolerance");
    }

    #[test]
    fn test_k_exceeding_corpus_returns_all() {
        let r = farm_retriever();
        assert_eq!(r.search(QUESTION, 50).unwrap().len(), 3);
    }
}
