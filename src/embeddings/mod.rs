// embeddings/ — Local sentence embedding using candle (pure Rust).
//
// Provides:
// - Model download + SHA256 verification
// - BERT inference with masked mean pooling
// - Input preparation for corpus facts and questions

pub mod download;
pub mod engine;
pub mod text_prep;

pub use engine::SentenceEncoder;

/// Anything that turns text into fixed-width vectors.
///
/// The retrieval layer depends on this seam rather than the candle engine
/// directly, so it can be exercised without model files on disk.
pub trait Embedder {
    /// Output vector width. Every vector this embedder produces has this length.
    fn dimensions(&self) -> usize;

    /// Embed one text. Accepts any UTF-8 input; the empty (or
    /// whitespace-only) string maps to the all-zero vector.
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    /// Embed many texts, preserving order. Must produce results identical to
    /// per-item `embed` calls; implementations may batch internally.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}
