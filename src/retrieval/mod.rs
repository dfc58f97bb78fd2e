// retrieval/ — The RAG core: exact nearest-neighbor search over the embedded
// corpus, plus the quality gate that decides whether retrieved text is worth
// putting in front of the model.

pub mod index;
pub mod retriever;

pub use index::{Hit, SimilarityIndex};
pub use retriever::{Retriever, ScoredEntry};
