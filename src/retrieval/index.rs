// index.rs — Exact nearest-neighbor search over the embedded corpus.
//
// Brute-force squared-L2 scan. The corpus runs single-digit to low hundreds
// of entries, where a linear scan beats any ANN structure on both latency
// and code weight. A deployment with a large corpus would swap in an
// approximate index behind the same build/query contract.

use anyhow::bail;

/// One ranked match: a position into the corpus the index was built from,
/// plus the squared Euclidean distance to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub distance: f32,
}

/// In-memory similarity index over the embedded corpus.
///
/// Starts empty; `build` moves it to the built state, and a second `build`
/// fully replaces the previous contents (no merge). `query` takes `&self`,
/// so concurrent reads of a built index are safe; `build` takes `&mut self`,
/// which serializes writes against readers at compile time.
#[derive(Default)]
pub struct SimilarityIndex {
    dims: Option<usize>,
    vectors: Vec<Vec<f32>>,
    texts: Vec<String>,
}

impl SimilarityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the index contents with `vectors`, positionally paired with
    /// `texts`. All vectors must share one width; a mismatch signals a
    /// caller/model configuration bug and fails the build.
    pub fn build(&mut self, vectors: Vec<Vec<f32>>, texts: Vec<String>) -> anyhow::Result<()> {
        if vectors.len() != texts.len() {
            bail!(
                "index build: {} vectors paired with {} texts",
                vectors.len(),
                texts.len()
            );
        }

        let dims = match vectors.first() {
            Some(v) => v.len(),
            None => {
                // Empty corpus: built but empty, queries return no hits.
                self.dims = None;
                self.vectors.clear();
                self.texts.clear();
                return Ok(());
            }
        };
        for (i, v) in vectors.iter().enumerate() {
            if v.len() != dims {
                bail!(
                    "index build: vector {} has width {}, expected {}",
                    i,
                    v.len(),
                    dims
                );
            }
        }

        self.dims = Some(dims);
        self.vectors = vectors;
        self.texts = texts;
        log::debug!(
            "similarity index built: {} entries, {} dims",
            self.vectors.len(),
            dims
        );
        Ok(())
    }

    /// The `k` nearest entries by squared L2 distance, nearest first, ties
    /// broken by ascending corpus index. Returns `min(k, len)` hits. An
    /// index that has not been built yet (or `k == 0`) yields no hits rather
    /// than an error, since startup may race the first question.
    pub fn query(&self, vector: &[f32], k: usize) -> Vec<Hit> {
        if k == 0 || self.vectors.is_empty() {
            return Vec::new();
        }
        if self.dims.is_some_and(|d| d != vector.len()) {
            log::warn!(
                "query width {} does not match index width {}; returning no hits",
                vector.len(),
                self.dims.unwrap_or(0)
            );
            return Vec::new();
        }

        let mut hits: Vec<Hit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, stored)| Hit {
                index,
                distance: squared_l2(vector, stored),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.index.cmp(&b.index)));
        hits.truncate(k);
        hits
    }

    /// Text of the entry at `index`. Valid for any index returned by `query`.
    pub fn text(&self, index: usize) -> &str {
        &self.texts[index]
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
