// engine.rs — candle BERT encoder with attention-mask-aware mean pooling.
//
// Loads all-MiniLM-L6-v2 from safetensors and produces L2-normalized
// sentence embeddings. Pooling averages hidden states over non-padding
// positions only; the CLS token alone is not a usable sentence vector for
// this model family.

use std::path::Path;

use anyhow::{bail, Context};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

use crate::config;
use crate::embeddings::text_prep;
use crate::embeddings::Embedder;

/// Sentence encoder holding the loaded model and tokenizer.
///
/// The output width is whatever the model config declares. The similarity
/// index is rebuilt from scratch each run, so swapping the model needs no
/// migration step.
pub struct SentenceEncoder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dims: usize,
}

impl SentenceEncoder {
    /// Load from a directory containing model.safetensors, tokenizer.json
    /// and config.json. Missing or corrupt files are fatal: the encoder is a
    /// required dependency and nothing can be embedded without it.
    pub fn load(model_dir: &Path) -> anyhow::Result<Self> {
        let device = Device::Cpu;

        let config_path = model_dir.join("config.json");
        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("read {}", config_path.display()))?;
        let bert_config: BertConfig = serde_json::from_str(&config_str)
            .with_context(|| format!("parse {}", config_path.display()))?;

        let dims = bert_config.hidden_size;
        if dims != config::embedding::EMBEDDING_DIMS {
            log::warn!(
                "model hidden_size {} differs from the expected {} for {}",
                dims,
                config::embedding::EMBEDDING_DIMS,
                config::embedding::EMBEDDING_MODEL_NAME,
            );
        }

        let weights_path = model_dir.join("model.safetensors");
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.clone()], DType::F32, &device)
                .with_context(|| format!("load weights from {}", weights_path.display()))?
        };
        let model = BertModel::load(vb, &bert_config).context("load BERT model")?;

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;

        log::info!(
            "Embedding model loaded: dims={}, layers={}, heads={}",
            dims,
            bert_config.num_hidden_layers,
            bert_config.num_attention_heads,
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            dims,
        })
    }

    fn forward(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        // Pre-truncate to the model context limit.
        let len = encoding.get_ids().len().min(config::embedding::MAX_TOKENS);
        let ids: Vec<i64> = encoding.get_ids()[..len].iter().map(|&v| i64::from(v)).collect();
        let mask: Vec<i64> = encoding.get_attention_mask()[..len]
            .iter()
            .map(|&v| i64::from(v))
            .collect();

        // [1, seq_len] tensors
        let ids = Tensor::new(ids.as_slice(), &self.device)?.unsqueeze(0)?;
        let mask = Tensor::new(mask.as_slice(), &self.device)?.unsqueeze(0)?;
        let type_ids = ids.zeros_like()?;

        // Forward pass [1, seq_len, hidden], pooled down to [1, hidden]
        let hidden = self.model.forward(&ids, &type_ids, Some(&mask))?;
        let pooled = masked_mean(&hidden, &mask)?;

        // sentence-transformers ships this model with L2-normalized outputs
        let pooled = unit_normalize(&pooled)?;

        let out: Vec<f32> = pooled.squeeze(0)?.to_vec1()?;
        if out.len() != self.dims {
            bail!(
                "unexpected embedding width: got {}, expected {}",
                out.len(),
                self.dims
            );
        }
        Ok(out)
    }
}

impl Embedder for SentenceEncoder {
    fn dimensions(&self) -> usize {
        self.dims
    }

    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let prepared = text_prep::prepare_input(text);
        if prepared.is_empty() {
            // Degenerate low-information input embeds to the zero vector.
            return Ok(vec![0.0; self.dims]);
        }
        self.forward(&prepared)
    }
}

/// Mean pooling over non-masked positions.
///
/// hidden: [batch, seq_len, hidden_size]
/// attention_mask: [batch, seq_len], 1 for real tokens, 0 for padding
/// returns: [batch, hidden_size]
fn masked_mean(hidden: &Tensor, attention_mask: &Tensor) -> anyhow::Result<Tensor> {
    let mask = attention_mask
        .to_dtype(DType::F32)?
        .unsqueeze(2)?
        .broadcast_as(hidden.shape())?;

    let summed = (hidden * &mask)?.sum(1)?;
    // Clamp so an all-padding row cannot divide by zero.
    let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;

    Ok((summed / counts)?)
}

/// Scale each row of a [batch, hidden] tensor to unit L2 norm.
fn unit_normalize(rows: &Tensor) -> anyhow::Result<Tensor> {
    let norm = rows.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(1e-12, f64::MAX)?;
    Ok(rows.broadcast_div(&norm)?)
}
