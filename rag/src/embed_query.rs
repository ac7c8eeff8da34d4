use crate::config::Config;
use crate::embed_chunks::embed_texts;
use crate::error::{RagError, Result};

pub fn embed_query(cfg: &Config, text: &str) -> Result<Vec<f32>> {
    let vecs = embed_texts(cfg, &[text.to_string()])?;
    vecs.into_iter()
        .next()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RagError::Embedding("empty query embedding".to_string()))
}
