use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::config::Config;
use crate::error::{RagError, Result};
use crate::http::post_json;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Serialize)]
struct EmbedLegacyRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Embeds `texts` in one batch call, falling back to one call per text if the
/// batch endpoint fails or returns the wrong number of vectors.
pub fn embed_texts(cfg: &Config, texts: &[String]) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(vec![]);
    }
    let url = format!("{}/api/embed", cfg.ollama_url);
    let req = EmbedRequest {
        model: &cfg.embed_model,
        input: texts,
    };
    match post_json::<Value, _>(&url, &[], &req).and_then(parse_embeddings) {
        Ok(vectors) if vectors.len() == texts.len() => Ok(vectors),
        Ok(vectors) => {
            warn!(
                expected = texts.len(),
                got = vectors.len(),
                "batch embedding returned wrong count, embedding one by one"
            );
            embed_each(cfg, texts)
        }
        Err(e) => {
            warn!(error = %e, "batch embedding failed, embedding one by one");
            embed_each(cfg, texts)
        }
    }
}

fn embed_each(cfg: &Config, texts: &[String]) -> Result<Vec<Vec<f32>>> {
    let url = format!("{}/api/embeddings", cfg.ollama_url);
    let mut out = Vec::with_capacity(texts.len());
    for text in texts {
        let req = EmbedLegacyRequest {
            model: &cfg.embed_model,
            prompt: text,
        };
        let res = post_json::<Value, _>(&url, &[], &req)?;
        let vector = parse_embeddings(res)?
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("empty embedding".to_string()))?;
        out.push(vector);
    }
    Ok(out)
}

fn parse_embeddings(value: Value) -> Result<Vec<Vec<f32>>> {
    if let Some(embeddings) = value.get("embeddings") {
        return parse_embeddings_value(embeddings);
    }
    if let Some(embedding) = value.get("embedding") {
        return parse_embeddings_value(embedding);
    }
    Err(RagError::Embedding("no embeddings in response".to_string()))
}

fn parse_embeddings_value(value: &Value) -> Result<Vec<Vec<f32>>> {
    let arr = value
        .as_array()
        .ok_or_else(|| RagError::Embedding("embeddings is not an array".to_string()))?;
    if arr.is_empty() {
        return Ok(vec![]);
    }
    if arr[0].is_array() {
        return arr.iter().map(parse_vec).collect();
    }
    Ok(vec![parse_vec(value)?])
}

fn parse_vec(value: &Value) -> Result<Vec<f32>> {
    let arr = value
        .as_array()
        .ok_or_else(|| RagError::Embedding("embedding is not an array".to_string()))?;
    arr.iter()
        .map(|v| {
            v.as_f64()
                .map(|n| n as f32)
                .ok_or_else(|| RagError::Embedding("embedding value is not a number".to_string()))
        })
        .collect()
}
