use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::Result;
use crate::http::post_json;
use crate::store_pinecone::{auth_headers, IndexHandle};

#[derive(Clone, Debug, Deserialize)]
pub struct Match {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<Match>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    vector: &'a [f32],
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
}

pub fn retrieve_top(cfg: &Config, index: &IndexHandle, vector: &[f32]) -> Result<Vec<Match>> {
    let key = cfg.require_pinecone_key()?;
    let url = format!("{}/query", index.host);
    let req = QueryRequest {
        vector,
        top_k: cfg.top_k,
        include_metadata: true,
    };
    let res = post_json::<QueryResponse, _>(&url, &auth_headers(key), &req)?;
    Ok(res.matches)
}

/// Chunk text stored in each match's metadata, in rank order. Matches
/// without a string `text` field are skipped.
pub fn match_texts(matches: &[Match]) -> Vec<String> {
    matches
        .iter()
        .filter_map(|m| m.metadata.as_ref()?.get("text")?.as_str())
        .map(str::to_string)
        .collect()
}
