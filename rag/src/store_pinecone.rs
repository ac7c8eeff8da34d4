use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::config::Config;
use crate::error::{RagError, Result};
use crate::http::{get_json, post_json};

const API_VERSION: &str = "2025-01";

#[derive(Serialize)]
struct CreateIndex<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: IndexSpec<'a>,
}

#[derive(Serialize)]
struct IndexSpec<'a> {
    serverless: Serverless<'a>,
}

#[derive(Serialize)]
struct Serverless<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexModel>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct IndexModel {
    pub name: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub status: IndexStatus,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct IndexStatus {
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub state: String,
}

/// Data-plane address of a Pinecone index.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexHandle {
    pub name: String,
    pub host: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct VectorMetadata {
    pub source: String,
    pub page: u32,
    pub text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Vector {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: VectorMetadata,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [Vector],
}

#[derive(Deserialize)]
struct UpsertResponse {
    #[serde(rename = "upsertedCount", default)]
    upserted_count: usize,
}

pub(crate) fn auth_headers(api_key: &str) -> [(&str, &str); 2] {
    [("Api-Key", api_key), ("X-Pinecone-API-Version", API_VERSION)]
}

pub fn list_indexes(cfg: &Config) -> Result<Vec<String>> {
    let key = cfg.require_pinecone_key()?;
    let url = format!("{}/indexes", cfg.pinecone_api_url);
    let list = get_json::<IndexList>(&url, &auth_headers(key))?;
    Ok(list.indexes.into_iter().map(|i| i.name).collect())
}

pub fn describe_index(cfg: &Config) -> Result<IndexModel> {
    let key = cfg.require_pinecone_key()?;
    let url = format!("{}/indexes/{}", cfg.pinecone_api_url, cfg.index_name);
    get_json::<IndexModel>(&url, &auth_headers(key))
}

pub fn create_index(cfg: &Config) -> Result<()> {
    let key = cfg.require_pinecone_key()?;
    let url = format!("{}/indexes", cfg.pinecone_api_url);
    let body = CreateIndex {
        name: &cfg.index_name,
        dimension: cfg.dimension,
        metric: &cfg.metric,
        spec: IndexSpec {
            serverless: Serverless {
                cloud: &cfg.cloud,
                region: &cfg.region,
            },
        },
    };
    let _ = post_json::<Value, _>(&url, &auth_headers(key), &body)?;
    Ok(())
}

/// Creates the index when it is missing and waits until it reports ready.
/// Returns `true` if the index was created by this call.
pub fn ensure_index(cfg: &Config) -> Result<bool> {
    if list_indexes(cfg)?.iter().any(|name| name == &cfg.index_name) {
        info!(index = %cfg.index_name, "index already exists");
        return Ok(false);
    }
    info!(
        index = %cfg.index_name,
        dimension = cfg.dimension,
        metric = %cfg.metric,
        "index does not exist, creating it"
    );
    create_index(cfg)?;
    wait_until_ready(cfg)?;
    Ok(true)
}

pub fn wait_until_ready(cfg: &Config) -> Result<IndexModel> {
    let started = Instant::now();
    let timeout = Duration::from_secs(cfg.ready_timeout_secs);
    loop {
        let model = describe_index(cfg)?;
        if model.status.ready {
            info!(index = %cfg.index_name, "index is ready");
            return Ok(model);
        }
        if started.elapsed() >= timeout {
            return Err(RagError::IndexNotReady {
                name: cfg.index_name.clone(),
                waited_secs: started.elapsed().as_secs(),
            });
        }
        info!(
            index = %cfg.index_name,
            state = %model.status.state,
            "waiting for index to be ready"
        );
        thread::sleep(Duration::from_secs(cfg.ready_poll_secs));
    }
}

pub fn connect_index(cfg: &Config) -> Result<IndexHandle> {
    let host = match &cfg.index_host {
        Some(host) => host.clone(),
        None => describe_index(cfg)?.host,
    };
    let host = if host.starts_with("http://") || host.starts_with("https://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", host.trim_end_matches('/'))
    };
    info!(index = %cfg.index_name, host = %host, "connected to index");
    Ok(IndexHandle {
        name: cfg.index_name.clone(),
        host,
    })
}

pub fn upsert_vectors(cfg: &Config, index: &IndexHandle, vectors: &[Vector]) -> Result<usize> {
    if vectors.is_empty() {
        return Ok(0);
    }
    let key = cfg.require_pinecone_key()?;
    let url = format!("{}/vectors/upsert", index.host);
    let body = UpsertRequest { vectors };
    let res = post_json::<UpsertResponse, _>(&url, &auth_headers(key), &body)?;
    Ok(res.upserted_count)
}
