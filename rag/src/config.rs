use std::env;
use std::str::FromStr;

use crate::error::{RagError, Result};

const DEFAULT_SYSTEM_PROMPT: &str = "You are an assistant for question-answering tasks. \
Use the following pieces of retrieved context to answer the question. \
If you don't know the answer, say that you don't know. \
Use three sentences maximum and keep the answer concise.\n\n{context}";

#[derive(Clone, Debug)]
pub struct Config {
    pub pinecone_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub pinecone_api_url: String,
    pub index_name: String,
    pub index_host: Option<String>,
    pub cloud: String,
    pub region: String,
    pub metric: String,
    pub dimension: usize,
    pub ready_poll_secs: u64,
    pub ready_timeout_secs: u64,
    pub data_dir: String,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub batch_size: usize,
    pub top_k: usize,
    pub ollama_url: String,
    pub embed_model: String,
    pub openai_url: String,
    pub chat_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub system_prompt: String,
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env if present so the API keys work without manual `export`.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let secret = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            pinecone_api_key: secret("PINECONE_API_KEY"),
            openai_api_key: secret("OPENAI_API_KEY"),
            pinecone_api_url: trim_slash(text("PINECONE_API_URL", "https://api.pinecone.io")),
            index_name: text("PINECONE_INDEX", "medicalbot"),
            index_host: secret("PINECONE_INDEX_HOST"),
            cloud: text("PINECONE_CLOUD", "aws"),
            region: text("PINECONE_REGION", "us-east-1"),
            metric: text("PINECONE_METRIC", "cosine"),
            // all-MiniLM-L6-v2 produces 384-dimensional vectors
            dimension: parsed(&lookup, "EMBED_DIMENSION", 384),
            ready_poll_secs: parsed(&lookup, "INDEX_READY_POLL_SECS", 2),
            ready_timeout_secs: parsed(&lookup, "INDEX_READY_TIMEOUT_SECS", 300),
            data_dir: text("RAG_DATA_DIR", "data/"),
            chunk_size: parsed(&lookup, "RAG_CHUNK_SIZE", 500),
            chunk_overlap: parsed(&lookup, "RAG_CHUNK_OVERLAP", 20),
            batch_size: parsed(&lookup, "RAG_BATCH_SIZE", 32),
            top_k: parsed(&lookup, "RAG_TOP_K", 3),
            ollama_url: trim_slash(text("OLLAMA_URL", "http://localhost:11434")),
            embed_model: text("OLLAMA_EMBED_MODEL", "all-minilm"),
            openai_url: trim_slash(text("OPENAI_API_URL", "https://api.openai.com/v1")),
            chat_model: text("OPENAI_CHAT_MODEL", "gpt-4o-mini"),
            temperature: parsed(&lookup, "OPENAI_TEMPERATURE", 0.4),
            max_tokens: parsed(&lookup, "OPENAI_MAX_TOKENS", 500),
            system_prompt: text("RAG_SYSTEM_PROMPT", DEFAULT_SYSTEM_PROMPT),
        }
    }

    pub fn require_pinecone_key(&self) -> Result<&str> {
        self.pinecone_api_key
            .as_deref()
            .ok_or(RagError::MissingKey("PINECONE_API_KEY"))
    }

    pub fn require_openai_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .ok_or(RagError::MissingKey("OPENAI_API_KEY"))
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
