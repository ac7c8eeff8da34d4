use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    #[error("{method} {url} failed: {status} {body}")]
    Status {
        method: &'static str,
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("{method} {url} request failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} decode failed: {source} | {body}")]
    Decode {
        method: &'static str,
        url: String,
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("{0} not found in environment variables")]
    MissingKey(&'static str),

    #[error("cannot read '{path}': {message}")]
    Pdf { path: String, message: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid embedding response: {0}")]
    Embedding(String),

    #[error("index '{name}' not ready after {waited_secs}s")]
    IndexNotReady { name: String, waited_secs: u64 },
}

pub type Result<T> = std::result::Result<T, RagError>;
