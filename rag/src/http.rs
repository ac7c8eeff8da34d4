use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::from_str;
use std::time::Duration;

use crate::error::{RagError, Result};

const TIMEOUT: Duration = Duration::from_secs(120);

pub type Headers<'a> = &'a [(&'a str, &'a str)];

fn client(method: &'static str, url: &str) -> Result<Client> {
    Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(|source| RagError::Transport {
            method,
            url: url.to_string(),
            source,
        })
}

pub fn get_json<T: DeserializeOwned>(url: &str, headers: Headers<'_>) -> Result<T> {
    let req = client("GET", url)?.get(url);
    send("GET", url, with_headers(req, headers))
}

pub fn post_json<T: DeserializeOwned, B: Serialize>(
    url: &str,
    headers: Headers<'_>,
    body: &B,
) -> Result<T> {
    let req = client("POST", url)?
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .json(body);
    send("POST", url, with_headers(req, headers))
}

fn with_headers(mut req: RequestBuilder, headers: Headers<'_>) -> RequestBuilder {
    for (name, value) in headers {
        req = req.header(*name, *value);
    }
    req
}

fn send<T: DeserializeOwned>(method: &'static str, url: &str, req: RequestBuilder) -> Result<T> {
    tracing::debug!(method, url, "sending request");
    let resp = req.send().map_err(|source| RagError::Transport {
        method,
        url: url.to_string(),
        source,
    })?;
    let status = resp.status();
    let text = resp.text().unwrap_or_default();
    if !status.is_success() {
        return Err(RagError::Status {
            method,
            url: url.to_string(),
            status,
            body: text,
        });
    }
    from_str::<T>(&text).map_err(|source| RagError::Decode {
        method,
        url: url.to_string(),
        source,
        body: text,
    })
}
