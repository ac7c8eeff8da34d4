use serde::{Deserialize, Serialize};

use crate::build_prompt::Message;
use crate::config::Config;
use crate::error::Result;
use crate::http::post_json;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub fn generate_answer(cfg: &Config, messages: &[Message]) -> Result<String> {
    let key = cfg.require_openai_key()?;
    let url = format!("{}/chat/completions", cfg.openai_url);
    let bearer = format!("Bearer {key}");
    let req = ChatRequest {
        model: &cfg.chat_model,
        messages,
        temperature: cfg.temperature,
        max_tokens: cfg.max_tokens,
    };
    let res = post_json::<ChatResponse, _>(&url, &[("Authorization", bearer.as_str())], &req)?;
    Ok(res
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_default())
}
