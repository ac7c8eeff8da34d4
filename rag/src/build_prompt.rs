use crate::config::Config;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

const CONTEXT_SLOT: &str = "{context}";

pub fn build_prompt_with_context(
    cfg: &Config,
    question: &str,
    texts: &[String],
) -> (Vec<Message>, String) {
    let context = texts.join("\n");

    let system_content = if cfg.system_prompt.contains(CONTEXT_SLOT) {
        cfg.system_prompt.replace(CONTEXT_SLOT, &context)
    } else {
        format!("{}\n\n{}", cfg.system_prompt, context)
    };

    let messages = vec![
        Message { role: "system".to_string(), content: system_content },
        Message { role: "user".to_string(), content: question.to_string() },
    ];

    (messages, context)
}
