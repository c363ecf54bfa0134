use log::{debug, error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ArtError, Result};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Usage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

/// One chat-completion round trip. `json_object` constrains the model to
/// structured JSON output (used by the metadata stage).
pub async fn chat_completion(
    http: &Client,
    api_key: &str,
    model: &str,
    system: &str,
    user: &str,
    json_object: bool,
) -> Result<String> {
    let request = ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: user,
            },
        ],
        temperature: 0.5,
        response_format: json_object.then_some(ResponseFormat {
            format_type: "json_object",
        }),
    };

    debug!("Sending chat completion request to model {}", model);

    let response = http
        .post(CHAT_COMPLETIONS_URL)
        .header("Content-Type", "application/json")
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        error!("Chat API error ({}): {}", status, body);
        return Err(ArtError::ChatApi(format!("status {}", status)));
    }

    let parsed: ChatResponse = serde_json::from_str(&body)?;

    if let Some(usage) = &parsed.usage {
        info!(
            "Token usage - Prompt tokens: {}, Completion tokens: {}, Total tokens: {}",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| ArtError::ChatApi("no completion choices returned".to_string()))
}
