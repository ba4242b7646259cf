use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;

/// Send a single-turn prompt to the configured chat model and return its reply.
pub async fn complete(client: &reqwest::Client, config: &LlmConfig, prompt: &str) -> Result<String> {
    match config.provider.as_str() {
        "ollama" => call_ollama(client, config, prompt).await,
        "openai" => call_openai(client, config, prompt).await,
        other => anyhow::bail!("Unsupported LLM provider for chat: {other}"),
    }
}

#[derive(Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

fn user_message(prompt: &str) -> Vec<Message> {
    vec![Message {
        role: "user".to_string(),
        content: prompt.to_string(),
    }]
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: Message,
}

async fn call_ollama(client: &reqwest::Client, config: &LlmConfig, prompt: &str) -> Result<String> {
    let url = format!("{}/api/chat", config.base_url);

    let req = OllamaChatRequest {
        model: &config.chat_model,
        messages: user_message(prompt),
        stream: false,
        options: OllamaOptions {
            temperature: config.temperature,
        },
    };

    let resp = client
        .post(&url)
        .timeout(Duration::from_secs(config.chat_timeout_secs))
        .json(&req)
        .send()
        .await
        .context("Failed to call Ollama chat API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Ollama chat API returned {status}: {body}");
    }

    let body: OllamaChatResponse = resp
        .json()
        .await
        .context("Failed to parse Ollama chat response")?;
    Ok(body.message.content)
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

async fn call_openai(client: &reqwest::Client, config: &LlmConfig, prompt: &str) -> Result<String> {
    let url = format!("{}/v1/chat/completions", config.base_url);
    let api_key = config.api_key.as_deref().unwrap_or_default();

    let req = OpenAiChatRequest {
        model: &config.chat_model,
        messages: user_message(prompt),
        temperature: config.temperature,
    };

    let resp = client
        .post(&url)
        .timeout(Duration::from_secs(config.chat_timeout_secs))
        .bearer_auth(api_key)
        .json(&req)
        .send()
        .await
        .context("Failed to call OpenAI chat API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("OpenAI chat API returned {status}: {body}");
    }

    let body: OpenAiChatResponse = resp
        .json()
        .await
        .context("Failed to parse OpenAI chat response")?;
    Ok(body
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default())
}
