use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Upper bound on characters sent per input. Chunks are far smaller by
/// default; this only matters when `DOCSENTRY_CHUNK_SIZE` is raised.
const MAX_EMBED_CHARS: usize = 6_000;

/// Inputs per provider request.
const OLLAMA_BATCH: usize = 32;
const OPENAI_BATCH: usize = 64;

fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= MAX_EMBED_CHARS {
        return text;
    }
    let mut end = MAX_EMBED_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Embed a batch of texts with the configured provider. Output is parallel to `texts`.
pub async fn embed_batch(
    client: &reqwest::Client,
    config: &LlmConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let inputs: Vec<String> = texts
        .iter()
        .map(|t| truncate_for_embedding(t).to_string())
        .collect();

    let embeddings = match config.provider.as_str() {
        "ollama" => embed_ollama(client, config, &inputs).await?,
        "openai" => embed_openai(client, config, &inputs).await?,
        other => anyhow::bail!("Unknown LLM provider: {other}"),
    };

    if embeddings.len() != texts.len() {
        anyhow::bail!(
            "Embedding provider returned {} vectors for {} inputs",
            embeddings.len(),
            texts.len()
        );
    }
    Ok(embeddings)
}

/// Embed a single text (a question).
pub async fn embed_single(
    client: &reqwest::Client,
    config: &LlmConfig,
    text: &str,
) -> Result<Vec<f32>> {
    embed_batch(client, config, &[text.to_string()])
        .await?
        .into_iter()
        .next()
        .context("No embedding returned")
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
    truncate: bool,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

async fn embed_ollama(
    client: &reqwest::Client,
    config: &LlmConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    let url = format!("{}/api/embed", config.base_url);
    let mut all = Vec::with_capacity(texts.len());

    for batch in texts.chunks(OLLAMA_BATCH) {
        let req = OllamaEmbedRequest {
            model: &config.embedding_model,
            input: batch,
            truncate: true,
        };

        let resp = client
            .post(&url)
            .json(&req)
            .send()
            .await
            .context("Failed to call Ollama embed API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Ollama embed API returned {status}: {body}");
        }

        let body: OllamaEmbedResponse = resp
            .json()
            .await
            .context("Failed to parse Ollama embed response")?;
        all.extend(body.embeddings);
    }

    Ok(all)
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiEmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct OpenAiEmbedResponse {
    data: Vec<OpenAiEmbedData>,
}

#[derive(Deserialize)]
struct OpenAiEmbedData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

async fn embed_openai(
    client: &reqwest::Client,
    config: &LlmConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    let url = format!("{}/v1/embeddings", config.base_url);
    let api_key = config.api_key.as_deref().unwrap_or_default();
    let mut all = Vec::with_capacity(texts.len());

    for batch in texts.chunks(OPENAI_BATCH) {
        let req = OpenAiEmbedRequest {
            model: &config.embedding_model,
            input: batch,
        };

        let resp = client
            .post(&url)
            .bearer_auth(api_key)
            .json(&req)
            .send()
            .await
            .context("Failed to call OpenAI embed API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI embed API returned {status}: {body}");
        }

        let mut body: OpenAiEmbedResponse = resp
            .json()
            .await
            .context("Failed to parse OpenAI embed response")?;

        // `data` is not guaranteed to come back in input order.
        body.data.sort_by_key(|d| d.index);
        all.extend(body.data.into_iter().map(|d| d.embedding));
    }

    Ok(all)
}
