use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::config::LlmConfig;
use crate::llm::prompt::{render, sanitize_for_prompt, DEFAULT_TEMPLATE};
use crate::llm::{chat, embeddings};
use crate::search::{VectorHit, VectorStore};

/// Answers a question about one uploaded document.
#[async_trait]
pub trait AnswerChain: Send + Sync {
    async fn query(&self, question: &str) -> Result<String>;
}

/// Retrieve the most similar chunks, stuff them into the prompt, ask the model.
pub struct RetrievalChain {
    index: VectorStore,
    client: reqwest::Client,
    llm: LlmConfig,
    k: usize,
    template: String,
}

impl RetrievalChain {
    pub fn new(index: VectorStore, client: reqwest::Client, llm: LlmConfig, k: usize) -> Self {
        Self {
            index,
            client,
            llm,
            k: k.max(1),
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    /// Replace the prompt template. It should contain `{context}` and `{question}`.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Top-k chunks for `question`.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<VectorHit>> {
        let query_embedding = embeddings::embed_single(&self.client, &self.llm, question)
            .await
            .context("Failed to embed question")?;
        Ok(self.index.search(&query_embedding, self.k))
    }
}

#[async_trait]
impl AnswerChain for RetrievalChain {
    async fn query(&self, question: &str) -> Result<String> {
        let question = sanitize_for_prompt(question);
        let hits = self.retrieve(&question).await?;
        tracing::debug!(
            "Retrieved {} chunks (pages {:?})",
            hits.len(),
            hits.iter().map(|h| h.chunk.page).collect::<Vec<_>>()
        );

        let context = format_context(&hits);
        let prompt = render(&self.template, &context, &question);
        chat::complete(&self.client, &self.llm, &prompt)
            .await
            .context("LLM call failed")
    }
}

fn format_context(hits: &[VectorHit]) -> String {
    hits.iter()
        .map(|h| sanitize_for_prompt(&h.chunk.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
