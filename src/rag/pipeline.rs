use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::chain::{AnswerChain, RetrievalChain};
use crate::chunking::{split_pages, TextSplitter};
use crate::config::{Config, LlmConfig, PipelineConfig};
use crate::document::load_pdf;
use crate::llm::embeddings;
use crate::search::VectorStore;

/// Everything a session needs from one processed upload.
pub struct ProcessedDocument {
    pub id: Uuid,
    pub filename: String,
    /// Full text of every page; the pattern detector scans this, not just
    /// the retrieved chunks.
    pub text: String,
    pub page_count: usize,
    pub chunk_count: usize,
    pub chain: Arc<dyn AnswerChain>,
}

impl std::fmt::Debug for ProcessedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessedDocument")
            .field("id", &self.id)
            .field("filename", &self.filename)
            .field("page_count", &self.page_count)
            .field("chunk_count", &self.chunk_count)
            .finish_non_exhaustive()
    }
}

/// Turns uploaded PDF bytes into a queryable document.
#[async_trait]
pub trait DocumentPipeline: Send + Sync {
    async fn build(&self, filename: &str, pdf: Vec<u8>) -> Result<ProcessedDocument>;
}

/// load → split → embed → index → chain.
pub struct RagPipeline {
    client: reqwest::Client,
    llm: LlmConfig,
    settings: PipelineConfig,
}

impl RagPipeline {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            llm: config.llm.clone(),
            settings: config.pipeline.clone(),
        }
    }
}

#[async_trait]
impl DocumentPipeline for RagPipeline {
    async fn build(&self, filename: &str, pdf: Vec<u8>) -> Result<ProcessedDocument> {
        let splitter = TextSplitter::new(self.settings.chunk_size, self.settings.chunk_overlap);

        // Parsing and splitting are CPU-bound.
        let (document, mut chunks) = tokio::task::spawn_blocking(move || {
            let document = load_pdf(&pdf)?;
            if document.is_blank() {
                anyhow::bail!("Document contains no extractable text");
            }
            let chunks = split_pages(&document.pages, &splitter);
            Ok::<_, anyhow::Error>((document, chunks))
        })
        .await
        .context("PDF processing task panicked")??;

        let max = self.settings.max_index_chunks;
        if max > 0 && chunks.len() > max {
            tracing::info!(
                "Indexing the first {max} of {} chunks for {filename}",
                chunks.len()
            );
            chunks.truncate(max);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = embeddings::embed_batch(&self.client, &self.llm, &texts)
            .await
            .context("Failed to embed document chunks")?;

        let chunk_count = chunks.len();
        let index = VectorStore::from_embeddings(chunks, vectors)?;
        tracing::info!(
            "Vector store created with {} entries ({} dimensions)",
            index.len(),
            index.dimension()
        );

        let chain = RetrievalChain::new(
            index,
            self.client.clone(),
            self.llm.clone(),
            self.settings.retrieval_k,
        );
        tracing::info!("RAG chain initialized for {filename}");

        Ok(ProcessedDocument {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            text: document.full_text(),
            page_count: document.page_count(),
            chunk_count,
            chain: Arc::new(chain),
        })
    }
}
