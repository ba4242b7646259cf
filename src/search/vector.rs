use anyhow::Result;

use crate::chunking::Chunk;

/// A stored vector entry
#[derive(Debug, Clone)]
struct VectorEntry {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// In-memory vector index over one document's chunks, searched by cosine
/// similarity. Built once per upload and never mutated afterwards.
#[derive(Debug, Default)]
pub struct VectorStore {
    entries: Vec<VectorEntry>,
    dimension: usize,
}

#[derive(Debug, Clone)]
pub struct VectorHit {
    pub chunk: Chunk,
    pub score: f32,
}

impl VectorStore {
    /// Build a store from chunks and their embeddings (must be parallel).
    pub fn from_embeddings(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Result<Self> {
        if chunks.len() != embeddings.len() {
            anyhow::bail!(
                "Got {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            );
        }

        let dimension = embeddings.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = embeddings.iter().position(|e| e.len() != dimension) {
            anyhow::bail!(
                "Embedding {bad} has dimension {} (expected {dimension})",
                embeddings[bad].len()
            );
        }

        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| VectorEntry { chunk, embedding })
            .collect();

        Ok(Self { entries, dimension })
    }

    /// Top `limit` chunks by cosine similarity to `query_embedding`, best first.
    pub fn search(&self, query_embedding: &[f32], limit: usize) -> Vec<VectorHit> {
        let mut scored: Vec<(f32, &VectorEntry)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(query_embedding, &e.embedding), e))
            .collect();

        // Sort descending by score; ties keep document order
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(score, e)| VectorHit {
                chunk: e.chunk.clone(),
                score,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a, norm_b) = a
        .iter()
        .zip(b)
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (x, y)| {
            (dot + x * y, na + x * x, nb + y * y)
        });

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
