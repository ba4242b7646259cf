//! Clients for the embedding and chat providers (Ollama or any
//! OpenAI-compatible API), plus prompt helpers.

pub mod chat;
pub mod embeddings;
pub mod prompt;
