//! # doc-sentry
//!
//! A web service that answers questions about sensitive data (PII, PHI,
//! financial identifiers) in an uploaded PDF. Every answer combines two
//! detectors:
//!
//! ```text
//!   POST /upload (PDF)                     POST /query {"query": ...}
//!          │                                        │
//!          ▼                                        ▼
//!   ┌──────────────┐                      ┌──────────────────┐
//!   │  lopdf text  │──── full text ──────▶│  Regex patterns  │
//!   │  per page    │                      │  (6 fixed rules) │
//!   └──────┬───────┘                      └────────┬─────────┘
//!          │ split 1000/100                        │
//!          ▼                                       │
//!   ┌──────────────┐   top-k   ┌────────────┐      │
//!   │ Vector store │──────────▶│  LLM chat  │      │
//!   │ (embeddings) │           │  (prompt)  │      │
//!   └──────────────┘           └─────┬──────┘      │
//!                                    │             │
//!                                    ▼             ▼
//!                              ┌────────────────────────┐
//!                              │    Hybrid analysis     │
//!                              │ patterns + contextual  │
//!                              └────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, pipeline and LLM settings
//! - [`detect`] - Regex rule table and the hybrid merge with the LLM's answer
//! - [`document`] - PDF text extraction, page by page
//! - [`chunking`] - Recursive character splitter with overlap
//! - [`llm`] - Embedding and chat clients for Ollama or OpenAI-compatible APIs
//! - [`search`] - In-memory cosine-similarity vector store
//! - [`rag`] - The upload pipeline and the retrieval chain
//! - [`session`] - Per-caller document sessions keyed by `x-session-id`
//! - [`api`] - Axum HTTP handlers
//! - [`error`] - Typed API errors and their HTTP mapping

pub mod api;
pub mod chunking;
pub mod config;
pub mod detect;
pub mod document;
pub mod error;
pub mod llm;
pub mod models;
pub mod rag;
pub mod search;
pub mod session;
pub mod state;
