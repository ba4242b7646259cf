//! Retrieval-augmented answering over an uploaded document.

pub mod chain;
pub mod pipeline;

pub use chain::{AnswerChain, RetrievalChain};
pub use pipeline::{DocumentPipeline, ProcessedDocument, RagPipeline};
