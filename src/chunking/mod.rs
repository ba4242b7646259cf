//! Document chunking: each page is split independently so every chunk keeps
//! the page it came from.

pub mod splitter;

pub use splitter::TextSplitter;

use crate::document::Page;

/// A piece of page text that gets embedded and retrieved.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Position in the document's chunk sequence.
    pub index: usize,
    /// 1-based page the text came from.
    pub page: u32,
    pub content: String,
}

/// Split every page with `splitter`, numbering chunks in document order.
pub fn split_pages(pages: &[Page], splitter: &TextSplitter) -> Vec<Chunk> {
    let mut chunks = Vec::new();

    for page in pages {
        if page.text.trim().is_empty() {
            continue;
        }
        for content in splitter.split_text(&page.text) {
            chunks.push(Chunk {
                index: chunks.len(),
                page: page.number,
                content,
            });
        }
    }

    tracing::info!(
        "Split {} pages into {} chunks",
        pages.len(),
        chunks.len()
    );
    chunks
}
