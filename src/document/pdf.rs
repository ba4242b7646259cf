use anyhow::{Context, Result};
use lopdf::Document;

/// Text of a single PDF page.
#[derive(Debug, Clone)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    pub text: String,
}

/// All pages extracted from one upload.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub pages: Vec<Page>,
}

impl LoadedDocument {
    /// Full document text, pages joined by newlines. This is what the pattern
    /// detector scans.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.text.trim().is_empty())
    }
}

/// Parse PDF bytes and extract text page by page.
///
/// Pages whose text cannot be decoded (image-only scans, unsupported font
/// encodings) are kept with empty text so page numbers stay aligned.
pub fn load_pdf(bytes: &[u8]) -> Result<LoadedDocument> {
    let doc = Document::load_mem(bytes).context("Failed to parse PDF")?;

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let mut pages = Vec::with_capacity(page_numbers.len());

    for number in page_numbers {
        let text = match doc.extract_text(&[number]) {
            Ok(text) => normalize_page_text(&text),
            Err(e) => {
                tracing::warn!("Could not extract text from page {number}: {e}");
                String::new()
            }
        };
        pages.push(Page { number, text });
    }

    let loaded = LoadedDocument { pages };
    tracing::info!("Loaded {} pages", loaded.page_count());
    Ok(loaded)
}

/// Trim trailing whitespace per line and drop NUL bytes some encoders leave behind.
fn normalize_page_text(text: &str) -> String {
    text.replace('\0', "")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
