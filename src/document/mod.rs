//! PDF loading: bytes in, per-page text out.

pub mod pdf;

pub use pdf::{load_pdf, LoadedDocument, Page};
