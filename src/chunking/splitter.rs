//! Recursive character splitter.
//!
//! Splitting strategy:
//! 1. Split on the coarsest separator present in the text (`"\n\n"`, then
//!    `"\n"`, then `" "`, then individual characters)
//! 2. Pieces already under the budget are merged back together up to
//!    `chunk_size`, carrying up to `chunk_overlap` characters of tail into
//!    the next chunk
//! 3. Pieces over the budget recurse with the next finer separator
//!
//! Lengths are counted in characters, not bytes.

use std::collections::VecDeque;

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone, Copy)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    /// `chunk_overlap` is clamped below `chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Split `text` into trimmed, non-empty chunks of at most `chunk_size` chars.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut output = Vec::new();

        // Pick the first separator that occurs; "" always matches.
        let mut separator = "";
        let mut finer: &[&str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() {
                separator = *sep;
                finer = &[];
                break;
            }
            if text.contains(sep) {
                separator = *sep;
                finer = &separators[i + 1..];
                break;
            }
        }

        let pieces: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        };

        let mut small: Vec<String> = Vec::new();
        for piece in pieces {
            if char_len(&piece) < self.chunk_size {
                small.push(piece);
                continue;
            }
            if !small.is_empty() {
                output.extend(self.merge(&small, separator));
                small.clear();
            }
            if finer.is_empty() {
                output.push(piece);
            } else {
                output.extend(self.split_recursive(&piece, finer));
            }
        }
        if !small.is_empty() {
            output.extend(self.merge(&small, separator));
        }

        output
    }

    /// Greedily join pieces with `separator` up to the budget, keeping an
    /// overlapping tail between consecutive chunks.
    fn merge(&self, pieces: &[String], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);
            let joined_len = |total: usize, window_len: usize| {
                total + len + if window_len > 0 { sep_len } else { 0 }
            };

            if joined_len(total, window.len()) > self.chunk_size && !window.is_empty() {
                push_chunk(&mut chunks, &window, separator);

                // Drop from the front until only the overlap remains and the new piece fits.
                while total > self.chunk_overlap
                    || (total > 0 && joined_len(total, window.len()) > self.chunk_size)
                {
                    let Some(front) = window.pop_front() else {
                        break;
                    };
                    total -= char_len(front) + if window.is_empty() { 0 } else { sep_len };
                }
            }

            total += len + if window.is_empty() { 0 } else { sep_len };
            window.push_back(piece.as_str());
        }

        push_chunk(&mut chunks, &window, separator);
        chunks
    }
}

fn push_chunk(chunks: &mut Vec<String>, window: &VecDeque<&str>, separator: &str) {
    let joined = window.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
