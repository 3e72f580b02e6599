//! Word-count chunking of document text

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A contiguous run of document tokens rejoined with single spaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of the chunk in document order (0-based)
    pub index: usize,
    /// Chunk text
    pub text: String,
    /// Number of whitespace-delimited tokens in the chunk
    pub token_count: usize,
}

impl Chunk {
    /// Iterate over the chunk's tokens
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }
}

/// Splits text into chunks of at most `max_tokens` whitespace-delimited tokens
#[derive(Debug, Clone, Copy)]
pub struct WordChunker {
    max_tokens: usize,
}

impl WordChunker {
    /// Create a chunker; fails if `max_tokens` is zero
    pub fn new(max_tokens: usize) -> Result<Self> {
        if max_tokens == 0 {
            return Err(Error::invalid_argument(
                "max tokens per chunk must be a positive integer",
            ));
        }
        Ok(Self { max_tokens })
    }

    /// Maximum tokens per chunk
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Chunk a document.
    ///
    /// Never returns an empty vector: a document without tokens yields a single
    /// chunk holding the original text unchanged.
    pub fn chunk(&self, document: &str) -> Vec<Chunk> {
        let tokens: Vec<&str> = document.split_whitespace().collect();

        if tokens.is_empty() {
            return vec![Chunk {
                index: 0,
                text: document.to_string(),
                token_count: 0,
            }];
        }

        tokens
            .chunks(self.max_tokens)
            .enumerate()
            .map(|(index, group)| Chunk {
                index,
                text: group.join(" "),
                token_count: group.len(),
            })
            .collect()
    }
}

/// Chunk `document` into groups of `max_tokens_per_chunk` tokens
pub fn chunk(document: &str, max_tokens_per_chunk: usize) -> Result<Vec<Chunk>> {
    Ok(WordChunker::new(max_tokens_per_chunk)?.chunk(document))
}
